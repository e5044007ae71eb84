//! Pool reserve and quote sources.

use async_trait::async_trait;

use crate::domain::{PoolConfig, ReserveSnapshot, Side};
use crate::error::{PoolStateError, Result};

/// Read-only access to pool reserves.
///
/// Implementations never cache: reserves move between ticks, and every
/// failure is reported as a typed error rather than partial data.
#[async_trait]
pub trait PoolStateGateway: Send + Sync {
    async fn fetch(&self, pool: &PoolConfig) -> std::result::Result<ReserveSnapshot, PoolStateError>;
}

/// Current per-share price for order-book pools.
#[async_trait]
pub trait QuoteSource: Send + Sync {
    async fn price(&self, pool: &PoolConfig, side: Side) -> Result<f64>;
}
