//! In-memory pool reserves and quotes.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::domain::{PoolConfig, ReserveSnapshot, Side};
use crate::error::{PoolStateError, PricingError, Result};
use crate::port::outbound::pool_state::{PoolStateGateway, QuoteSource};

type PoolKey = (String, u64);

fn key(pool: &PoolConfig) -> PoolKey {
    (pool.schema_namespace.clone(), pool.pool_id.value())
}

/// Reserve snapshots keyed by `(schema, pool_id)`.
///
/// Unknown pools report [`PoolStateError::Missing`].
#[derive(Default)]
pub struct StaticPoolState {
    snapshots: Mutex<HashMap<PoolKey, std::result::Result<ReserveSnapshot, PoolStateError>>>,
    fetches: AtomicUsize,
}

impl StaticPoolState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(self, pool: &PoolConfig, snapshot: ReserveSnapshot) -> Self {
        self.set(pool, snapshot);
        self
    }

    pub fn with_error(self, pool: &PoolConfig, error: PoolStateError) -> Self {
        self.snapshots.lock().insert(key(pool), Err(error));
        self
    }

    /// Replace a pool's reserves between calls.
    pub fn set(&self, pool: &PoolConfig, snapshot: ReserveSnapshot) {
        self.snapshots.lock().insert(key(pool), Ok(snapshot));
    }

    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PoolStateGateway for StaticPoolState {
    async fn fetch(&self, pool: &PoolConfig) -> std::result::Result<ReserveSnapshot, PoolStateError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        self.snapshots
            .lock()
            .get(&key(pool))
            .cloned()
            .unwrap_or_else(|| {
                Err(PoolStateError::Missing {
                    schema: pool.schema_namespace.clone(),
                    pool_id: pool.pool_id.value(),
                })
            })
    }
}

/// Fixed per-side prices for order-book pools.
#[derive(Default)]
pub struct StaticQuotes {
    prices: Mutex<HashMap<(PoolKey, Side), f64>>,
}

impl StaticQuotes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(self, pool: &PoolConfig, side: Side, price: f64) -> Self {
        self.prices.lock().insert((key(pool), side), price);
        self
    }
}

#[async_trait]
impl QuoteSource for StaticQuotes {
    async fn price(&self, pool: &PoolConfig, side: Side) -> Result<f64> {
        self.prices
            .lock()
            .get(&(key(pool), side))
            .copied()
            .ok_or_else(|| {
                PricingError::MissingQuote {
                    pool: pool.to_string(),
                }
                .into()
            })
    }
}
