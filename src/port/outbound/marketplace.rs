//! Marketplace adapter port.
//!
//! The adapter service executes trades against each AMM deployment. Every
//! call targets one endpoint (the deployment's route segment).

use async_trait::async_trait;
use serde_json::Value;

use crate::domain::MarketId;
use crate::error::Result;

/// Buy order payload.
#[derive(Debug, Clone, PartialEq)]
pub struct BuyOrder {
    pub market_id: MarketId,
    pub option_index: u8,
    /// Collateral in whole currency units.
    pub collateral_amount: f64,
}

/// Sell order payload.
#[derive(Debug, Clone, PartialEq)]
pub struct SellOrder {
    pub market_id: MarketId,
    pub option_index: u8,
    /// Share count to liquidate.
    pub amount: u128,
}

/// Raw adapter answer: HTTP status and parsed body.
///
/// A non-2xx status is still `Ok`; callers decide what counts as success.
#[derive(Debug, Clone, PartialEq)]
pub struct MarketplaceReply {
    pub status: u16,
    pub body: Value,
}

impl MarketplaceReply {
    /// 200 and 201 are the only statuses the adapter uses for success.
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self.status, 200 | 201)
    }
}

/// HTTP marketplace adapter.
///
/// Transport failures (connect, timeout) are `Err`.
#[async_trait]
pub trait MarketplaceClient: Send + Sync {
    async fn buy_shares(&self, endpoint: &str, order: &BuyOrder) -> Result<MarketplaceReply>;

    async fn sell_shares(&self, endpoint: &str, order: &SellOrder) -> Result<MarketplaceReply>;

    /// Current outcome prices, indexed by option.
    async fn get_prices(&self, endpoint: &str, market_id: MarketId) -> Result<Vec<f64>>;
}
