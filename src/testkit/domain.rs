//! Builders for domain primitives used across tests.

use crate::domain::{
    BetSlip, BetSlipId, MarketId, MarketType, MarketplaceId, PoolConfig, ReserveSnapshot,
};

/// An LMSR pool `schema/id`.
pub fn pool(id: u64, schema: &str) -> PoolConfig {
    PoolConfig::new(MarketId::new(id), schema, MarketType::Lmsr)
}

/// An order-book pool `schema/id`.
pub fn order_book_pool(id: u64, schema: &str) -> PoolConfig {
    PoolConfig::new(MarketId::new(id), schema, MarketType::OrderBook)
}

/// Fresh reserves with no supply traded yet.
pub fn reserves(liquidity_a: f64, liquidity_b: f64) -> ReserveSnapshot {
    ReserveSnapshot::new(liquidity_a, liquidity_b)
}

/// A pending slip fanning out to `(marketplace, market)` pairs.
pub fn slip(id: u64, collateral_base: u128, option_index: u64, targets: &[(u64, u64)]) -> BetSlip {
    BetSlip {
        id: BetSlipId::new(id),
        strategy: 0,
        initial_collateral: collateral_base,
        final_collateral: 0,
        option_index,
        parent_id: 0,
        instant_arbitrage: false,
        status: 0,
        failure_reason: String::new(),
        marketplace_ids: targets
            .iter()
            .map(|(mp, _)| MarketplaceId::new(*mp).to_bytes32())
            .collect(),
        market_ids: targets
            .iter()
            .map(|(_, m)| MarketId::new(*m).to_bytes32())
            .collect(),
        proxied_bet_ids: Vec::new(),
    }
}
