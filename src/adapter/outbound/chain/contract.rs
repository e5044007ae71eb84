//! Contract bindings and tuple conversions.
//!
//! Tuple layouts:
//! - `BetSlip`: strategy, initialCollateral, finalCollateral, outcome
//!   (option index), parentId, instantArbitrage, status, failureReason,
//!   marketplaceIds, marketIds, proxiedBets
//! - `ProxiedBet`: id, betSlipId, marketplaceId, marketId, optionIndex,
//!   minimumShares, blockTimestamp, originalCollateralAmount,
//!   finalCollateralAmount, sharesBought, sharesSold, outcome, failureReason

use alloy_primitives::{FixedBytes, U256};
use alloy_sol_types::sol;
use tracing::warn;

use crate::domain::{BetSlip, BetSlipId, ChainEvent, MarketId, MarketplaceId, ProxiedBet, ProxiedBetId};
use crate::error::ChainError;

sol! {
    #[sol(rpc)]
    contract PolyBet {
        struct BetSlipData {
            uint8 strategy;
            uint256 initialCollateral;
            uint256 finalCollateral;
            uint8 outcome;
            uint256 parentId;
            bool instantArbitrage;
            uint8 status;
            string failureReason;
            bytes32[] marketplaceIds;
            bytes32[] marketIds;
            bytes32[] proxiedBets;
        }

        struct ProxiedBetData {
            bytes32 id;
            uint256 betSlipId;
            uint256 marketplaceId;
            uint256 marketId;
            uint256 optionIndex;
            uint256 minimumShares;
            uint256 blockTimestamp;
            uint256 originalCollateralAmount;
            uint256 finalCollateralAmount;
            uint256 sharesBought;
            uint256 sharesSold;
            uint8 outcome;
            string failureReason;
        }

        event BetSlipCreated(uint256 indexed betId);
        event BetSlipSellingStateUpdate(uint256 indexed betId);

        function getBetSlip(uint256 betSlipId) external view returns (BetSlipData memory);
        function getProxiedBet(bytes32 betId) external view returns (ProxiedBetData memory);
        function updateBetSlipStatus(uint256 betSlipId, uint8 status) external;
        function recordProxiedBetPlaced(uint256 betSlipId, ProxiedBetData calldata bet) external;
        function recordProxiedBetSold(bytes32 betId, uint256 sharesSold, uint256 collateralReceived) external;
    }
}

fn u128_of(field: &str, value: U256) -> Result<u128, ChainError> {
    u128::try_from(value).map_err(|_| ChainError::Decode(format!("{field} {value} exceeds u128")))
}

fn u64_of(field: &str, value: U256) -> Result<u64, ChainError> {
    u64::try_from(value).map_err(|_| ChainError::Decode(format!("{field} {value} exceeds u64")))
}

pub fn bet_slip_id(value: U256) -> Result<BetSlipId, ChainError> {
    u64_of("betId", value).map(BetSlipId::new)
}

/// Which slip event a log carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    Created,
    SellingStateUpdate,
}

/// One raw event log before decoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventLog {
    pub kind: EventKind,
    pub bet_id: U256,
    pub block: Option<u64>,
    pub log_index: Option<u64>,
}

/// Decode logs into events ordered by block then log index.
///
/// A log whose slip id cannot be decoded is dropped with a warning so the
/// rest of the range is still delivered. Logs without a block number are
/// placed at `to`.
pub fn events_from_logs(logs: Vec<EventLog>, to: u64) -> Vec<ChainEvent> {
    let mut events: Vec<(u64, ChainEvent)> = logs
        .into_iter()
        .filter_map(|log| {
            let bet_slip_id = match bet_slip_id(log.bet_id) {
                Ok(id) => id,
                Err(e) => {
                    warn!(kind = ?log.kind, block = ?log.block, error = %e, "Skipping undecodable event");
                    return None;
                }
            };
            let block = log.block.unwrap_or(to);
            let event = match log.kind {
                EventKind::Created => ChainEvent::BetSlipCreated { bet_slip_id, block },
                EventKind::SellingStateUpdate => ChainEvent::BetSlipSellingStateUpdate { bet_slip_id, block },
            };
            Some((log.log_index.unwrap_or_default(), event))
        })
        .collect();
    events.sort_by_key(|(index, event)| (event.block(), *index));
    events.into_iter().map(|(_, event)| event).collect()
}

pub fn bet_slip_from_tuple(id: BetSlipId, data: PolyBet::BetSlipData) -> Result<BetSlip, ChainError> {
    Ok(BetSlip {
        id,
        strategy: data.strategy,
        initial_collateral: u128_of("initialCollateral", data.initialCollateral)?,
        final_collateral: u128_of("finalCollateral", data.finalCollateral)?,
        option_index: u64::from(data.outcome),
        parent_id: u128_of("parentId", data.parentId)?,
        instant_arbitrage: data.instantArbitrage,
        status: data.status,
        failure_reason: data.failureReason,
        marketplace_ids: data.marketplaceIds.into_iter().map(|b| b.0).collect(),
        market_ids: data.marketIds.into_iter().map(|b| b.0).collect(),
        proxied_bet_ids: data
            .proxiedBets
            .into_iter()
            .map(|b| ProxiedBetId::from_bytes(b.0))
            .collect(),
    })
}

pub fn proxied_bet_from_tuple(data: PolyBet::ProxiedBetData) -> Result<ProxiedBet, ChainError> {
    let option_index = u8::try_from(u64_of("optionIndex", data.optionIndex)?)
        .map_err(|_| ChainError::Decode(format!("optionIndex {} exceeds u8", data.optionIndex)))?;
    Ok(ProxiedBet {
        id: ProxiedBetId::from_bytes(data.id.0),
        bet_slip_id: bet_slip_id(data.betSlipId)?,
        marketplace_id: MarketplaceId::new(u64_of("marketplaceId", data.marketplaceId)?),
        market_id: MarketId::new(u64_of("marketId", data.marketId)?),
        option_index,
        minimum_shares: u128_of("minimumShares", data.minimumShares)?,
        block_timestamp: u64_of("blockTimestamp", data.blockTimestamp)?,
        original_collateral: u128_of("originalCollateralAmount", data.originalCollateralAmount)?,
        final_collateral: u128_of("finalCollateralAmount", data.finalCollateralAmount)?,
        shares_bought: u128_of("sharesBought", data.sharesBought)?,
        shares_sold: u128_of("sharesSold", data.sharesSold)?,
        outcome: data.outcome,
        failure_reason: data.failureReason,
    })
}

pub fn proxied_bet_to_tuple(bet: &ProxiedBet) -> PolyBet::ProxiedBetData {
    PolyBet::ProxiedBetData {
        id: FixedBytes(*bet.id.as_bytes()),
        betSlipId: U256::from(bet.bet_slip_id.value()),
        marketplaceId: U256::from(bet.marketplace_id.value()),
        marketId: U256::from(bet.market_id.value()),
        optionIndex: U256::from(bet.option_index),
        minimumShares: U256::from(bet.minimum_shares),
        blockTimestamp: U256::from(bet.block_timestamp),
        originalCollateralAmount: U256::from(bet.original_collateral),
        finalCollateralAmount: U256::from(bet.final_collateral),
        sharesBought: U256::from(bet.shares_bought),
        sharesSold: U256::from(bet.shares_sold),
        outcome: bet.outcome,
        failureReason: bet.failure_reason.clone(),
    }
}
