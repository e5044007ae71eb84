//! On-chain bet slips and proxied bets.
//!
//! Both records are owned by the contract. The orchestrator only reads slips
//! and appends or updates proxied bets.

use serde::{Deserialize, Serialize};

use super::error::DomainError;
use super::id::{BetSlipId, MarketId, MarketplaceId, ProxiedBetId};
use super::pool::Side;

/// Outcome ordinal written with every freshly placed proxied bet.
pub const PLACED_OUTCOME: u8 = 1;

/// Lifecycle of a bet slip.
///
/// `Pending -> Processing -> {Placed, Failed}` on the buy side and
/// `Placed -> Selling -> Closed` on the sell side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BetSlipStatus {
    Pending,
    Processing,
    Placed,
    Selling,
    Failed,
    Closed,
}

impl BetSlipStatus {
    pub const ALL: [Self; 6] = [
        Self::Pending,
        Self::Processing,
        Self::Placed,
        Self::Selling,
        Self::Failed,
        Self::Closed,
    ];

    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Failed | Self::Closed)
    }
}

/// Contract ordinals for each [`BetSlipStatus`].
///
/// Ordinals differ between contract revisions, so the mapping is supplied by
/// configuration rather than derived from the enum order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatusMapping {
    pub pending: u8,
    pub processing: u8,
    pub placed: u8,
    pub selling: u8,
    pub failed: u8,
    pub closed: u8,
}

impl Default for StatusMapping {
    fn default() -> Self {
        Self {
            pending: 0,
            processing: 1,
            placed: 2,
            selling: 3,
            failed: 4,
            closed: 5,
        }
    }
}

impl StatusMapping {
    #[must_use]
    pub const fn ordinal(&self, status: BetSlipStatus) -> u8 {
        match status {
            BetSlipStatus::Pending => self.pending,
            BetSlipStatus::Processing => self.processing,
            BetSlipStatus::Placed => self.placed,
            BetSlipStatus::Selling => self.selling,
            BetSlipStatus::Failed => self.failed,
            BetSlipStatus::Closed => self.closed,
        }
    }

    #[must_use]
    pub fn status(&self, ordinal: u8) -> Option<BetSlipStatus> {
        BetSlipStatus::ALL
            .into_iter()
            .find(|s| self.ordinal(*s) == ordinal)
    }

    /// True when no two statuses share an ordinal.
    #[must_use]
    pub fn is_injective(&self) -> bool {
        let mut ordinals: Vec<u8> = BetSlipStatus::ALL.iter().map(|s| self.ordinal(*s)).collect();
        ordinals.sort_unstable();
        ordinals.windows(2).all(|w| w[0] != w[1])
    }
}

/// A user's betting intent as stored by the contract.
///
/// Marketplace and market ids are kept as raw `bytes32` until decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BetSlip {
    pub id: BetSlipId,
    pub strategy: u8,
    /// Collateral in base units.
    pub initial_collateral: u128,
    pub final_collateral: u128,
    pub option_index: u64,
    pub parent_id: u128,
    pub instant_arbitrage: bool,
    /// Raw contract ordinal; interpret through a [`StatusMapping`].
    pub status: u8,
    pub failure_reason: String,
    pub marketplace_ids: Vec<[u8; 32]>,
    pub market_ids: Vec<[u8; 32]>,
    pub proxied_bet_ids: Vec<ProxiedBetId>,
}

impl BetSlip {
    /// Decode the `(marketplace, market)` pairs this slip fans out to.
    ///
    /// # Errors
    ///
    /// Returns an error if the lists differ in length or an id overflows.
    pub fn targets(&self) -> Result<Vec<(MarketplaceId, MarketId)>, DomainError> {
        if self.marketplace_ids.len() != self.market_ids.len() {
            return Err(DomainError::MismatchedMarkets {
                marketplaces: self.marketplace_ids.len(),
                markets: self.market_ids.len(),
            });
        }
        self.marketplace_ids
            .iter()
            .zip(&self.market_ids)
            .map(|(mp, m)| Ok((MarketplaceId::from_bytes32(mp)?, MarketId::from_bytes32(m)?)))
            .collect()
    }

    /// # Errors
    ///
    /// Returns an error when the option index is not 0 or 1.
    pub fn side(&self) -> Result<Side, DomainError> {
        Side::from_option_index(self.option_index)
    }
}

/// One executed order against one pool, child of a bet slip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxiedBet {
    pub id: ProxiedBetId,
    pub bet_slip_id: BetSlipId,
    pub marketplace_id: MarketplaceId,
    pub market_id: MarketId,
    pub option_index: u8,
    pub minimum_shares: u128,
    /// Unix seconds at which the order was recorded.
    pub block_timestamp: u64,
    /// Collateral spent, base units.
    pub original_collateral: u128,
    /// Collateral recovered on sale, base units.
    pub final_collateral: u128,
    pub shares_bought: u128,
    pub shares_sold: u128,
    pub outcome: u8,
    pub failure_reason: String,
}

impl ProxiedBet {
    /// A freshly placed bet with a random id.
    #[allow(clippy::too_many_arguments)]
    pub fn placed(
        bet_slip_id: BetSlipId,
        marketplace_id: MarketplaceId,
        market_id: MarketId,
        side: Side,
        original_collateral: u128,
        shares_bought: u128,
        block_timestamp: u64,
    ) -> Self {
        Self {
            id: ProxiedBetId::random(),
            bet_slip_id,
            marketplace_id,
            market_id,
            option_index: side.option_index(),
            minimum_shares: 0,
            block_timestamp,
            original_collateral,
            final_collateral: 0,
            shares_bought,
            shares_sold: 0,
            outcome: PLACED_OUTCOME,
            failure_reason: String::new(),
        }
    }
}
