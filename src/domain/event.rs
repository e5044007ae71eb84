//! Contract events consumed by the orchestrator.

use std::fmt;

use super::id::BetSlipId;

/// A decoded contract event.
///
/// Routing is decided by the variant alone, never by the slip's stored
/// status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChainEvent {
    /// A user placed a new bet slip; drives the buy flow.
    BetSlipCreated { bet_slip_id: BetSlipId, block: u64 },
    /// A slip was moved to selling; drives the sell flow.
    BetSlipSellingStateUpdate { bet_slip_id: BetSlipId, block: u64 },
}

impl ChainEvent {
    #[must_use]
    pub const fn bet_slip_id(&self) -> BetSlipId {
        match self {
            Self::BetSlipCreated { bet_slip_id, .. }
            | Self::BetSlipSellingStateUpdate { bet_slip_id, .. } => *bet_slip_id,
        }
    }

    #[must_use]
    pub const fn block(&self) -> u64 {
        match self {
            Self::BetSlipCreated { block, .. } | Self::BetSlipSellingStateUpdate { block, .. } => {
                *block
            }
        }
    }

    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::BetSlipCreated { .. } => "BetSlipCreated",
            Self::BetSlipSellingStateUpdate { .. } => "BetSlipSellingStateUpdate",
        }
    }
}

impl fmt::Display for ChainEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(bet_slip={}, block={})", self.name(), self.bet_slip_id(), self.block())
    }
}
