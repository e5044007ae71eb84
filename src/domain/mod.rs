//! Exchange-agnostic domain types. No I/O lives here.
//!
//! - [`pool`] - Pools, sides, raw reserve snapshots
//! - [`curve`] - Calibrated LMSR curves and their quality flags
//! - [`allocation`] - Allocation strategies and results
//! - [`bet`] - Outbound order requests, responses and batch results
//! - [`slip`] - On-chain bet slips, proxied bets and status ordinals
//! - [`event`] - Contract events consumed by the orchestrator
//! - [`money`] - Collateral unit conversion
//! - [`id`] - Identifier newtypes

pub mod allocation;
pub mod bet;
pub mod curve;
pub mod error;
pub mod event;
pub mod id;
pub mod money;
pub mod pool;
pub mod slip;

pub use allocation::{AllocationResult, OptimalAllocation, Strategy};
pub use bet::{BetRequest, BetResponse, ExecutionResult};
pub use curve::{CalibratedCurve, CalibrationQuality};
pub use error::DomainError;
pub use event::ChainEvent;
pub use id::{BetSlipId, MarketId, MarketplaceId, ProxiedBetId};
pub use pool::{MarketType, PoolConfig, ReserveSnapshot, Side};
pub use slip::{BetSlip, BetSlipStatus, ProxiedBet, StatusMapping};
