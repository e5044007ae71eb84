//! Chain event orchestration.
//!
//! A polling state machine that decodes contract events and drives the buy
//! and sell flows through the optimizer and executor, then writes results
//! back to the contract.
//!
//! # Flow
//!
//! 1. **Poll**: [`EventPoller`] queries both event kinds past the watermark
//! 2. **Route**: [`Orchestrator::handle`] picks the flow by event kind only
//! 3. **Buy**: allocate, execute, record one proxied bet per filled order,
//!    then `Placed` or `Failed`
//! 4. **Sell**: liquidate each proxied bet, record the sale, then `Closed`
//!    if anything sold
//!
//! Events are handled one at a time, so contract writes from the single
//! signing key never overlap.
//!
//! # Modules
//!
//! - `orchestrator`: routing, outcomes and the shared write path
//! - `buy`: buy flow
//! - `sell`: sell flow
//! - [`response`]: share and collateral extraction from adapter replies
//! - `poller`: watermark loop

mod buy;
mod orchestrator;
mod poller;
pub mod response;
mod sell;

pub use orchestrator::{BuyOutcome, FlowOutcome, Orchestrator, OrchestratorConfig, SellOutcome};
pub use poller::{EventPoller, PollerConfig, TickReport, DEFAULT_CURSOR};
