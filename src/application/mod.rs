//! Application services (use cases).
//!
//! These services orchestrate domain logic and coordinate adapters
//! to implement the application's use cases.
//!
//! - [`pricing`]: LMSR calibration and share pricing
//! - [`allocation`]: multi-pool budget optimizer
//! - [`execution`]: bet executor
//! - [`quote`]: order-book prices via the marketplace adapter
//! - [`registry`]: marketplace, schema and endpoint registry
//! - [`orchestration`]: event-driven buy and sell flows

pub mod allocation;
pub mod execution;
pub mod orchestration;
pub mod pricing;
pub mod quote;
pub mod registry;
