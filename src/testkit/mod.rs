//! Shared test utilities available to both unit and integration tests.
//!
//! Enabled via `#[cfg(test)]` (unit tests) or the `testkit` feature
//! (integration tests).
//!
//! # Modules
//!
//! - [`domain`] - Builders for pools, slips and proxied bets.
//! - [`config`] - Canonical test configurations (optimizer, executor, registry).
//! - [`pool`] - In-memory [`PoolStateGateway`](crate::port::outbound::pool_state::PoolStateGateway)
//!   and [`QuoteSource`](crate::port::outbound::pool_state::QuoteSource).
//! - [`marketplace`] - Recording [`MarketplaceClient`](crate::port::outbound::marketplace::MarketplaceClient)
//!   with scripted replies per endpoint.
//! - [`chain`] - In-memory contract: slips, proxied bets, events and a write log.

pub mod chain;
pub mod config;
pub mod domain;
pub mod marketplace;
pub mod pool;
