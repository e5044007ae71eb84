//! Bet router - routes prediction-market bets across LMSR pools.
//!
//! A bet slip created on the bet contract names a collateral budget, an
//! outcome and a set of `(marketplace, market)` pools. The router splits
//! the budget across those pools to maximize shares, places one order per
//! pool through the marketplace adapter and records every fill back on the
//! contract. A selling-state update liquidates the recorded positions.
//!
//! # Architecture
//!
//! - [`domain`] - Pools, curves, allocations, slips and events. No I/O.
//! - [`port`] - Traits for the pool store, marketplace, chain and solver.
//! - [`application`] - Pricing, allocation, execution and orchestration.
//! - [`adapter`] - CLI plus SQLite, HTTP, alloy and HiGHS implementations.
//! - [`infrastructure`] - Configuration, logging and service wiring.
//! - [`error`] - Error types for the crate.
//!
//! # Features
//!
//! - `chain` (default) - alloy-backed contract client
//! - `testkit` - In-memory fakes for integration tests
//! - `integration-tests` - Tests against a live RPC and deployed contract
//!
//! # Example
//!
//! ```
//! use bet_router::application::pricing::LmsrPricer;
//! use bet_router::domain::Side;
//!
//! let pricer = LmsrPricer::default();
//! let curve = pricer.calibrate(400.0, 600.0).unwrap();
//! let (shares, cost) = pricer.shares_for_amount(&curve, 0.0, 0.0, 25.0, Side::A);
//! assert!(shares > 0 && cost <= 25.0);
//! ```

pub mod adapter;
pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod port;

#[cfg(any(test, feature = "testkit"))]
pub mod testkit;
