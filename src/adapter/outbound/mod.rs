//! Outbound adapters (driven side).

pub mod chain;
pub mod marketplace;
pub mod solver;
pub mod sqlite;
