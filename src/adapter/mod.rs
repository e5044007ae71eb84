//! Implementations of ports (hexagonal adapters).
//!
//! - [`inbound`] - Command-line interface
//! - [`outbound`] - Pool store, marketplace HTTP, bet contract, LP solver

pub mod inbound;
pub mod outbound;
