//! Outbound ports (driven side): interfaces implemented by outbound adapters.
//!
//! These contracts describe infrastructure dependencies: the pool state
//! store, the marketplace HTTP adapter, the bet contract, the block cursor
//! and the LP solver backend.

pub mod chain;
pub mod cursor;
pub mod marketplace;
pub mod pool_state;
pub mod solver;
