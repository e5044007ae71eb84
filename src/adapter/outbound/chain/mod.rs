//! Bet contract integration.

pub mod settings;

#[cfg(feature = "chain")]
mod client;
#[cfg(feature = "chain")]
pub mod contract;

#[cfg(feature = "chain")]
pub use client::AlloyChainClient;
pub use settings::ChainConfig;
