//! Marketplace adapter HTTP integration.

pub mod client;
pub mod dto;
pub mod settings;

pub use client::HttpMarketplaceClient;
pub use settings::MarketplaceConfig;
