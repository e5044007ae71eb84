//! Marketplace adapter HTTP configuration.

use serde::Deserialize;

/// Connection settings for the marketplace adapter service.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MarketplaceConfig {
    /// Adapter base URL; each endpoint is a path segment under it.
    #[serde(default)]
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
    /// Retries for `get-prices` only. Buy and sell calls are never retried.
    #[serde(default)]
    pub max_retries: u32,
    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,
}

const fn default_timeout_secs() -> u64 {
    30
}

const fn default_connect_timeout_secs() -> u64 {
    5
}

const fn default_retry_delay_ms() -> u64 {
    500
}

impl Default for MarketplaceConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            timeout_secs: default_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
            max_retries: 0,
            retry_delay_ms: default_retry_delay_ms(),
        }
    }
}
