//! Bet contract connection settings.

use serde::Deserialize;

use crate::domain::StatusMapping;

/// `[chain]` section.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ChainConfig {
    #[serde(default)]
    pub rpc_url: String,
    #[serde(default)]
    pub contract_address: String,
    /// JSON ABI of the deployed contract, checked at startup.
    #[serde(default)]
    pub abi_path: Option<String>,
    #[serde(default)]
    pub chain_id: Option<u64>,
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
    #[serde(default = "default_receipt_timeout_secs")]
    pub receipt_timeout_secs: u64,
    #[serde(default = "default_record_gas_limit")]
    pub record_gas_limit: u64,
    #[serde(default = "default_status_gas_limit")]
    pub status_gas_limit: u64,
    /// First block to scan when no cursor has been stored.
    #[serde(default)]
    pub start_block: Option<u64>,
    #[serde(default)]
    pub mark_processing: bool,
    #[serde(default)]
    pub status: StatusMapping,
    /// Signing key. Only ever read from the environment.
    #[serde(skip)]
    pub private_key: Option<String>,
}

const fn default_poll_interval_ms() -> u64 {
    2000
}

const fn default_receipt_timeout_secs() -> u64 {
    120
}

const fn default_record_gas_limit() -> u64 {
    300_000
}

const fn default_status_gas_limit() -> u64 {
    200_000
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            rpc_url: String::new(),
            contract_address: String::new(),
            abi_path: None,
            chain_id: None,
            poll_interval_ms: default_poll_interval_ms(),
            receipt_timeout_secs: default_receipt_timeout_secs(),
            record_gas_limit: default_record_gas_limit(),
            status_gas_limit: default_status_gas_limit(),
            start_block: None,
            mark_processing: false,
            status: StatusMapping::default(),
            private_key: None,
        }
    }
}
