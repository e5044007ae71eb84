//! Pool store configuration.

use serde::Deserialize;

use crate::domain::money::COLLATERAL_DECIMALS;

/// `[pool_store]` section.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PoolStoreConfig {
    /// SQLite file holding pool reserves and the block cursor.
    #[serde(default = "default_database_url")]
    pub database_url: String,
    /// Decimals of the stored base units.
    #[serde(default = "default_collateral_decimals")]
    pub collateral_decimals: u32,
}

fn default_database_url() -> String {
    "bet_router.db".to_string()
}

const fn default_collateral_decimals() -> u32 {
    COLLATERAL_DECIMALS
}

impl Default for PoolStoreConfig {
    fn default() -> Self {
        Self {
            database_url: default_database_url(),
            collateral_decimals: default_collateral_decimals(),
        }
    }
}
