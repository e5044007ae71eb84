//! Application configuration loading and validation.
//!
//! [`Config`] is read from a TOML file. Secrets and deployment endpoints are
//! taken from the environment when set:
//!
//! | Variable | Field |
//! |----------|-------|
//! | `BET_ROUTER_PRIVATE_KEY` | `chain.private_key` (never read from the file) |
//! | `BET_ROUTER_RPC_URL` | `chain.rpc_url` |
//! | `BET_ROUTER_CONTRACT_ADDRESS` | `chain.contract_address` |
//! | `BET_ROUTER_ADAPTER_URL` | `marketplace.base_url` |
//! | `BET_ROUTER_DATABASE_URL` | `pool_store.database_url` |

use std::path::Path;

use serde::Deserialize;

use super::abi::check_abi_file;
use super::logging::LoggingConfig;
use crate::adapter::outbound::chain::ChainConfig;
use crate::adapter::outbound::marketplace::MarketplaceConfig;
use crate::adapter::outbound::sqlite::PoolStoreConfig;
use crate::application::allocation::OptimizerConfig;
use crate::application::execution::ExecutorConfig;
use crate::application::pricing::PricingConfig;
use crate::application::registry::{default_entries, MarketplaceEntry, MarketplaceRegistry};
use crate::error::{ConfigError, Result};

pub const ENV_PRIVATE_KEY: &str = "BET_ROUTER_PRIVATE_KEY";
pub const ENV_RPC_URL: &str = "BET_ROUTER_RPC_URL";
pub const ENV_CONTRACT_ADDRESS: &str = "BET_ROUTER_CONTRACT_ADDRESS";
pub const ENV_ADAPTER_URL: &str = "BET_ROUTER_ADAPTER_URL";
pub const ENV_DATABASE_URL: &str = "BET_ROUTER_DATABASE_URL";

/// Main application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub chain: ChainConfig,

    /// Marketplace adapter service.
    #[serde(default)]
    pub marketplace: MarketplaceConfig,

    #[serde(default)]
    pub pool_store: PoolStoreConfig,

    #[serde(default)]
    pub pricing: PricingConfig,

    #[serde(default)]
    pub optimizer: OptimizerConfig,

    #[serde(default)]
    pub executor: ExecutorConfig,

    /// `[[registry]]` entries. Defaults to the four known deployments.
    #[serde(default = "default_entries")]
    pub registry: Vec<MarketplaceEntry>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            logging: LoggingConfig::default(),
            chain: ChainConfig::default(),
            marketplace: MarketplaceConfig::default(),
            pool_store: PoolStoreConfig::default(),
            pricing: PricingConfig::default(),
            optimizer: OptimizerConfig::default(),
            executor: ExecutorConfig::default(),
            registry: default_entries(),
        }
    }
}

fn invalid(field: &'static str, reason: &str) -> crate::error::Error {
    ConfigError::InvalidValue {
        field,
        reason: reason.to_string(),
    }
    .into()
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl Config {
    /// Parse TOML content, apply environment overrides and validate.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is malformed or validation fails.
    pub fn parse_toml(content: &str) -> Result<Self> {
        Self::parse_with_env(content, |key| std::env::var(key).ok())
    }

    /// [`Config::parse_toml`] with an explicit environment lookup.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is malformed or validation fails.
    pub fn parse_with_env<F>(content: &str, env: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config: Self = toml::from_str(content).map_err(ConfigError::Parse)?;
        config.apply_env(env);
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed or validated.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadFile)?;
        Self::parse_toml(&content)
    }

    fn apply_env<F>(&mut self, env: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        // The signing key is never taken from the file.
        self.chain.private_key = non_empty(env(ENV_PRIVATE_KEY));
        if let Some(url) = non_empty(env(ENV_RPC_URL)) {
            self.chain.rpc_url = url;
        }
        if let Some(address) = non_empty(env(ENV_CONTRACT_ADDRESS)) {
            self.chain.contract_address = address;
        }
        if let Some(url) = non_empty(env(ENV_ADAPTER_URL)) {
            self.marketplace.base_url = url;
        }
        if let Some(url) = non_empty(env(ENV_DATABASE_URL)) {
            self.pool_store.database_url = url;
        }
    }

    pub fn init_logging(&self) {
        self.logging.init();
    }

    /// Build the marketplace registry from `[[registry]]`.
    ///
    /// # Errors
    ///
    /// Returns an error if any id, schema or endpoint repeats.
    pub fn registry(&self) -> Result<MarketplaceRegistry> {
        Ok(MarketplaceRegistry::new(self.registry.clone())?)
    }

    /// Structural checks shared by every command.
    fn validate(&self) -> Result<()> {
        if self.registry.is_empty() {
            return Err(ConfigError::MissingField { field: "registry" }.into());
        }
        self.registry()?;

        if !self.chain.status.is_injective() {
            return Err(invalid("chain.status", "two statuses share an ordinal"));
        }
        if self.chain.poll_interval_ms == 0 {
            return Err(invalid("chain.poll_interval_ms", "must be greater than 0"));
        }
        if self.chain.receipt_timeout_secs == 0 {
            return Err(invalid("chain.receipt_timeout_secs", "must be greater than 0"));
        }
        if self.chain.record_gas_limit == 0 || self.chain.status_gas_limit == 0 {
            return Err(invalid("chain.gas_limit", "must be greater than 0"));
        }
        if self.marketplace.timeout_secs == 0 {
            return Err(invalid("marketplace.timeout_secs", "must be greater than 0"));
        }

        let p = &self.pricing;
        if !(p.max_loss_fraction > 0.0 && p.max_loss_fraction.is_finite()) {
            return Err(invalid("pricing.max_loss_fraction", "must be greater than 0"));
        }
        if p.price_tolerance <= 0.0 {
            return Err(invalid("pricing.price_tolerance", "must be greater than 0"));
        }
        if !(p.b_shrink_factor > 0.0 && p.b_shrink_factor < 1.0) {
            return Err(invalid("pricing.b_shrink_factor", "must be between 0 and 1"));
        }
        if !(p.small_amount_discount > 0.0 && p.small_amount_discount <= 1.0) {
            return Err(invalid("pricing.small_amount_discount", "must be in (0, 1]"));
        }
        if p.bisection_upper_multiplier <= 0.0 || p.bisection_max_steps == 0 {
            return Err(invalid("pricing.bisection", "bounds and steps must be greater than 0"));
        }
        if !(p.min_price > 0.0 && p.min_price < 0.5) {
            return Err(invalid("pricing.min_price", "must be between 0 and 0.5"));
        }

        let o = &self.optimizer;
        if o.grid_steps == 0 {
            return Err(invalid("optimizer.grid_steps", "must be greater than 0"));
        }
        if o.ternary_tolerance <= 0.0 || o.ternary_tolerance >= 1.0 {
            return Err(invalid("optimizer.ternary_tolerance", "must be between 0 and 1"));
        }
        if o.gradient_learning_rate <= 0.0 || o.gradient_delta <= 0.0 || o.gradient_tolerance <= 0.0 {
            return Err(invalid("optimizer.gradient", "rate, delta and tolerance must be greater than 0"));
        }
        if o.gradient_max_iterations == 0 || o.constrained_max_iterations == 0 {
            return Err(invalid("optimizer.max_iterations", "must be greater than 0"));
        }

        if self.executor.min_bet_amount < 0.0 || !self.executor.min_bet_amount.is_finite() {
            return Err(invalid("executor.min_bet_amount", "must be 0 or greater"));
        }

        if let Some(path) = &self.chain.abi_path {
            check_abi_file(path)?;
        }
        Ok(())
    }

    /// Extra checks before starting the event loop.
    ///
    /// # Errors
    ///
    /// Returns an error naming the first missing endpoint or secret.
    pub fn validate_for_run(&self) -> Result<()> {
        if self.chain.rpc_url.trim().is_empty() {
            return Err(ConfigError::MissingField { field: "chain.rpc_url" }.into());
        }
        if self.chain.contract_address.trim().is_empty() {
            return Err(ConfigError::MissingField {
                field: "chain.contract_address",
            }
            .into());
        }
        if self.marketplace.base_url.trim().is_empty() && !self.executor.dry_run {
            return Err(ConfigError::MissingField {
                field: "marketplace.base_url",
            }
            .into());
        }
        if self.chain.private_key.is_none() && !self.executor.dry_run {
            return Err(ConfigError::MissingField { field: ENV_PRIVATE_KEY }.into());
        }
        Ok(())
    }
}
