//! Canonical test configurations.
//!
//! Single source of truth for config structs used across tests.

use crate::application::execution::ExecutorConfig;
use crate::application::pricing::PricingConfig;
use crate::application::registry::{MarketplaceEntry, MarketplaceRegistry};
use crate::domain::MarketType;

/// Pricing with enough bisection steps to land on exact share counts.
pub fn exact_pricing() -> PricingConfig {
    PricingConfig {
        bisection_max_steps: 64,
        ..PricingConfig::default()
    }
}

/// Live executor with the default minimum bet.
pub fn executor() -> ExecutorConfig {
    ExecutorConfig::default()
}

/// Executor that never calls the marketplace.
pub fn dry_run_executor() -> ExecutorConfig {
    ExecutorConfig {
        dry_run: true,
        ..ExecutorConfig::default()
    }
}

/// Two marketplaces: `1 -> alpha` and `2 -> beta`.
pub fn registry() -> MarketplaceRegistry {
    MarketplaceRegistry::new(vec![
        MarketplaceEntry::new(1, "schema_alpha", "alpha", MarketType::Lmsr),
        MarketplaceEntry::new(2, "schema_beta", "beta", MarketType::Lmsr),
    ])
    .unwrap_or_else(|e| panic!("test registry is invalid: {e}"))
}
