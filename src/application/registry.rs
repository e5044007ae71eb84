//! Marketplace registry: contract marketplace id, storage schema and adapter
//! endpoint for every supported AMM deployment.
//!
//! The three columns are each unique, so every direction of lookup is a
//! bijection. The registry is immutable configuration handed to each
//! component at construction.

use serde::{Deserialize, Serialize};

use crate::domain::{MarketId, MarketType, MarketplaceId, PoolConfig};
use crate::error::RegistryError;

/// One marketplace deployment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketplaceEntry {
    pub marketplace_id: MarketplaceId,
    pub schema: String,
    pub endpoint: String,
    #[serde(default)]
    pub market_type: MarketType,
}

impl MarketplaceEntry {
    pub fn new(
        marketplace_id: u64,
        schema: impl Into<String>,
        endpoint: impl Into<String>,
        market_type: MarketType,
    ) -> Self {
        Self {
            marketplace_id: MarketplaceId::new(marketplace_id),
            schema: schema.into(),
            endpoint: endpoint.into(),
            market_type,
        }
    }
}

/// Default deployments.
pub fn default_entries() -> Vec<MarketplaceEntry> {
    vec![
        MarketplaceEntry::new(2, "canibeton_variant1", "slaughterhouse-predictions", MarketType::Lmsr),
        MarketplaceEntry::new(3, "canibeton_variant2", "terminal-degeneracy-labs", MarketType::Lmsr),
        MarketplaceEntry::new(4, "canibeton_variant3", "degen-execution-chamber", MarketType::Lmsr),
        MarketplaceEntry::new(5, "canibeton_variant4", "nihilistic-prophet-syndicate", MarketType::Lmsr),
    ]
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarketplaceRegistry {
    entries: Vec<MarketplaceEntry>,
}

impl MarketplaceRegistry {
    /// Build a registry, rejecting any repeated id, schema or endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::Duplicate`] naming the first repeated value.
    pub fn new(entries: Vec<MarketplaceEntry>) -> Result<Self, RegistryError> {
        for (i, entry) in entries.iter().enumerate() {
            for earlier in &entries[..i] {
                if earlier.marketplace_id == entry.marketplace_id {
                    return Err(RegistryError::Duplicate {
                        field: "marketplace_id",
                        value: entry.marketplace_id.to_string(),
                    });
                }
                if earlier.schema == entry.schema {
                    return Err(RegistryError::Duplicate {
                        field: "schema",
                        value: entry.schema.clone(),
                    });
                }
                if earlier.endpoint == entry.endpoint {
                    return Err(RegistryError::Duplicate {
                        field: "endpoint",
                        value: entry.endpoint.clone(),
                    });
                }
            }
        }
        Ok(Self { entries })
    }

    pub fn entries(&self) -> &[MarketplaceEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entry(&self, marketplace_id: MarketplaceId) -> Result<&MarketplaceEntry, RegistryError> {
        self.entries
            .iter()
            .find(|e| e.marketplace_id == marketplace_id)
            .ok_or(RegistryError::UnknownMarketplace(marketplace_id))
    }

    pub fn schema_for(&self, marketplace_id: MarketplaceId) -> Result<&str, RegistryError> {
        self.entry(marketplace_id).map(|e| e.schema.as_str())
    }

    pub fn endpoint_for(&self, schema: &str) -> Result<&str, RegistryError> {
        self.entries
            .iter()
            .find(|e| e.schema == schema)
            .map(|e| e.endpoint.as_str())
            .ok_or_else(|| RegistryError::UnknownSchema(schema.to_string()))
    }

    pub fn endpoint_for_marketplace(&self, marketplace_id: MarketplaceId) -> Result<&str, RegistryError> {
        self.entry(marketplace_id).map(|e| e.endpoint.as_str())
    }

    pub fn marketplace_for_endpoint(&self, endpoint: &str) -> Result<MarketplaceId, RegistryError> {
        self.entries
            .iter()
            .find(|e| e.endpoint == endpoint)
            .map(|e| e.marketplace_id)
            .ok_or_else(|| RegistryError::UnknownEndpoint(endpoint.to_string()))
    }

    pub fn marketplace_for_schema(&self, schema: &str) -> Result<MarketplaceId, RegistryError> {
        self.entries
            .iter()
            .find(|e| e.schema == schema)
            .map(|e| e.marketplace_id)
            .ok_or_else(|| RegistryError::UnknownSchema(schema.to_string()))
    }

    /// Pool for `market_id` on the given marketplace.
    ///
    /// # Errors
    ///
    /// Fails for a marketplace id with no registry entry.
    pub fn pool(&self, marketplace_id: MarketplaceId, market_id: MarketId) -> Result<PoolConfig, RegistryError> {
        let entry = self.entry(marketplace_id)?;
        Ok(PoolConfig::new(market_id, entry.schema.clone(), entry.market_type))
    }

    /// Pools for parallel `(marketplace, market)` pairs, all or nothing.
    ///
    /// # Errors
    ///
    /// Fails on the first unmapped marketplace.
    pub fn pools(&self, targets: &[(MarketplaceId, MarketId)]) -> Result<Vec<PoolConfig>, RegistryError> {
        targets
            .iter()
            .map(|(marketplace, market)| self.pool(*marketplace, *market))
            .collect()
    }
}

impl Default for MarketplaceRegistry {
    fn default() -> Self {
        Self {
            entries: default_entries(),
        }
    }
}
