//! Order-book prices read through the marketplace adapter.

use std::sync::Arc;

use async_trait::async_trait;

use crate::application::registry::MarketplaceRegistry;
use crate::domain::{PoolConfig, Side};
use crate::error::{PricingError, Result};
use crate::port::outbound::marketplace::MarketplaceClient;
use crate::port::outbound::pool_state::QuoteSource;

/// [`QuoteSource`] backed by the adapter's `get-prices` route.
pub struct MarketplaceQuoteSource {
    client: Arc<dyn MarketplaceClient>,
    registry: Arc<MarketplaceRegistry>,
}

impl MarketplaceQuoteSource {
    pub fn new(client: Arc<dyn MarketplaceClient>, registry: Arc<MarketplaceRegistry>) -> Self {
        Self { client, registry }
    }
}

#[async_trait]
impl QuoteSource for MarketplaceQuoteSource {
    async fn price(&self, pool: &PoolConfig, side: Side) -> Result<f64> {
        let endpoint = self.registry.endpoint_for(&pool.schema_namespace)?;
        let prices = self.client.get_prices(endpoint, pool.pool_id).await?;
        prices
            .get(usize::from(side.option_index()))
            .copied()
            .ok_or_else(|| {
                PricingError::MissingQuote {
                    pool: pool.to_string(),
                }
                .into()
            })
    }
}
