//! Composition root: turns a [`Config`] into wired services.

use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use super::config::Config;
use crate::adapter::outbound::marketplace::HttpMarketplaceClient;
use crate::adapter::outbound::solver::HighsSolver;
use crate::adapter::outbound::sqlite::database::connection::{connect, DbPool};
use crate::adapter::outbound::sqlite::{SqliteBlockCursorStore, SqlitePoolStateGateway};
use crate::application::allocation::AllocationOptimizer;
use crate::application::execution::BetExecutor;
use crate::application::orchestration::{EventPoller, Orchestrator, OrchestratorConfig, PollerConfig, DEFAULT_CURSOR};
use crate::application::pricing::LmsrPricer;
use crate::application::quote::MarketplaceQuoteSource;
use crate::application::registry::MarketplaceRegistry;
use crate::error::Result;
use crate::port::outbound::chain::ChainClient;
use crate::port::outbound::cursor::BlockCursorStore;
use crate::port::outbound::marketplace::MarketplaceClient;
use crate::port::outbound::pool_state::PoolStateGateway;

/// Everything below the chain: registry, optimizer and executor.
pub struct Services {
    pub registry: Arc<MarketplaceRegistry>,
    pub marketplace: Arc<dyn MarketplaceClient>,
    pub optimizer: Arc<AllocationOptimizer>,
    pub executor: Arc<BetExecutor>,
    pub db: DbPool,
}

/// Open the pool store and build the marketplace-facing services.
///
/// # Errors
///
/// Returns an error if the registry is invalid or the database cannot be
/// opened and migrated.
pub fn build_services(config: &Config) -> Result<Services> {
    let registry = Arc::new(config.registry()?);
    let db = connect(&config.pool_store.database_url)?;
    let gateway: Arc<dyn PoolStateGateway> = Arc::new(SqlitePoolStateGateway::new(
        db.clone(),
        config.pool_store.collateral_decimals,
    ));
    let marketplace: Arc<dyn MarketplaceClient> =
        Arc::new(HttpMarketplaceClient::from_config(&config.marketplace));

    let optimizer = AllocationOptimizer::new(
        gateway,
        LmsrPricer::new(config.pricing.clone()),
        config.optimizer.clone(),
    )
    .with_quotes(Arc::new(MarketplaceQuoteSource::new(
        Arc::clone(&marketplace),
        Arc::clone(&registry),
    )))
    .with_solver(Arc::new(HighsSolver::new()));

    let executor = BetExecutor::new(
        Arc::clone(&marketplace),
        Arc::clone(&registry),
        config.executor.clone(),
    );

    info!(
        marketplaces = registry.entries().len(),
        database = %config.pool_store.database_url,
        dry_run = config.executor.dry_run,
        "Services initialized"
    );

    Ok(Services {
        registry,
        marketplace,
        optimizer: Arc::new(optimizer),
        executor: Arc::new(executor),
        db,
    })
}

#[must_use]
pub fn orchestrator_config(config: &Config) -> OrchestratorConfig {
    OrchestratorConfig {
        status: config.chain.status,
        strategy: config.optimizer.default_strategy,
        collateral_decimals: config.pool_store.collateral_decimals,
        mark_processing: config.chain.mark_processing,
    }
}

#[must_use]
pub fn poller_config(config: &Config) -> PollerConfig {
    PollerConfig {
        poll_interval: Duration::from_millis(config.chain.poll_interval_ms),
        start_block: config.chain.start_block,
        cursor_name: DEFAULT_CURSOR.to_string(),
    }
}

#[must_use]
pub fn build_orchestrator(config: &Config, services: &Services, chain: Arc<dyn ChainClient>) -> Orchestrator {
    Orchestrator::new(
        chain,
        Arc::clone(&services.marketplace),
        Arc::clone(&services.optimizer),
        Arc::clone(&services.executor),
        Arc::clone(&services.registry),
        orchestrator_config(config),
    )
}

/// Wire the poller against any chain client; the cursor lives in the pool
/// store database.
#[must_use]
pub fn build_poller(config: &Config, services: &Services, chain: Arc<dyn ChainClient>) -> EventPoller {
    let orchestrator = Arc::new(build_orchestrator(config, services, Arc::clone(&chain)));
    let cursor: Arc<dyn BlockCursorStore> = Arc::new(SqliteBlockCursorStore::new(services.db.clone()));
    EventPoller::new(chain, orchestrator, cursor, poller_config(config))
}

/// Signing chain client for the configured contract.
///
/// # Errors
///
/// Returns an error if the key, RPC URL or contract address is invalid.
#[cfg(feature = "chain")]
pub fn connect_chain(config: &Config) -> Result<Arc<dyn ChainClient>> {
    use crate::adapter::outbound::chain::AlloyChainClient;

    let client = if config.chain.private_key.is_some() {
        AlloyChainClient::connect(&config.chain)?
    } else {
        AlloyChainClient::read_only(&config.chain)?
    };
    info!(
        contract = %config.chain.contract_address,
        signer = ?client.signer_address(),
        "Chain client connected"
    );
    Ok(Arc::new(client))
}
