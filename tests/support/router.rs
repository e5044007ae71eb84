//! Orchestrator wired over in-memory fakes.

use std::sync::Arc;

use bet_router::application::allocation::{AllocationOptimizer, OptimizerConfig};
use bet_router::application::execution::{BetExecutor, ExecutorConfig};
use bet_router::application::orchestration::{Orchestrator, OrchestratorConfig};
use bet_router::application::pricing::LmsrPricer;
use bet_router::application::registry::{default_entries, MarketplaceRegistry};
use bet_router::domain::{MarketId, MarketplaceId, PoolConfig, StatusMapping};
use bet_router::testkit::chain::FakeChain;
use bet_router::testkit::config::exact_pricing;
use bet_router::testkit::marketplace::ScriptedMarketplace;
use bet_router::testkit::pool::StaticPoolState;

pub const SLAUGHTERHOUSE: &str = "slaughterhouse-predictions";
pub const TERMINAL: &str = "terminal-degeneracy-labs";
pub const CHAMBER: &str = "degen-execution-chamber";

pub fn registry() -> Arc<MarketplaceRegistry> {
    Arc::new(MarketplaceRegistry::new(default_entries()).expect("default registry"))
}

/// The pool a slip target resolves to.
pub fn pool(marketplace: u64, market: u64) -> PoolConfig {
    registry()
        .pool(MarketplaceId::new(marketplace), MarketId::new(market))
        .expect("registered marketplace")
}

pub fn status() -> StatusMapping {
    StatusMapping::default()
}

pub struct Router {
    pub chain: Arc<FakeChain>,
    pub marketplace: Arc<ScriptedMarketplace>,
    pub pools: Arc<StaticPoolState>,
    pub orchestrator: Arc<Orchestrator>,
}

impl Router {
    pub fn new(chain: FakeChain, marketplace: ScriptedMarketplace, pools: StaticPoolState) -> Self {
        Self::with_executor(chain, marketplace, pools, ExecutorConfig::default())
    }

    pub fn with_executor(
        chain: FakeChain,
        marketplace: ScriptedMarketplace,
        pools: StaticPoolState,
        executor: ExecutorConfig,
    ) -> Self {
        let chain = Arc::new(chain);
        let marketplace = Arc::new(marketplace);
        let pools = Arc::new(pools);
        let registry = registry();

        let optimizer = AllocationOptimizer::new(
            pools.clone(),
            LmsrPricer::new(exact_pricing()),
            OptimizerConfig::default(),
        );
        let executor = BetExecutor::new(marketplace.clone(), registry.clone(), executor);
        let orchestrator = Orchestrator::new(
            chain.clone(),
            marketplace.clone(),
            Arc::new(optimizer),
            Arc::new(executor),
            registry,
            OrchestratorConfig::default(),
        );

        Self {
            chain,
            marketplace,
            pools,
            orchestrator: Arc::new(orchestrator),
        }
    }
}
