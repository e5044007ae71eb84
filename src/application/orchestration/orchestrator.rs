//! Event routing and the shared write path.

use std::sync::Arc;

use serde::Deserialize;
use tracing::{info, warn};

use crate::application::allocation::AllocationOptimizer;
use crate::application::execution::BetExecutor;
use crate::application::registry::MarketplaceRegistry;
use crate::domain::{BetSlip, BetSlipId, BetSlipStatus, ChainEvent, ExecutionResult, StatusMapping, Strategy};
use crate::error::Result;
use crate::port::outbound::chain::{ChainClient, TxReceipt};
use crate::port::outbound::marketplace::MarketplaceClient;

/// Flow-level settings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct OrchestratorConfig {
    pub status: StatusMapping,
    /// Strategy for every buy flow.
    pub strategy: Strategy,
    pub collateral_decimals: u32,
    /// Write `Processing` before placing any order.
    pub mark_processing: bool,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            status: StatusMapping::default(),
            strategy: Strategy::Grid,
            collateral_decimals: crate::domain::money::COLLATERAL_DECIMALS,
            mark_processing: false,
        }
    }
}

/// What a buy flow did.
#[derive(Debug, Clone, PartialEq)]
pub struct BuyOutcome {
    pub bet_slip_id: BetSlipId,
    /// Status the flow tried to write.
    pub status: BetSlipStatus,
    pub execution: Option<ExecutionResult>,
    /// Proxied bets written on-chain.
    pub recorded: usize,
    pub failure_reason: Option<String>,
}

/// What a sell flow did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SellOutcome {
    pub bet_slip_id: BetSlipId,
    pub attempted: usize,
    pub sold: usize,
    /// Whether the slip was moved to `Closed`.
    pub closed: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FlowOutcome {
    Buy(BuyOutcome),
    Sell(SellOutcome),
}

/// Drives buy and sell flows for contract events.
///
/// Processes one slip at a time. Every contract write goes through
/// [`Orchestrator::write`], which never propagates a failure.
pub struct Orchestrator {
    pub(super) chain: Arc<dyn ChainClient>,
    pub(super) marketplace: Arc<dyn MarketplaceClient>,
    pub(super) optimizer: Arc<AllocationOptimizer>,
    pub(super) executor: Arc<BetExecutor>,
    pub(super) registry: Arc<MarketplaceRegistry>,
    pub(super) config: OrchestratorConfig,
}

impl Orchestrator {
    pub fn new(
        chain: Arc<dyn ChainClient>,
        marketplace: Arc<dyn MarketplaceClient>,
        optimizer: Arc<AllocationOptimizer>,
        executor: Arc<BetExecutor>,
        registry: Arc<MarketplaceRegistry>,
        config: OrchestratorConfig,
    ) -> Self {
        Self {
            chain,
            marketplace,
            optimizer,
            executor,
            registry,
            config,
        }
    }

    #[must_use]
    pub const fn config(&self) -> &OrchestratorConfig {
        &self.config
    }

    /// Route an event to its flow.
    ///
    /// The flow is chosen by event kind alone; the slip's stored status is
    /// never consulted.
    ///
    /// # Errors
    ///
    /// Only a failed slip read is an error. Everything after that is
    /// reported through the outcome.
    pub async fn handle(&self, event: ChainEvent) -> Result<FlowOutcome> {
        info!(event = event.name(), bet_slip_id = %event.bet_slip_id(), block = event.block(), "Handling event");
        let slip = self.chain.bet_slip(event.bet_slip_id()).await?;
        Ok(match event {
            ChainEvent::BetSlipCreated { .. } => FlowOutcome::Buy(self.buy(&slip).await),
            ChainEvent::BetSlipSellingStateUpdate { .. } => FlowOutcome::Sell(self.sell(&slip).await),
        })
    }

    /// Replay one flow for a slip by id.
    ///
    /// # Errors
    ///
    /// Fails when the slip cannot be read.
    pub async fn process(&self, id: BetSlipId, sell: bool) -> Result<FlowOutcome> {
        let slip = self.chain.bet_slip(id).await?;
        Ok(if sell {
            FlowOutcome::Sell(self.sell(&slip).await)
        } else {
            FlowOutcome::Buy(self.buy(&slip).await)
        })
    }

    pub(super) async fn set_status(&self, slip: &BetSlip, status: BetSlipStatus) -> bool {
        let ordinal = self.config.status.ordinal(status);
        self.write(
            slip.id,
            &format!("status -> {status:?}"),
            self.chain.update_bet_slip_status(slip.id, ordinal),
        )
        .await
    }

    /// Await one contract write. Failures are logged and reported as `false`.
    ///
    /// In dry-run mode the write is skipped.
    pub(super) async fn write<F>(&self, bet_slip_id: BetSlipId, what: &str, write: F) -> bool
    where
        F: std::future::Future<Output = Result<TxReceipt>>,
    {
        if self.executor.config().dry_run {
            info!(bet_slip_id = %bet_slip_id, write = what, "Dry run, contract write skipped");
            return false;
        }
        match write.await {
            Ok(receipt) => {
                info!(
                    bet_slip_id = %bet_slip_id,
                    write = what,
                    tx_hash = %receipt.tx_hash,
                    gas_used = receipt.gas_used,
                    "Contract write confirmed"
                );
                true
            }
            Err(e) => {
                warn!(bet_slip_id = %bet_slip_id, write = what, error = %e, "Contract write failed");
                false
            }
        }
    }
}
