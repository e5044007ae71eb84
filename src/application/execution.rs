//! Bet executor.
//!
//! Turns an allocation into one buy order per funded pool and runs them with
//! per-order isolation: a transport error or non-success status on one order
//! becomes a failed [`BetResponse`] and never stops the others.

use std::sync::Arc;

use futures_util::future::join_all;
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, info, warn};

use crate::application::registry::MarketplaceRegistry;
use crate::domain::{BetRequest, BetResponse, ExecutionResult, OptimalAllocation, PoolConfig, Side};
use crate::error::{ExecutionError, Result};
use crate::port::outbound::marketplace::{BuyOrder, MarketplaceClient};

/// Executor defaults.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ExecutorConfig {
    /// Allocations below this many collateral units are not ordered.
    pub min_bet_amount: f64,
    pub dry_run: bool,
    /// Send the orders of one batch concurrently.
    pub parallel: bool,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            min_bet_amount: 1.0,
            dry_run: false,
            parallel: false,
        }
    }
}

pub struct BetExecutor {
    client: Arc<dyn MarketplaceClient>,
    registry: Arc<MarketplaceRegistry>,
    config: ExecutorConfig,
}

impl BetExecutor {
    pub fn new(
        client: Arc<dyn MarketplaceClient>,
        registry: Arc<MarketplaceRegistry>,
        config: ExecutorConfig,
    ) -> Self {
        Self {
            client,
            registry,
            config,
        }
    }

    #[must_use]
    pub const fn config(&self) -> &ExecutorConfig {
        &self.config
    }

    /// Place one order per allocation of at least `min_amount`.
    ///
    /// # Errors
    ///
    /// Fails when every allocation is below `min_amount` or a funded pool's
    /// schema has no endpoint. Individual order failures are not errors.
    pub async fn execute(
        &self,
        allocation: &OptimalAllocation,
        side: Side,
        min_amount: f64,
        dry_run: bool,
    ) -> Result<ExecutionResult> {
        let funded: Vec<(&PoolConfig, f64)> = allocation
            .allocations
            .iter()
            .filter(|a| a.amount_allocated >= min_amount)
            .map(|a| (&a.pool, a.amount_allocated))
            .collect();
        let skipped = allocation.allocations.len() - funded.len();
        if skipped > 0 {
            debug!(skipped, min_amount, "Allocations below minimum dropped");
        }
        if funded.is_empty() {
            return Err(ExecutionError::AllBelowMinimum { minimum: min_amount }.into());
        }

        let requests = self.requests(&funded, side)?;
        let total: f64 = allocation.allocations.iter().map(|a| a.amount_allocated).sum();
        let label = format!("optimal:{}", allocation.strategy);
        Ok(self.run(total, requests, label, dry_run).await)
    }

    /// Put the whole amount into one pool.
    ///
    /// # Errors
    ///
    /// Fails when the pool's schema has no endpoint.
    pub async fn execute_single(
        &self,
        pool: &PoolConfig,
        amount: f64,
        side: Side,
        dry_run: bool,
    ) -> Result<ExecutionResult> {
        let requests = self.requests(&[(pool, amount)], side)?;
        Ok(self.run(amount, requests, "single", dry_run).await)
    }

    /// Split the amount evenly across `pools`, ignoring prices.
    ///
    /// # Errors
    ///
    /// Fails for an empty pool list, an even share below the minimum bet or
    /// an unmapped schema.
    pub async fn execute_equal_split(
        &self,
        pools: &[PoolConfig],
        amount: f64,
        side: Side,
        dry_run: bool,
    ) -> Result<ExecutionResult> {
        let share = if pools.is_empty() {
            0.0
        } else {
            amount / pools.len() as f64
        };
        if share < self.config.min_bet_amount {
            return Err(ExecutionError::AllBelowMinimum {
                minimum: self.config.min_bet_amount,
            }
            .into());
        }
        let funded: Vec<(&PoolConfig, f64)> = pools.iter().map(|p| (p, share)).collect();
        let requests = self.requests(&funded, side)?;
        Ok(self.run(amount, requests, "equal_split", dry_run).await)
    }

    fn requests(&self, funded: &[(&PoolConfig, f64)], side: Side) -> Result<Vec<BetRequest>> {
        funded
            .iter()
            .map(|(pool, amount)| {
                let endpoint = self.registry.endpoint_for(&pool.schema_namespace)?;
                Ok(BetRequest {
                    market_id: pool.pool_id,
                    option_index: side.option_index(),
                    amount: *amount,
                    endpoint: endpoint.to_string(),
                })
            })
            .collect()
    }

    async fn run(
        &self,
        total_amount: f64,
        requests: Vec<BetRequest>,
        label: impl Into<String>,
        dry_run: bool,
    ) -> ExecutionResult {
        let label = label.into();
        let responses = if dry_run {
            requests
                .iter()
                .map(|r| BetResponse::succeeded(r, json!({ "simulated": true }), None))
                .collect()
        } else if self.config.parallel {
            join_all(requests.iter().map(|r| self.send(r))).await
        } else {
            let mut responses = Vec::with_capacity(requests.len());
            for request in &requests {
                responses.push(self.send(request).await);
            }
            responses
        };

        let result = ExecutionResult::from_responses(total_amount, responses, label);
        info!(
            strategy = %result.strategy_label,
            requests = result.total_requests,
            successful = result.successful.len(),
            failed = result.failed.len(),
            executed = result.total_executed_amount(),
            dry_run,
            "Bets executed"
        );
        result
    }

    async fn send(&self, request: &BetRequest) -> BetResponse {
        let order = BuyOrder {
            market_id: request.market_id,
            option_index: request.option_index,
            collateral_amount: request.amount,
        };
        match self.client.buy_shares(&request.endpoint, &order).await {
            Ok(reply) if reply.is_success() => BetResponse::succeeded(request, reply.body, Some(reply.status)),
            Ok(reply) => {
                warn!(
                    endpoint = %request.endpoint,
                    market_id = %request.market_id,
                    status = reply.status,
                    "Buy order rejected"
                );
                BetResponse::failed(
                    request,
                    format!("HTTP {}: {}", reply.status, reply.body),
                    Some(reply.status),
                )
            }
            Err(e) => {
                warn!(
                    endpoint = %request.endpoint,
                    market_id = %request.market_id,
                    error = %e,
                    "Buy order failed"
                );
                BetResponse::failed(request, format!("request failed: {e}"), None)
            }
        }
    }
}
