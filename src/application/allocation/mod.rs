//! Multi-pool allocation optimizer.
//!
//! Splits a budget across pools quoting the same question so the total
//! share count is maximized. Reserves are read once per call; strategies
//! only differ in how they search the split.
//!
//! | Strategy      | Pools | Unavailable pool            |
//! |---------------|-------|-----------------------------|
//! | `grid`        | any   | disqualifies its candidates |
//! | `ternary`     | 2     | fatal                       |
//! | `gradient`    | >= 2  | fatal                       |
//! | `constrained` | >= 2  | fatal, needs a solver       |
//!
//! Every result is compared against the best single-pool allocation and
//! never returns fewer shares.

mod constrained;
mod evaluator;
mod gradient;
mod grid;
mod ternary;

use std::sync::Arc;

use futures_util::future::join_all;
use serde::Deserialize;
use tracing::{debug, info, warn};

pub use evaluator::PoolModel;
use evaluator::PoolEvaluator;

use crate::application::pricing::LmsrPricer;
use crate::domain::{MarketType, OptimalAllocation, PoolConfig, Side, Strategy};
use crate::error::{OptimizationError, Result};
use crate::port::outbound::pool_state::{PoolStateGateway, QuoteSource};
use crate::port::outbound::solver::Solver;

/// Search tunables for every strategy.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct OptimizerConfig {
    /// Strategy used when the caller does not pick one.
    pub default_strategy: Strategy,
    /// Grid resolution: fractions are multiples of `1 / grid_steps`.
    pub grid_steps: usize,
    /// Ternary search stops when the bracket is this fraction of the budget.
    pub ternary_tolerance: f64,
    pub gradient_learning_rate: f64,
    pub gradient_max_iterations: usize,
    pub gradient_tolerance: f64,
    /// Finite-difference step, as a fraction of the budget.
    pub gradient_delta: f64,
    pub constrained_max_iterations: usize,
    /// Frank-Wolfe duality gap at which the solve stops.
    pub constrained_tolerance: f64,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            default_strategy: Strategy::Grid,
            grid_steps: 20,
            ternary_tolerance: 0.001,
            gradient_learning_rate: 0.01,
            gradient_max_iterations: 100,
            gradient_tolerance: 1e-6,
            gradient_delta: 1e-6,
            constrained_max_iterations: 50,
            constrained_tolerance: 1e-6,
        }
    }
}

/// Budget splitter over pools backed by the pool state gateway.
pub struct AllocationOptimizer {
    gateway: Arc<dyn PoolStateGateway>,
    quotes: Option<Arc<dyn QuoteSource>>,
    solver: Option<Arc<dyn Solver>>,
    pricer: LmsrPricer,
    config: OptimizerConfig,
}

impl AllocationOptimizer {
    pub fn new(gateway: Arc<dyn PoolStateGateway>, pricer: LmsrPricer, config: OptimizerConfig) -> Self {
        Self {
            gateway,
            quotes: None,
            solver: None,
            pricer,
            config,
        }
    }

    /// Price order-book pools through `quotes`.
    #[must_use]
    pub fn with_quotes(mut self, quotes: Arc<dyn QuoteSource>) -> Self {
        self.quotes = Some(quotes);
        self
    }

    /// Enable the constrained strategy.
    #[must_use]
    pub fn with_solver(mut self, solver: Arc<dyn Solver>) -> Self {
        self.solver = Some(solver);
        self
    }

    #[must_use]
    pub const fn config(&self) -> &OptimizerConfig {
        &self.config
    }

    /// Split `total_amount` across `pools` to maximize shares of `side`.
    ///
    /// # Errors
    ///
    /// Returns an [`OptimizationError`] for an empty pool list, a
    /// non-positive budget, a strategy that does not fit the pool count, a
    /// missing solver, or (for every strategy but grid) a pool whose
    /// reserves cannot be read.
    pub async fn optimize(
        &self,
        pools: &[PoolConfig],
        total_amount: f64,
        side: Side,
        strategy: Strategy,
    ) -> Result<OptimalAllocation> {
        if pools.is_empty() {
            return Err(OptimizationError::NoPools.into());
        }
        if !(total_amount > 0.0 && total_amount.is_finite()) {
            return Err(OptimizationError::NonPositiveBudget(total_amount).into());
        }
        if pools.len() > 1 {
            self.check_strategy(strategy, pools.len())?;
        }

        let models = self.load_models(pools, side).await;
        let evaluator = PoolEvaluator::new(&self.pricer, side, pools, models);

        if pools.len() == 1 {
            evaluator.require_all()?;
            return Ok(evaluator.allocation(&[total_amount], strategy)?);
        }

        let amounts = self.search(&evaluator, total_amount, strategy)?;
        let candidate = evaluator.allocation(&amounts, strategy)?;

        let result = match evaluator.best_single(total_amount, strategy) {
            Some(single) if single.total_shares > candidate.total_shares => {
                debug!(
                    strategy = %strategy,
                    split = candidate.total_shares,
                    single = single.total_shares,
                    "Single pool beats split, using it"
                );
                single
            }
            _ => candidate,
        };

        info!(
            strategy = %strategy,
            pools = pools.len(),
            total_amount,
            total_shares = result.total_shares,
            efficiency = result.efficiency,
            "Allocation optimized"
        );
        Ok(result)
    }

    /// All-in allocation to whichever single pool yields the most shares.
    ///
    /// # Errors
    ///
    /// Fails when no pool can be evaluated.
    pub async fn best_single_pool(
        &self,
        pools: &[PoolConfig],
        total_amount: f64,
        side: Side,
    ) -> Result<OptimalAllocation> {
        if pools.is_empty() {
            return Err(OptimizationError::NoPools.into());
        }
        if !(total_amount > 0.0 && total_amount.is_finite()) {
            return Err(OptimizationError::NonPositiveBudget(total_amount).into());
        }
        let models = self.load_models(pools, side).await;
        let evaluator = PoolEvaluator::new(&self.pricer, side, pools, models);
        evaluator
            .best_single(total_amount, self.config.default_strategy)
            .ok_or_else(|| OptimizationError::NoFeasibleCombination.into())
    }

    /// Run every strategy applicable to the pool count.
    ///
    /// Failures are reported per strategy rather than aborting the
    /// comparison.
    pub async fn compare(
        &self,
        pools: &[PoolConfig],
        total_amount: f64,
        side: Side,
    ) -> Vec<(Strategy, Result<OptimalAllocation>)> {
        let mut strategies = vec![Strategy::Grid, Strategy::Gradient, Strategy::Constrained];
        if pools.len() == 2 {
            strategies.push(Strategy::Ternary);
        }
        let mut results = Vec::with_capacity(strategies.len());
        for strategy in strategies {
            let outcome = self.optimize(pools, total_amount, side, strategy).await;
            results.push((strategy, outcome));
        }
        results
    }

    fn check_strategy(&self, strategy: Strategy, pools: usize) -> std::result::Result<(), OptimizationError> {
        match strategy {
            Strategy::Grid => Ok(()),
            Strategy::Ternary if pools != 2 => Err(OptimizationError::RequiresTwoPools {
                strategy: strategy.as_str(),
                pools,
            }),
            Strategy::Ternary => Ok(()),
            Strategy::Gradient | Strategy::Constrained if pools < 2 => {
                Err(OptimizationError::RequiresAtLeastTwoPools {
                    strategy: strategy.as_str(),
                    pools,
                })
            }
            Strategy::Constrained if self.solver.is_none() => Err(OptimizationError::SolverUnavailable),
            Strategy::Gradient | Strategy::Constrained => Ok(()),
        }
    }

    fn search(
        &self,
        evaluator: &PoolEvaluator<'_>,
        total: f64,
        strategy: Strategy,
    ) -> std::result::Result<Vec<f64>, OptimizationError> {
        let cfg = &self.config;
        match strategy {
            Strategy::Grid => grid::search(evaluator, total, cfg.grid_steps),
            Strategy::Ternary => {
                evaluator.require_all()?;
                ternary::search(evaluator, total, cfg.ternary_tolerance)
            }
            Strategy::Gradient => {
                evaluator.require_all()?;
                gradient::search(
                    evaluator,
                    total,
                    gradient::GradientSettings {
                        learning_rate: cfg.gradient_learning_rate,
                        max_iterations: cfg.gradient_max_iterations,
                        tolerance: cfg.gradient_tolerance,
                        delta: cfg.gradient_delta,
                    },
                )
            }
            Strategy::Constrained => {
                let solver = self.solver.as_deref().ok_or(OptimizationError::SolverUnavailable)?;
                evaluator.require_all()?;
                constrained::search(
                    evaluator,
                    total,
                    solver,
                    constrained::FrankWolfeSettings {
                        max_iterations: cfg.constrained_max_iterations,
                        tolerance: cfg.constrained_tolerance,
                        delta: cfg.gradient_delta,
                    },
                )
            }
        }
    }

    /// Read and model every pool concurrently. Failures are kept per pool.
    async fn load_models(&self, pools: &[PoolConfig], side: Side) -> Vec<std::result::Result<PoolModel, String>> {
        join_all(pools.iter().map(|pool| self.load_model(pool, side))).await
    }

    async fn load_model(&self, pool: &PoolConfig, side: Side) -> std::result::Result<PoolModel, String> {
        match pool.market_type {
            MarketType::Lmsr => {
                let snapshot = self.gateway.fetch(pool).await.map_err(|e| {
                    warn!(pool = %pool, error = %e, "Reserve snapshot unavailable");
                    e.to_string()
                })?;
                let curve = self
                    .pricer
                    .calibrate(snapshot.initial_liquidity_a, snapshot.initial_liquidity_b)
                    .map_err(|e| {
                        warn!(pool = %pool, error = %e, "Calibration failed");
                        e.to_string()
                    })?;
                if !curve.quality.is_exact() {
                    warn!(
                        pool = %pool,
                        b = curve.b,
                        max_loss = curve.max_loss,
                        price_converged = curve.quality.price_converged,
                        loss_within_cap = curve.quality.loss_within_cap,
                        "LMSR calibration is approximate"
                    );
                }
                Ok(PoolModel::Lmsr {
                    curve,
                    supply_a: snapshot.current_supply_a,
                    supply_b: snapshot.current_supply_b,
                })
            }
            MarketType::OrderBook => {
                let quotes = self
                    .quotes
                    .as_ref()
                    .ok_or_else(|| "no quote source configured for order-book pools".to_string())?;
                let price = quotes.price(pool, side).await.map_err(|e| e.to_string())?;
                if !(price > 0.0 && price.is_finite()) {
                    return Err(format!("invalid quote {price}"));
                }
                Ok(PoolModel::Linear { price })
            }
        }
    }
}
