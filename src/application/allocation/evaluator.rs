//! Per-pool share functions for one optimization call.
//!
//! Reserves are read and curves calibrated once per call; strategies then
//! probe these models as often as they like without further I/O.

use crate::application::pricing::{shares_for_cost, LmsrPricer};
use crate::domain::{AllocationResult, CalibratedCurve, OptimalAllocation, PoolConfig, Side, Strategy};
use crate::error::OptimizationError;

/// How one pool converts collateral into shares.
#[derive(Debug, Clone, PartialEq)]
pub enum PoolModel {
    Lmsr {
        curve: CalibratedCurve,
        supply_a: f64,
        supply_b: f64,
    },
    /// Order-book pools are priced flat at the current quote.
    Linear { price: f64 },
}

impl PoolModel {
    /// Continuous share count for `amount`, used for search directions.
    ///
    /// For LMSR this is the exact inverse of the cost function.
    fn continuous_shares(&self, amount: f64, side: Side) -> f64 {
        if amount <= 0.0 {
            return 0.0;
        }
        match self {
            Self::Lmsr {
                curve,
                supply_a,
                supply_b,
            } => shares_for_cost(curve, *supply_a, *supply_b, amount, side),
            Self::Linear { price } => amount / price,
        }
    }
}

/// Share functions for every pool in a request, in input order.
pub struct PoolEvaluator<'a> {
    pricer: &'a LmsrPricer,
    side: Side,
    pools: &'a [PoolConfig],
    models: Vec<Result<PoolModel, String>>,
}

impl<'a> PoolEvaluator<'a> {
    pub fn new(
        pricer: &'a LmsrPricer,
        side: Side,
        pools: &'a [PoolConfig],
        models: Vec<Result<PoolModel, String>>,
    ) -> Self {
        Self {
            pricer,
            side,
            pools,
            models,
        }
    }

    pub fn len(&self) -> usize {
        self.pools.len()
    }

    pub fn is_available(&self, index: usize) -> bool {
        self.models[index].is_ok()
    }

    /// Fail with the first pool that could not be modelled.
    pub fn require_all(&self) -> Result<(), OptimizationError> {
        for (pool, model) in self.pools.iter().zip(&self.models) {
            if let Err(reason) = model {
                return Err(OptimizationError::PoolEvaluation {
                    pool: pool.to_string(),
                    reason: reason.clone(),
                });
            }
        }
        Ok(())
    }

    /// Integer shares and true cost for `amount` in pool `index`.
    ///
    /// A zero amount is always evaluable, even for an unavailable pool.
    pub fn evaluate(&self, index: usize, amount: f64) -> Result<(u64, f64), OptimizationError> {
        if amount <= 0.0 {
            return Ok((0, 0.0));
        }
        match &self.models[index] {
            Ok(PoolModel::Lmsr {
                curve,
                supply_a,
                supply_b,
            }) => Ok(self
                .pricer
                .shares_for_amount(curve, *supply_a, *supply_b, amount, self.side)),
            Ok(PoolModel::Linear { price }) => {
                let shares = (amount / price).floor();
                Ok((shares as u64, shares * price))
            }
            Err(reason) => Err(OptimizationError::PoolEvaluation {
                pool: self.pools[index].to_string(),
                reason: reason.clone(),
            }),
        }
    }

    /// Total integer shares for a full split.
    pub fn total_shares(&self, amounts: &[f64]) -> Result<u64, OptimizationError> {
        amounts
            .iter()
            .enumerate()
            .map(|(i, amount)| self.evaluate(i, *amount).map(|(shares, _)| shares))
            .sum()
    }

    /// Smooth objective: continuous shares per unit of budget.
    ///
    /// Unavailable pools contribute nothing.
    pub fn smooth_objective(&self, fractions: &[f64], total: f64) -> f64 {
        fractions
            .iter()
            .zip(&self.models)
            .map(|(fraction, model)| match model {
                Ok(model) => model.continuous_shares(fraction.max(0.0) * total, self.side),
                Err(_) => 0.0,
            })
            .sum::<f64>()
            / total
    }

    /// Central finite-difference gradient of [`Self::smooth_objective`].
    ///
    /// Falls back to a forward difference for pools too close to zero.
    pub fn smooth_gradient(&self, fractions: &[f64], total: f64, delta: f64) -> Vec<f64> {
        (0..fractions.len())
            .map(|i| {
                let mut ahead = fractions.to_vec();
                ahead[i] += delta;
                let mut behind = fractions.to_vec();
                let back = if fractions[i] >= delta { delta } else { 0.0 };
                behind[i] -= back;
                (self.smooth_objective(&ahead, total) - self.smooth_objective(&behind, total))
                    / (delta + back)
            })
            .collect()
    }

    /// Build the allocation for a split.
    pub fn allocation(&self, amounts: &[f64], strategy: Strategy) -> Result<OptimalAllocation, OptimizationError> {
        let allocations = amounts
            .iter()
            .enumerate()
            .map(|(i, amount)| {
                let (shares, cost) = self.evaluate(i, *amount)?;
                Ok(AllocationResult::new(self.pools[i].clone(), *amount, shares, cost))
            })
            .collect::<Result<Vec<_>, OptimizationError>>()?;
        Ok(OptimalAllocation::from_allocations(allocations, strategy))
    }

    /// All-in allocation to the single best available pool.
    pub fn best_single(&self, total: f64, strategy: Strategy) -> Option<OptimalAllocation> {
        let mut best: Option<OptimalAllocation> = None;
        for index in (0..self.len()).filter(|i| self.is_available(*i)) {
            let amounts = single_pool_split(self.len(), index, total);
            let Ok(candidate) = self.allocation(&amounts, strategy) else {
                continue;
            };
            if best
                .as_ref()
                .map_or(true, |b| candidate.total_shares > b.total_shares)
            {
                best = Some(candidate);
            }
        }
        best
    }
}

/// Everything in pool `index`, nothing elsewhere.
pub fn single_pool_split(pools: usize, index: usize, total: f64) -> Vec<f64> {
    let mut amounts = vec![0.0; pools];
    amounts[index] = total;
    amounts
}

/// Turn fractions into amounts that sum to `total` exactly.
///
/// Negative fractions are clipped and the rest renormalized; the last pool
/// absorbs rounding.
pub fn amounts_from_fractions(fractions: &[f64], total: f64) -> Vec<f64> {
    let n = fractions.len();
    let clipped: Vec<f64> = fractions.iter().map(|f| f.max(0.0)).collect();
    let sum: f64 = clipped.iter().sum();
    let normalized: Vec<f64> = if sum > 0.0 {
        clipped.iter().map(|f| f / sum).collect()
    } else {
        vec![1.0 / n as f64; n]
    };

    let mut amounts: Vec<f64> = normalized.iter().map(|f| f * total).collect();
    let head: f64 = amounts[..n - 1].iter().sum();
    amounts[n - 1] = (total - head).max(0.0);
    amounts
}
