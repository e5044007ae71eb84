//! Allocation strategies and results.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::pool::PoolConfig;

/// Budget-splitting strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    /// Discretized simplex enumeration.
    #[default]
    Grid,
    /// Ternary search over a two-pool split.
    Ternary,
    /// Projected gradient ascent.
    Gradient,
    /// Conditional-gradient solve backed by an LP solver.
    Constrained,
}

impl Strategy {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Grid => "grid",
            Self::Ternary => "ternary",
            Self::Gradient => "gradient",
            Self::Constrained => "constrained",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Strategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "grid" | "grid_search" => Ok(Self::Grid),
            "ternary" | "binary" | "binary_search" => Ok(Self::Ternary),
            "gradient" | "gradient_descent" => Ok(Self::Gradient),
            "constrained" | "convex" | "convex_optimization" => Ok(Self::Constrained),
            other => Err(format!(
                "unknown strategy '{other}' (expected grid|ternary|gradient|constrained)"
            )),
        }
    }
}

/// Amount routed to one pool and what it buys.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AllocationResult {
    pub pool: PoolConfig,
    pub amount_allocated: f64,
    pub shares_received: u64,
    pub actual_cost: f64,
    /// Shares per unit of cost, 0 when nothing was spent.
    pub efficiency: f64,
}

impl AllocationResult {
    pub fn new(pool: PoolConfig, amount_allocated: f64, shares_received: u64, actual_cost: f64) -> Self {
        Self {
            pool,
            amount_allocated,
            shares_received,
            actual_cost,
            efficiency: efficiency(shares_received, actual_cost),
        }
    }
}

/// A full budget split across pools.
///
/// `Σ amount_allocated` equals the requested total, and for two or more
/// pools `total_shares` is never below the best single-pool outcome.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OptimalAllocation {
    pub total_shares: u64,
    pub total_cost: f64,
    pub allocations: Vec<AllocationResult>,
    pub efficiency: f64,
    pub strategy: Strategy,
}

impl OptimalAllocation {
    pub fn from_allocations(allocations: Vec<AllocationResult>, strategy: Strategy) -> Self {
        let total_shares = allocations.iter().map(|a| a.shares_received).sum();
        let total_cost = allocations.iter().map(|a| a.actual_cost).sum();
        Self {
            total_shares,
            total_cost,
            efficiency: efficiency(total_shares, total_cost),
            allocations,
            strategy,
        }
    }

    /// Sum of allocated amounts.
    #[must_use]
    pub fn total_allocated(&self) -> f64 {
        self.allocations.iter().map(|a| a.amount_allocated).sum()
    }
}

fn efficiency(shares: u64, cost: f64) -> f64 {
    if cost > 0.0 {
        shares as f64 / cost
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{MarketId, MarketType};

    #[test]
    fn efficiency_is_zero_without_cost() {
        let pool = PoolConfig::new(MarketId::new(1), "s", MarketType::Lmsr);
        let result = AllocationResult::new(pool, 0.0, 0, 0.0);
        assert_eq!(result.efficiency, 0.0);
    }

    #[test]
    fn totals_aggregate_allocations() {
        let pool = PoolConfig::new(MarketId::new(1), "s", MarketType::Lmsr);
        let allocation = OptimalAllocation::from_allocations(
            vec![
                AllocationResult::new(pool.clone(), 40.0, 80, 39.5),
                AllocationResult::new(pool, 60.0, 100, 60.0),
            ],
            Strategy::Grid,
        );
        assert_eq!(allocation.total_shares, 180);
        assert!((allocation.total_allocated() - 100.0).abs() < 1e-12);
        assert!((allocation.efficiency - 180.0 / 99.5).abs() < 1e-12);
    }

    #[test]
    fn strategy_parses_aliases() {
        assert_eq!("grid_search".parse::<Strategy>().unwrap(), Strategy::Grid);
        assert_eq!("convex".parse::<Strategy>().unwrap(), Strategy::Constrained);
        assert!("simplex".parse::<Strategy>().is_err());
    }
}
