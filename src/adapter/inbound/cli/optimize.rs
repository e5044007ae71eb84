//! Handler for the `optimize` command.

use serde::Serialize;
use tabled::Tabled;

use super::command::OptimizeArgs;
use super::output;
use crate::domain::OptimalAllocation;
use crate::error::Result;
use crate::infrastructure::bootstrap;
use crate::infrastructure::config::Config;

#[derive(Debug, Tabled, Serialize)]
pub struct AllocationRow {
    #[tabled(rename = "Pool")]
    pub pool: String,
    #[tabled(rename = "Amount")]
    pub amount: String,
    #[tabled(rename = "Shares")]
    pub shares: u64,
    #[tabled(rename = "Cost")]
    pub cost: String,
    #[tabled(rename = "Shares/unit")]
    pub efficiency: String,
}

#[derive(Debug, Tabled, Serialize)]
pub struct ComparisonRow {
    #[tabled(rename = "Strategy")]
    pub strategy: String,
    #[tabled(rename = "Shares")]
    pub shares: String,
    #[tabled(rename = "Cost")]
    pub cost: String,
    #[tabled(rename = "Split")]
    pub split: String,
}

#[must_use]
pub fn allocation_rows(allocation: &OptimalAllocation) -> Vec<AllocationRow> {
    allocation
        .allocations
        .iter()
        .map(|a| AllocationRow {
            pool: a.pool.to_string(),
            amount: format!("{:.4}", a.amount_allocated),
            shares: a.shares_received,
            cost: format!("{:.4}", a.actual_cost),
            efficiency: format!("{:.4}", a.efficiency),
        })
        .collect()
}

fn split(allocation: &OptimalAllocation) -> String {
    allocation
        .allocations
        .iter()
        .map(|a| format!("{:.2}", a.amount_allocated))
        .collect::<Vec<_>>()
        .join(" / ")
}

fn comparison_row(label: &str, outcome: &Result<OptimalAllocation>) -> ComparisonRow {
    match outcome {
        Ok(allocation) => ComparisonRow {
            strategy: label.to_string(),
            shares: allocation.total_shares.to_string(),
            cost: format!("{:.4}", allocation.total_cost),
            split: split(allocation),
        },
        Err(e) => ComparisonRow {
            strategy: label.to_string(),
            shares: "-".to_string(),
            cost: "-".to_string(),
            split: e.to_string(),
        },
    }
}

/// Preview an allocation against the configured pool store.
///
/// Places no orders and touches neither the adapter's buy route nor the
/// chain.
///
/// # Errors
///
/// Fails on configuration, registry lookup or, without `--compare`,
/// optimization errors.
pub async fn execute(args: &OptimizeArgs) -> Result<()> {
    let config = Config::load(&args.config)?;
    config.init_logging();
    let services = bootstrap::build_services(&config)?;
    let pools = services.registry.pools(&args.pools)?;

    if args.compare {
        let mut rows = Vec::new();
        for (strategy, outcome) in services.optimizer.compare(&pools, args.amount, args.side).await {
            rows.push(comparison_row(strategy.as_str(), &outcome));
        }
        let single = services
            .optimizer
            .best_single_pool(&pools, args.amount, args.side)
            .await;
        rows.push(comparison_row("best single", &single));

        output::section(&format!("Strategies for {} on side {}", args.amount, args.side));
        output::table("comparison", &rows);
        return Ok(());
    }

    let strategy = args.strategy.unwrap_or(config.optimizer.default_strategy);
    let allocation = services
        .optimizer
        .optimize(&pools, args.amount, args.side, strategy)
        .await?;

    output::section(&format!("{} allocation", allocation.strategy));
    output::table("allocation", &allocation_rows(&allocation));
    output::field("Total shares", output::highlight(allocation.total_shares));
    output::field("Total cost", format!("{:.4}", allocation.total_cost));
    output::field("Efficiency", format!("{:.4}", allocation.efficiency));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{AllocationResult, Strategy};
    use crate::error::OptimizationError;
    use crate::testkit::domain::pool;

    #[test]
    fn rows_follow_allocation_order() {
        let allocation = OptimalAllocation::from_allocations(
            vec![
                AllocationResult::new(pool(10, "schema_alpha"), 60.0, 90, 59.5),
                AllocationResult::new(pool(20, "schema_beta"), 40.0, 70, 39.8),
            ],
            Strategy::Grid,
        );
        let rows = allocation_rows(&allocation);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].pool, "schema_alpha/10");
        assert_eq!(rows[0].shares, 90);
        assert_eq!(rows[1].amount, "40.0000");
        assert_eq!(split(&allocation), "60.00 / 40.00");
    }

    #[test]
    fn failed_strategy_shows_reason() {
        let outcome: Result<OptimalAllocation> = Err(OptimizationError::SolverUnavailable.into());
        let row = comparison_row("constrained", &outcome);
        assert_eq!(row.shares, "-");
        assert!(row.split.contains("solver"));
    }
}
