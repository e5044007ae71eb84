//! Handler for the `process` command.

use serde::Serialize;
use tabled::Tabled;

use super::command::ProcessArgs;
use super::output;
use crate::application::orchestration::{BuyOutcome, SellOutcome};
use crate::domain::BetResponse;
use crate::error::Result;

#[derive(Debug, Tabled, Serialize)]
struct OrderRow {
    #[tabled(rename = "Endpoint")]
    endpoint: String,
    #[tabled(rename = "Market")]
    market: u64,
    #[tabled(rename = "Amount")]
    amount: String,
    #[tabled(rename = "Result")]
    result: String,
}

impl From<&BetResponse> for OrderRow {
    fn from(response: &BetResponse) -> Self {
        let result = if response.success {
            "filled".to_string()
        } else {
            response.error.clone().unwrap_or_else(|| "failed".to_string())
        };
        Self {
            endpoint: response.endpoint.clone(),
            market: response.market_id.value(),
            amount: format!("{:.4}", response.amount),
            result,
        }
    }
}

fn print_buy(outcome: &BuyOutcome) {
    output::section(&format!("Bet slip {} buy", outcome.bet_slip_id));
    output::field("Status", format!("{:?}", outcome.status));
    if let Some(execution) = &outcome.execution {
        let rows: Vec<OrderRow> = execution
            .successful
            .iter()
            .chain(execution.failed.iter())
            .map(OrderRow::from)
            .collect();
        output::table("orders", &rows);
        output::field("Strategy", &execution.strategy_label);
        output::field("Success rate", format!("{:.1}%", execution.success_rate() * 100.0));
        output::field("Executed", format!("{:.4}", execution.total_executed_amount()));
    }
    output::field("Recorded", outcome.recorded);
    match &outcome.failure_reason {
        Some(reason) => output::warning(reason),
        None => output::success("Slip placed"),
    }
}

fn print_sell(outcome: &SellOutcome) {
    output::section(&format!("Bet slip {} sell", outcome.bet_slip_id));
    output::field("Attempted", outcome.attempted);
    output::field("Sold", outcome.sold);
    if outcome.closed {
        output::success("Slip closed");
    } else {
        output::warning("Nothing sold, slip left open");
    }
}

/// Run one flow for a slip against the live contract.
///
/// # Errors
///
/// Fails on configuration errors or when the slip cannot be read.
#[cfg(feature = "chain")]
pub async fn execute(args: &ProcessArgs) -> Result<()> {
    use crate::application::orchestration::FlowOutcome;
    use crate::domain::BetSlipId;
    use crate::infrastructure::bootstrap;
    use crate::infrastructure::config::Config;

    let mut config = Config::load(&args.config)?;
    if args.dry_run {
        config.executor.dry_run = true;
    }
    config.validate_for_run()?;
    config.init_logging();

    let services = bootstrap::build_services(&config)?;
    let chain = bootstrap::connect_chain(&config)?;
    let orchestrator = bootstrap::build_orchestrator(&config, &services, chain);

    match orchestrator.process(BetSlipId::new(args.slip), args.sell).await? {
        FlowOutcome::Buy(outcome) => print_buy(&outcome),
        FlowOutcome::Sell(outcome) => print_sell(&outcome),
    }
    Ok(())
}

/// # Errors
///
/// Always fails.
#[cfg(not(feature = "chain"))]
pub async fn execute(_args: &ProcessArgs) -> Result<()> {
    let _ = (print_buy, print_sell);
    Err(crate::error::ConfigError::Other("process requires the `chain` feature".to_string()).into())
}
