//! Buy flow: allocate a new slip's collateral, place the orders, record
//! every filled order as a proxied bet and settle the slip's status.

use chrono::Utc;
use tracing::{info, warn};

use super::orchestrator::{BuyOutcome, Orchestrator};
use super::response;
use crate::domain::money::{from_base_units, to_base_units};
use crate::domain::{BetResponse, BetSlip, BetSlipStatus, ExecutionResult, PoolConfig, ProxiedBet, Side};
use crate::error::Result;

/// Failure reason when no order was filled.
const ALL_FAILED: &str = "All bets failed";

impl Orchestrator {
    pub(super) async fn buy(&self, slip: &BetSlip) -> BuyOutcome {
        info!(
            bet_slip_id = %slip.id,
            collateral = %slip.initial_collateral,
            option = slip.option_index,
            pools = slip.market_ids.len(),
            "Buy flow started"
        );

        if self.config.mark_processing {
            self.set_status(slip, BetSlipStatus::Processing).await;
        }

        let (execution, failure_reason) = match self.decode(slip) {
            Err(e) => (None, Some(format!("Pool config error: {e}"))),
            Ok((pools, side, amount)) => match self.place(&pools, side, amount).await {
                Err(e) => (None, Some(format!("Execution error: {e}"))),
                Ok(result) if result.success_rate() > 0.0 => (Some(result), None),
                Ok(result) => (Some(result), Some(ALL_FAILED.to_string())),
            },
        };

        let mut recorded = 0;
        if let Some(result) = &execution {
            for failed in &result.failed {
                warn!(
                    bet_slip_id = %slip.id,
                    endpoint = %failed.endpoint,
                    market_id = %failed.market_id,
                    error = failed.error.as_deref().unwrap_or("unknown"),
                    "Order failed"
                );
            }
            let side = slip.side().unwrap_or(Side::A);
            for filled in &result.successful {
                if self.record(slip, filled, side).await {
                    recorded += 1;
                }
            }
            info!(
                bet_slip_id = %slip.id,
                recorded,
                filled = result.successful.len(),
                "Proxied bets recorded"
            );
        }

        let status = if failure_reason.is_none() {
            BetSlipStatus::Placed
        } else {
            BetSlipStatus::Failed
        };
        if let Some(reason) = &failure_reason {
            warn!(bet_slip_id = %slip.id, reason = %reason, "Bet slip failed");
        }
        self.set_status(slip, status).await;

        BuyOutcome {
            bet_slip_id: slip.id,
            status,
            execution,
            recorded,
            failure_reason,
        }
    }

    /// Pools, side and budget in whole collateral units.
    fn decode(&self, slip: &BetSlip) -> Result<(Vec<PoolConfig>, Side, f64)> {
        let targets = slip.targets()?;
        let side = slip.side()?;
        let pools = self.registry.pools(&targets)?;
        let amount = from_base_units(slip.initial_collateral, self.config.collateral_decimals);
        Ok((pools, side, amount))
    }

    async fn place(&self, pools: &[PoolConfig], side: Side, amount: f64) -> Result<ExecutionResult> {
        let allocation = self
            .optimizer
            .optimize(pools, amount, side, self.config.strategy)
            .await?;
        let executor = self.executor.config();
        self.executor
            .execute(&allocation, side, executor.min_bet_amount, executor.dry_run)
            .await
    }

    async fn record(&self, slip: &BetSlip, filled: &BetResponse, side: Side) -> bool {
        let marketplace_id = match self.registry.marketplace_for_endpoint(&filled.endpoint) {
            Ok(id) => id,
            Err(e) => {
                warn!(bet_slip_id = %slip.id, error = %e, "Cannot record order");
                return false;
            }
        };
        let collateral = match to_base_units(filled.amount, self.config.collateral_decimals) {
            Ok(units) => units,
            Err(e) => {
                warn!(bet_slip_id = %slip.id, error = %e, "Cannot record order");
                return false;
            }
        };

        let body = filled.response.clone().unwrap_or_default();
        let shares = response::shares_bought(&body, filled.amount);
        if shares.estimated {
            warn!(
                bet_slip_id = %slip.id,
                endpoint = %filled.endpoint,
                shares = %shares.value,
                "Adapter reply has no share count, using collateral estimate"
            );
        }

        let timestamp = u64::try_from(Utc::now().timestamp()).unwrap_or_default();
        let bet = ProxiedBet::placed(
            slip.id,
            marketplace_id,
            filled.market_id,
            side,
            collateral,
            shares.value,
            timestamp,
        );
        let what = format!("record placed {}", bet.id.short());
        self.write(slip.id, &what, self.chain.record_proxied_bet_placed(&bet))
            .await
    }
}
