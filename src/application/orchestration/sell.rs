//! Sell flow: liquidate every proxied bet of a slip and close it.

use tracing::{info, warn};

use super::orchestrator::{Orchestrator, SellOutcome};
use super::response;
use crate::domain::money::to_base_units;
use crate::domain::{BetSlip, BetSlipStatus, ProxiedBet, ProxiedBetId};
use crate::error::{ExecutionError, Result};
use crate::port::outbound::marketplace::SellOrder;

impl Orchestrator {
    pub(super) async fn sell(&self, slip: &BetSlip) -> SellOutcome {
        info!(
            bet_slip_id = %slip.id,
            proxied_bets = slip.proxied_bet_ids.len(),
            "Sell flow started"
        );

        let mut sold = 0;
        for id in &slip.proxied_bet_ids {
            match self.sell_one(slip, *id).await {
                Ok(true) => sold += 1,
                Ok(false) => {}
                Err(e) => warn!(bet_slip_id = %slip.id, proxied_bet = %id.short(), error = %e, "Sale failed"),
            }
        }

        let closed = if sold > 0 {
            self.set_status(slip, BetSlipStatus::Closed).await
        } else {
            warn!(bet_slip_id = %slip.id, "No proxied bet sold, status unchanged");
            false
        };

        info!(
            bet_slip_id = %slip.id,
            sold,
            attempted = slip.proxied_bet_ids.len(),
            closed,
            "Sell flow finished"
        );
        SellOutcome {
            bet_slip_id: slip.id,
            attempted: slip.proxied_bet_ids.len(),
            sold,
            closed,
        }
    }

    /// Liquidate one proxied bet and record the sale.
    ///
    /// `Ok(false)` means the bet was skipped or the sale record failed. In
    /// dry-run mode nothing is sent and the sale counts as simulated.
    async fn sell_one(&self, slip: &BetSlip, id: ProxiedBetId) -> Result<bool> {
        let bet: ProxiedBet = self.chain.proxied_bet(id).await?;
        if bet.shares_bought == 0 {
            warn!(proxied_bet = %id.short(), "Proxied bet holds no shares, skipping");
            return Ok(false);
        }
        if bet.shares_sold > 0 {
            info!(proxied_bet = %id.short(), shares_sold = %bet.shares_sold, "Already sold, skipping");
            return Ok(false);
        }

        let endpoint = self.registry.endpoint_for_marketplace(bet.marketplace_id)?;
        if self.executor.config().dry_run {
            info!(
                proxied_bet = %id.short(),
                endpoint,
                shares = %bet.shares_bought,
                "Dry run, sale simulated"
            );
            return Ok(true);
        }
        let order = SellOrder {
            market_id: bet.market_id,
            option_index: bet.option_index,
            amount: bet.shares_bought,
        };
        let reply = self.marketplace.sell_shares(endpoint, &order).await?;
        if !reply.is_success() {
            let body = reply.body.to_string();
            if body.to_ascii_lowercase().contains("slippage") {
                warn!(proxied_bet = %id.short(), "Sale rejected for slippage");
            }
            return Err(ExecutionError::Request(format!(
                "sell rejected with HTTP {}: {body}",
                reply.status
            ))
            .into());
        }

        let collateral = response::collateral_received(&reply.body, bet.shares_bought);
        if collateral.estimated {
            warn!(
                proxied_bet = %id.short(),
                shares = %bet.shares_bought,
                "Adapter reply has no collateral, assuming one unit per share"
            );
        }
        let collateral_base = to_base_units(collateral.value, self.config.collateral_decimals)?;

        let what = format!("record sold {}", id.short());
        Ok(self
            .write(
                slip.id,
                &what,
                self.chain
                    .record_proxied_bet_sold(id, bet.shares_bought, collateral_base),
            )
            .await)
    }
}
