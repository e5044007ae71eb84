//! Handler for the `quote` command.

use serde::Serialize;

use super::command::QuoteArgs;
use super::output;
use crate::application::pricing::{price, LmsrPricer, PricingConfig};
use crate::domain::{CalibratedCurve, Side};
use crate::error::{PricingError, Result};

/// One purchase priced against a freshly calibrated curve.
#[derive(Debug, Clone, Serialize)]
pub struct Quote {
    pub curve: CalibratedCurve,
    pub side: Side,
    pub price_a: f64,
    pub price_b: f64,
    pub amount: f64,
    pub shares: u64,
    pub cost: f64,
    /// Price of `side` after the purchase.
    pub price_after: f64,
}

/// Calibrate and size the purchase described by `args`.
///
/// # Errors
///
/// Returns a [`PricingError`] for unusable reserves or a non-positive
/// amount.
pub fn quote(args: &QuoteArgs) -> Result<Quote> {
    if !(args.amount > 0.0 && args.amount.is_finite()) {
        return Err(PricingError::InvalidAmount(args.amount).into());
    }
    let mut config = PricingConfig::default();
    if let Some(fraction) = args.max_loss_fraction {
        config.max_loss_fraction = fraction;
    }
    let pricer = LmsrPricer::new(config);
    let curve = pricer.calibrate(args.liquidity_a, args.liquidity_b)?;
    let (shares, cost) = pricer.shares_for_amount(&curve, args.supply_a, args.supply_b, args.amount, args.side);

    let bought = shares as f64;
    let (after_a, after_b) = match args.side {
        Side::A => (args.supply_a + bought, args.supply_b),
        Side::B => (args.supply_a, args.supply_b + bought),
    };

    Ok(Quote {
        curve,
        side: args.side,
        price_a: price(&curve, args.supply_a, args.supply_b, Side::A),
        price_b: price(&curve, args.supply_a, args.supply_b, Side::B),
        amount: args.amount,
        shares,
        cost,
        price_after: price(&curve, after_a, after_b, args.side),
    })
}

/// Print a quote. Pure computation, no configuration or I/O.
///
/// # Errors
///
/// See [`quote`].
pub fn execute(args: &QuoteArgs) -> Result<()> {
    let quote = quote(args)?;
    if output::is_json() {
        output::payload("quote", &quote);
        return Ok(());
    }

    output::section("Curve");
    output::field("b", format!("{:.4}", quote.curve.b));
    output::field("q_a", format!("{:.4}", quote.curve.initial_q_a));
    output::field("q_b", format!("{:.4}", quote.curve.initial_q_b));
    output::field("max loss", format!("{:.4}", quote.curve.max_loss));
    if !quote.curve.quality.is_exact() {
        output::warning(&format!(
            "Best-effort calibration (prices converged: {}, loss within cap: {})",
            quote.curve.quality.price_converged, quote.curve.quality.loss_within_cap
        ));
    }

    output::section("Purchase");
    output::field("price A", format!("{:.6}", quote.price_a));
    output::field("price B", format!("{:.6}", quote.price_b));
    output::field("side", quote.side);
    output::field("amount", quote.amount);
    output::field("shares", output::highlight(quote.shares));
    output::field("cost", format!("{:.6}", quote.cost));
    output::field("price after", format!("{:.6}", quote.price_after));
    if quote.shares == 0 {
        output::note("Amount too small to buy a whole share");
    }
    Ok(())
}
