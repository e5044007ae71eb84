//! LMSR calibration and share pricing.
//!
//! A two-outcome LMSR with liquidity `b` and outstanding quantities
//! `(q_a, q_b)` has cost function
//!
//! ```text
//! C(q) = b * ln(e^(q_a/b) + e^(q_b/b))
//! ```
//!
//! and instantaneous price `p_a = e^(q_a/b) / (e^(q_a/b) + e^(q_b/b))`.
//! Pools only expose raw reserves, so the curve is reconstructed: the
//! reserve ratio gives the target odds, `b` is seeded from total liquidity
//! and shrunk until the worst-case loss fits under the cap.

use std::f64::consts::LN_2;

use serde::Deserialize;
use tracing::trace;

use super::numeric::{log_add_exp, logistic_complement, softplus, stable_exp};
use crate::domain::{CalibratedCurve, CalibrationQuality, Side};
use crate::error::PricingError;

/// Calibration and search tunables.
///
/// Every cap here is a latency/precision trade-off rather than a
/// correctness bound.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct PricingConfig {
    /// Worst-case loss allowed, as a fraction of total liquidity.
    pub max_loss_fraction: f64,
    /// Absolute tolerance between reconstructed and target prices.
    pub price_tolerance: f64,
    /// Price correction passes per derivation.
    pub max_price_corrections: usize,
    /// Maximum number of times `b` is shrunk.
    pub max_b_iterations: usize,
    /// Multiplier applied to `b` on each shrink.
    pub b_shrink_factor: f64,
    /// Amounts below this use the marginal-price estimate first.
    pub small_amount_threshold: f64,
    /// Haircut applied to the marginal-price estimate.
    pub small_amount_discount: f64,
    /// Bisection upper bound, in shares per unit of collateral.
    pub bisection_upper_multiplier: f64,
    pub bisection_max_steps: usize,
    /// Odds clamp applied when one side has no liquidity.
    pub min_price: f64,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            max_loss_fraction: 1.0,
            price_tolerance: 0.001,
            max_price_corrections: 5,
            max_b_iterations: 5,
            b_shrink_factor: 0.95,
            small_amount_threshold: 10.0,
            small_amount_discount: 0.95,
            bisection_upper_multiplier: 50.0,
            bisection_max_steps: 10,
            min_price: 1e-5,
        }
    }
}

/// Calibrates curves and sizes purchases against them.
#[derive(Debug, Clone, Default)]
pub struct LmsrPricer {
    config: PricingConfig,
}

struct Derivation {
    q_a: f64,
    q_b: f64,
    corrections: usize,
    converged: bool,
}

impl LmsrPricer {
    #[must_use]
    pub const fn new(config: PricingConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub const fn config(&self) -> &PricingConfig {
        &self.config
    }

    /// Build a curve whose initial prices match the reserve ratio.
    ///
    /// Hitting either correction cap is not an error: the best-effort curve
    /// is returned and [`CalibratedCurve::quality`] says which target was
    /// missed.
    ///
    /// # Errors
    ///
    /// Returns [`PricingError::NonPositiveLiquidity`] when either side is
    /// negative or the total is not positive.
    pub fn calibrate(&self, liquidity_a: f64, liquidity_b: f64) -> Result<CalibratedCurve, PricingError> {
        let total = liquidity_a + liquidity_b;
        if !(liquidity_a >= 0.0 && liquidity_b >= 0.0 && total > 0.0 && total.is_finite()) {
            return Err(PricingError::NonPositiveLiquidity {
                liquidity_a,
                liquidity_b,
            });
        }

        let cfg = &self.config;
        let mut price_a = liquidity_a / total;
        if liquidity_a == 0.0 || liquidity_b == 0.0 {
            price_a = price_a.clamp(cfg.min_price, 1.0 - cfg.min_price);
        }
        let price_b = 1.0 - price_a;

        let loss_cap = total * cfg.max_loss_fraction;
        let mut b = loss_cap / LN_2;
        let mut shrinks = 0;

        loop {
            let derivation = self.derive(b, price_a, price_b);
            let max_loss = worst_case_loss(b, derivation.q_a - derivation.q_b);
            let within_cap = max_loss <= loss_cap;

            if within_cap || shrinks >= cfg.max_b_iterations {
                let quality = CalibrationQuality {
                    price_converged: derivation.converged,
                    loss_within_cap: within_cap,
                    price_corrections: derivation.corrections,
                    b_iterations: shrinks,
                };
                trace!(b, max_loss, loss_cap, ?quality, "Calibrated LMSR curve");
                return Ok(CalibratedCurve {
                    b,
                    initial_q_a: derivation.q_a,
                    initial_q_b: derivation.q_b,
                    initial_price_a: price_a,
                    initial_price_b: price_b,
                    max_loss,
                    quality,
                });
            }

            b *= cfg.b_shrink_factor;
            shrinks += 1;
        }
    }

    /// Solve quantities for a fixed `b`. The dominant side sits at zero.
    fn derive(&self, b: f64, price_a: f64, price_b: f64) -> Derivation {
        let cfg = &self.config;
        let a_dominant = price_a >= price_b;
        let (dominant, trailing) = if a_dominant {
            (price_a, price_b)
        } else {
            (price_b, price_a)
        };
        let split = |q_other: f64| if a_dominant { (0.0, q_other) } else { (q_other, 0.0) };

        let mut q_other = b * (trailing / dominant).ln();
        let mut corrections = 0;

        loop {
            let (q_a, q_b) = split(q_other);
            let actual_a = logistic_complement((q_b - q_a) / b);
            let actual_b = logistic_complement((q_a - q_b) / b);

            let converged = (actual_a - price_a).abs() <= cfg.price_tolerance
                && (actual_b - price_b).abs() <= cfg.price_tolerance;
            if converged || corrections >= cfg.max_price_corrections {
                return Derivation {
                    q_a,
                    q_b,
                    corrections,
                    converged,
                };
            }

            let actual_dominant = if a_dominant { actual_a } else { actual_b };
            q_other *= dominant / actual_dominant;
            corrections += 1;
        }
    }

    /// Largest affordable share count for `amount` and its true cost.
    ///
    /// Small amounts first try a discounted marginal-price estimate; if that
    /// overspends, or the amount is large, a bounded bisection over integer
    /// share counts runs on `[0, amount * bisection_upper_multiplier]`.
    /// The bracket is first narrowed around the closed-form inverse of the
    /// cost function, so the default step cap converges to the largest
    /// affordable count and more collateral never buys fewer shares. The
    /// result is never over budget.
    #[must_use]
    pub fn shares_for_amount(
        &self,
        curve: &CalibratedCurve,
        supply_a: f64,
        supply_b: f64,
        amount: f64,
        side: Side,
    ) -> (u64, f64) {
        if !(amount > 0.0 && amount.is_finite()) {
            return (0, 0.0);
        }
        let cfg = &self.config;
        let spend = |shares: f64| cost_of_shares(curve, supply_a, supply_b, shares, side);

        if amount < cfg.small_amount_threshold {
            let marginal = price(curve, supply_a, supply_b, side);
            let estimate = (cfg.small_amount_discount * amount / marginal).floor();
            if marginal > 0.0 && estimate.is_finite() && estimate >= 0.0 {
                let spent = spend(estimate);
                if spent <= amount {
                    return (estimate as u64, spent);
                }
            }
        }

        let (mut low, mut high) = self.bracket(curve, supply_a, supply_b, amount, side);
        let mut steps = 0;
        while high - low > 1.0 && steps < cfg.bisection_max_steps {
            steps += 1;
            let mid = ((low + high) / 2.0).floor().max(low + 1.0);
            if spend(mid) <= amount {
                low = mid;
            } else {
                high = mid;
            }
        }

        if low < 1.0 {
            return (0, 0.0);
        }
        (low as u64, spend(low))
    }

    /// Integer search bounds with `low` affordable and `high` excluded.
    ///
    /// Starts from `[0, amount * bisection_upper_multiplier]` and tightens
    /// to a few shares around [`shares_for_cost`], falling back to the wide
    /// bound on whichever side the check fails.
    fn bracket(&self, curve: &CalibratedCurve, supply_a: f64, supply_b: f64, amount: f64, side: Side) -> (f64, f64) {
        let spend = |shares: f64| cost_of_shares(curve, supply_a, supply_b, shares, side);
        let ceiling = amount * self.config.bisection_upper_multiplier;
        let target = shares_for_cost(curve, supply_a, supply_b, amount, side);
        if !target.is_finite() || ceiling < 1.0 {
            return (0.0, ceiling);
        }

        let center = target.min(ceiling).floor();
        let mut low = (center - 1.0).max(0.0);
        if spend(low) > amount {
            low = 0.0;
        }
        let mut high = (center + 2.0).min(ceiling);
        if high < ceiling && spend(high) <= amount {
            high = ceiling;
        }
        trace!(target, low, high, "Narrowed share bracket");
        (low, high)
    }
}

/// Continuous share count whose cost is exactly `amount`.
///
/// Inverts the cost function in closed form:
/// `s = A + b * (ln(1 - p_other * e^(-A/b)) - ln p_self)`.
#[must_use]
pub fn shares_for_cost(curve: &CalibratedCurve, supply_a: f64, supply_b: f64, amount: f64, side: Side) -> f64 {
    if amount <= 0.0 {
        return 0.0;
    }
    let q_a = curve.initial_q_a + supply_a;
    let q_b = curve.initial_q_b + supply_b;
    let d = match side {
        Side::A => (q_b - q_a) / curve.b,
        Side::B => (q_a - q_b) / curve.b,
    };
    let ln_p_self = -softplus(d);
    let ln_p_other = -softplus(-d);
    let tail = (ln_p_other - amount / curve.b).exp();
    amount + curve.b * ((-tail).ln_1p() - ln_p_self)
}

/// Instantaneous price of `side` at the given outstanding supplies.
#[must_use]
pub fn price(curve: &CalibratedCurve, supply_a: f64, supply_b: f64, side: Side) -> f64 {
    let q_a = curve.initial_q_a + supply_a;
    let q_b = curve.initial_q_b + supply_b;
    match side {
        Side::A => logistic_complement((q_b - q_a) / curve.b),
        Side::B => logistic_complement((q_a - q_b) / curve.b),
    }
}

/// LMSR cost function `C(q)` at the given supplies.
#[must_use]
pub fn cost(curve: &CalibratedCurve, supply_a: f64, supply_b: f64) -> f64 {
    let q_a = curve.initial_q_a + supply_a;
    let q_b = curve.initial_q_b + supply_b;
    curve.b * log_add_exp(q_a / curve.b, q_b / curve.b)
}

/// `C(q + shares on side) - C(q)`, evaluated without forming either term.
///
/// Uses `ΔC = s + b * ln(p_self + p_other * e^(-s/b))` in log space so
/// neither large quantities nor large purchases overflow.
#[must_use]
pub fn cost_of_shares(curve: &CalibratedCurve, supply_a: f64, supply_b: f64, shares: f64, side: Side) -> f64 {
    let q_a = curve.initial_q_a + supply_a;
    let q_b = curve.initial_q_b + supply_b;
    let (q_self, q_other) = match side {
        Side::A => (q_a, q_b),
        Side::B => (q_b, q_a),
    };
    let d = (q_other - q_self) / curve.b;
    let ln_p_self = -softplus(d);
    let ln_p_other = -softplus(-d);
    shares + curve.b * log_add_exp(ln_p_self, ln_p_other - shares / curve.b)
}

/// Market maker loss if either outcome resolves, whichever is larger.
fn worst_case_loss(b: f64, delta_q: f64) -> f64 {
    let if_b_wins = b * (1.0 + stable_exp(delta_q / b)).ln();
    let if_a_wins = b * (1.0 + stable_exp(-delta_q / b)).ln();
    if_b_wins.max(if_a_wins)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pricer() -> LmsrPricer {
        LmsrPricer::default()
    }

    #[test]
    fn calibrated_price_matches_reserve_ratio() {
        let cases = [
            (400_000.0, 600_000.0),
            (100_000.0, 900_000.0),
            (1.0, 1.0),
            (0.4, 0.6),
            (0.0, 1.0),
            (1.0, 0.0),
            (1e-9, 1.0),
            (1e6, 1.0),
            (3.0, 7_000.0),
        ];
        for (a, b) in cases {
            let curve = pricer().calibrate(a, b).unwrap();
            let target = a / (a + b);
            let actual = price(&curve, 0.0, 0.0, Side::A);
            assert!(curve.b > 0.0, "b must be positive for ({a}, {b})");
            assert!(
                (actual - target).abs() <= 0.001,
                "({a}, {b}): price {actual} vs target {target}"
            );
        }
    }

    #[test]
    fn calibration_is_deterministic() {
        let first = pricer().calibrate(411.6, 597.8).unwrap();
        let second = pricer().calibrate(411.6, 597.8).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn calibration_rejects_non_positive_liquidity() {
        for (a, b) in [(0.0, 0.0), (-1.0, 2.0), (2.0, -1.0), (f64::NAN, 1.0)] {
            assert!(matches!(
                pricer().calibrate(a, b),
                Err(PricingError::NonPositiveLiquidity { .. })
            ));
        }
    }

    #[test]
    fn skewed_pool_stops_shrinking_at_the_iteration_cap() {
        let curve = pricer().calibrate(0.4, 0.6).unwrap();
        let seeded = 1.0 / LN_2;

        assert_eq!(curve.quality.b_iterations, 5);
        assert!(!curve.quality.loss_within_cap);
        assert!(curve.quality.price_converged);
        assert!((curve.b - seeded * 0.95_f64.powi(5)).abs() < 1e-12);
        assert!(curve.max_loss > 1.0);
    }

    #[test]
    fn more_shrink_iterations_bring_loss_under_cap() {
        let pricer = LmsrPricer::new(PricingConfig {
            max_b_iterations: 20,
            ..PricingConfig::default()
        });
        let curve = pricer.calibrate(0.4, 0.6).unwrap();

        assert!(curve.quality.loss_within_cap);
        assert!(curve.quality.is_exact());
        assert!(curve.max_loss <= 1.0);
        assert_eq!(curve.quality.b_iterations, 6);
    }

    #[test]
    fn unreachable_price_tolerance_is_flagged_not_failed() {
        let pricer = LmsrPricer::new(PricingConfig {
            price_tolerance: 1e-9,
            ..PricingConfig::default()
        });
        let curve = pricer.calibrate(0.0, 1.0).unwrap();

        assert!(!curve.quality.price_converged);
        assert_eq!(curve.quality.price_corrections, 5);
        assert!(!curve.quality.is_exact());
    }

    #[test]
    fn prices_are_complementary_and_rise_with_own_supply() {
        let curve = pricer().calibrate(300.0, 700.0).unwrap();
        let a = price(&curve, 0.0, 0.0, Side::A);
        let b = price(&curve, 0.0, 0.0, Side::B);
        assert!((a + b - 1.0).abs() < 1e-12);
        assert!(price(&curve, 50.0, 0.0, Side::A) > a);
        assert!(price(&curve, 0.0, 50.0, Side::A) < a);
    }

    #[test]
    fn cost_of_shares_matches_cost_difference() {
        let curve = pricer().calibrate(300.0, 700.0).unwrap();
        for shares in [1.0, 25.0, 400.0] {
            let direct = cost(&curve, 10.0 + shares, 5.0) - cost(&curve, 10.0, 5.0);
            let delta = cost_of_shares(&curve, 10.0, 5.0, shares, Side::A);
            assert!((direct - delta).abs() < 1e-6, "shares={shares}");
        }
    }

    #[test]
    fn cost_of_shares_survives_huge_purchases() {
        let curve = pricer().calibrate(0.4, 0.6).unwrap();
        let spent = cost_of_shares(&curve, 0.0, 0.0, 1e7, Side::A);
        assert!(spent.is_finite());
        assert!(spent < 1e7);
    }

    #[test]
    fn non_positive_amount_buys_nothing() {
        let curve = pricer().calibrate(1.0, 1.0).unwrap();
        assert_eq!(pricer().shares_for_amount(&curve, 0.0, 0.0, 0.0, Side::A), (0, 0.0));
        assert_eq!(pricer().shares_for_amount(&curve, 0.0, 0.0, -5.0, Side::B), (0, 0.0));
    }

    #[test]
    fn small_amount_uses_discounted_marginal_price() {
        let curve = pricer().calibrate(1000.0, 1000.0).unwrap();
        let (shares, spent) = pricer().shares_for_amount(&curve, 0.0, 0.0, 5.0, Side::A);
        assert_eq!(shares, 9);
        assert!(spent <= 5.0);
    }

    #[test]
    fn purchases_never_overspend() {
        let curve = pricer().calibrate(0.4, 0.6).unwrap();
        for amount in [0.5, 3.0, 9.99, 10.0, 77.0, 1000.0] {
            for side in [Side::A, Side::B] {
                let (_, spent) = pricer().shares_for_amount(&curve, 0.0, 0.0, amount, side);
                assert!(spent <= amount + 1e-9, "amount={amount} side={side}");
            }
        }
    }

    #[test]
    fn shares_are_monotonic_in_amount_with_default_caps() {
        for (a, b) in [(0.4, 0.6), (400.0, 600.0), (40_000.0, 60_000.0), (900.0, 100.0)] {
            let curve = pricer().calibrate(a, b).unwrap();
            for side in [Side::A, Side::B] {
                let mut previous = 0;
                for step in 1..=2000 {
                    let amount = f64::from(step) * 0.5;
                    let (shares, _) = pricer().shares_for_amount(&curve, 0.0, 0.0, amount, side);
                    assert!(
                        shares >= previous,
                        "({a}, {b}) {side} amount={amount}: {shares} < {previous}"
                    );
                    previous = shares;
                }
            }
        }
    }

    #[test]
    fn default_caps_find_the_largest_affordable_count() {
        let curve = pricer().calibrate(400.0, 600.0).unwrap();
        for amount in [10.0, 28.5, 51.0, 614.5, 5000.0] {
            let (shares, spent) = pricer().shares_for_amount(&curve, 0.0, 0.0, amount, Side::A);
            assert!(spent <= amount, "amount={amount}");
            let next = cost_of_shares(&curve, 0.0, 0.0, shares as f64 + 1.0, Side::A);
            assert!(next > amount, "amount={amount}: {shares} is not the largest count");
        }
    }

    #[test]
    fn shares_for_cost_inverts_the_cost_function() {
        let curve = pricer().calibrate(0.4, 0.6).unwrap();
        for amount in [0.5, 10.0, 1000.0] {
            for side in [Side::A, Side::B] {
                let shares = shares_for_cost(&curve, 2.0, 1.0, amount, side);
                let spent = cost_of_shares(&curve, 2.0, 1.0, shares, side);
                assert!((spent - amount).abs() < 1e-6, "amount={amount} side={side}");
            }
        }
        assert_eq!(shares_for_cost(&curve, 0.0, 0.0, 0.0, Side::A), 0.0);
    }

    #[test]
    fn converged_bisection_is_monotonic_for_fine_grained_amounts() {
        let pricer = LmsrPricer::new(PricingConfig {
            bisection_max_steps: 64,
            ..PricingConfig::default()
        });
        let curve = pricer.calibrate(40.0, 60.0).unwrap();
        let mut previous = 0;
        for step in 1..=400 {
            let amount = f64::from(step) * 0.5;
            let (shares, _) = pricer.shares_for_amount(&curve, 3.0, 1.0, amount, Side::B);
            assert!(shares >= previous, "amount={amount}: {shares} < {previous}");
            previous = shares;
        }
    }

    #[test]
    fn converged_bisection_finds_the_largest_affordable_count() {
        let pricer = LmsrPricer::new(PricingConfig {
            bisection_max_steps: 64,
            ..PricingConfig::default()
        });
        let curve = pricer.calibrate(0.4, 0.6).unwrap();
        let (shares, spent) = pricer.shares_for_amount(&curve, 0.0, 0.0, 500.0, Side::A);

        assert!(spent <= 500.0);
        assert!(cost_of_shares(&curve, 0.0, 0.0, shares as f64 + 1.0, Side::A) > 500.0);
    }

    #[test]
    fn bounded_bisection_stops_at_the_step_cap() {
        let capped = LmsrPricer::new(PricingConfig {
            bisection_max_steps: 0,
            ..PricingConfig::default()
        });
        let curve = capped.calibrate(400.0, 600.0).unwrap();
        let (shares, spent) = capped.shares_for_amount(&curve, 0.0, 0.0, 100.0, Side::A);
        let (best, _) = pricer().shares_for_amount(&curve, 0.0, 0.0, 100.0, Side::A);

        // No steps leaves the lower edge of the narrowed bracket.
        assert!(shares + 2 >= best && shares < best, "{shares} vs {best}");
        assert!(spent <= 100.0);
    }
}
