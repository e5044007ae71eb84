//! Calibrated LMSR curves.

use serde::Serialize;

/// How closely a calibration met its targets.
///
/// Calibration never fails on numerical grounds: when the correction loops
/// hit their caps it keeps the best-effort values and records that here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct CalibrationQuality {
    /// Reconstructed prices landed within tolerance of the target odds.
    pub price_converged: bool,
    /// Worst-case loss stayed under the configured cap.
    pub loss_within_cap: bool,
    /// Price correction passes used in the final derivation.
    pub price_corrections: usize,
    /// Outer derivations performed (one per `b` value tried).
    pub b_iterations: usize,
}

impl CalibrationQuality {
    /// True when every target was met.
    #[must_use]
    pub const fn is_exact(&self) -> bool {
        self.price_converged && self.loss_within_cap
    }
}

/// LMSR curve derived deterministically from a reserve snapshot.
///
/// Never persisted. Identical inputs always produce an identical curve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CalibratedCurve {
    /// Liquidity sensitivity.
    pub b: f64,
    pub initial_q_a: f64,
    pub initial_q_b: f64,
    pub initial_price_a: f64,
    pub initial_price_b: f64,
    /// Worst-case market maker loss for this `b` and quantity spread.
    pub max_loss: f64,
    pub quality: CalibrationQuality,
}
