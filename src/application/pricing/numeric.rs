//! Overflow-safe exponential helpers.

/// `e^10`, the hinge of [`stable_exp`].
pub const EXP_HINGE: f64 = 22_026.465_794_806_718;

const HINGE: f64 = 10.0;

/// Bounded exponential.
///
/// Exact on `[-10, 10]`. Above the hinge it continues linearly from `e^10`
/// with slope `e^10`; below it mirrors as `1 / stable_exp(-x)`. The result
/// is continuous, strictly increasing and finite for every finite input,
/// and `stable_exp(-x) * stable_exp(x) == 1`.
#[must_use]
pub fn stable_exp(x: f64) -> f64 {
    if x > HINGE {
        EXP_HINGE * (1.0 + (x - HINGE))
    } else if x < -HINGE {
        1.0 / stable_exp(-x)
    } else {
        x.exp()
    }
}

/// `1 / (1 + stable_exp(x))`: the share of the side that trails by `x/b`.
#[must_use]
pub fn logistic_complement(x: f64) -> f64 {
    1.0 / (1.0 + stable_exp(x))
}

/// `ln(e^x + e^y)` without overflow.
#[must_use]
pub fn log_add_exp(x: f64, y: f64) -> f64 {
    let (hi, lo) = if x >= y { (x, y) } else { (y, x) };
    if lo == f64::NEG_INFINITY {
        return hi;
    }
    hi + (lo - hi).exp().ln_1p()
}

/// `ln(1 + e^x)` without overflow.
#[must_use]
pub fn softplus(x: f64) -> f64 {
    if x > 0.0 {
        x + (-x).exp().ln_1p()
    } else {
        x.exp().ln_1p()
    }
}
