//! Projected gradient ascent on allocation fractions.
//!
//! The gradient of the smooth share objective is estimated by finite
//! differences, centered over the active pools so steps stay on the
//! simplex, then the iterate is clipped and renormalized. Stops when the
//! projected gradient vanishes or the iteration cap is hit.

use tracing::debug;

use super::evaluator::{amounts_from_fractions, PoolEvaluator};
use crate::error::OptimizationError;

#[derive(Debug, Clone, Copy)]
pub(super) struct GradientSettings {
    pub learning_rate: f64,
    pub max_iterations: usize,
    pub tolerance: f64,
    pub delta: f64,
}

pub(super) fn search(
    evaluator: &PoolEvaluator<'_>,
    total: f64,
    settings: GradientSettings,
) -> Result<Vec<f64>, OptimizationError> {
    let n = evaluator.len();
    let mut fractions = vec![1.0 / n as f64; n];
    let mut best_amounts = amounts_from_fractions(&fractions, total);
    let mut best_shares = evaluator.total_shares(&best_amounts)?;

    for iteration in 0..settings.max_iterations {
        let gradient = evaluator.smooth_gradient(&fractions, total, settings.delta);
        let direction = project(&fractions, &gradient);
        let norm = direction.iter().map(|d| d * d).sum::<f64>().sqrt();
        if norm < settings.tolerance {
            debug!(iteration, norm, "Gradient projection converged");
            break;
        }

        for (fraction, step) in fractions.iter_mut().zip(&direction) {
            *fraction += settings.learning_rate * step;
        }
        let amounts = amounts_from_fractions(&fractions, total);
        fractions = amounts.iter().map(|a| a / total).collect();

        let shares = evaluator.total_shares(&amounts)?;
        if shares > best_shares {
            best_shares = shares;
            best_amounts = amounts;
        }
    }

    Ok(best_amounts)
}

/// Component of the gradient tangent to the simplex.
///
/// Pools already at zero whose gradient is below the active mean stay put.
fn project(fractions: &[f64], gradient: &[f64]) -> Vec<f64> {
    let overall = gradient.iter().sum::<f64>() / gradient.len() as f64;
    let active: Vec<bool> = fractions
        .iter()
        .zip(gradient)
        .map(|(f, g)| *f > 0.0 || *g >= overall)
        .collect();
    let count = active.iter().filter(|a| **a).count().max(1);
    let mean = gradient
        .iter()
        .zip(&active)
        .filter(|(_, a)| **a)
        .map(|(g, _)| g)
        .sum::<f64>()
        / count as f64;

    gradient
        .iter()
        .zip(&active)
        .map(|(g, a)| if *a { g - mean } else { 0.0 })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn projection_sums_to_zero() {
        let direction = project(&[0.5, 0.3, 0.2], &[3.0, 1.0, 2.0]);
        assert!(direction.iter().sum::<f64>().abs() < 1e-12);
        assert!(direction[0] > 0.0 && direction[1] < 0.0);
    }

    #[test]
    fn pinned_pools_with_weak_gradient_are_frozen() {
        let direction = project(&[0.0, 0.6, 0.4], &[0.1, 2.0, 1.0]);
        assert_eq!(direction[0], 0.0);
        assert!((direction[1] - 0.5).abs() < 1e-12);
        assert!((direction[2] + 0.5).abs() < 1e-12);
    }
}
