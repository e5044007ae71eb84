//! Constrained maximization by conditional gradient (Frank-Wolfe).
//!
//! Maximizes total shares over `{Σ x = 1, 0 <= x <= 1}`. Each iteration
//! linearizes the smooth objective and asks the LP solver for the best
//! simplex vertex, then steps toward it with the `2/(t+2)` schedule. The
//! duality gap `<g, s - x>` bounds the remaining improvement.

use tracing::{debug, warn};

use super::evaluator::{amounts_from_fractions, PoolEvaluator};
use crate::error::OptimizationError;
use crate::port::outbound::solver::{LpProblem, Solver};

#[derive(Debug, Clone, Copy)]
pub(super) struct FrankWolfeSettings {
    pub max_iterations: usize,
    pub tolerance: f64,
    pub delta: f64,
}

pub(super) fn search(
    evaluator: &PoolEvaluator<'_>,
    total: f64,
    solver: &dyn Solver,
    settings: FrankWolfeSettings,
) -> Result<Vec<f64>, OptimizationError> {
    let n = evaluator.len();
    let mut x = vec![1.0 / n as f64; n];
    let mut best_amounts = amounts_from_fractions(&x, total);
    let mut best_shares = evaluator.total_shares(&best_amounts)?;
    let mut iterations = 0;

    for _ in 0..settings.max_iterations {
        iterations += 1;
        let gradient = evaluator.smooth_gradient(&x, total, settings.delta);

        let oracle = LpProblem::over_simplex(gradient.iter().map(|g| -g).collect());
        let solution = solver
            .solve_lp(&oracle)
            .map_err(|e| OptimizationError::Solver(e.to_string()))?;
        if !solution.is_optimal() {
            if iterations == 1 {
                return Err(OptimizationError::Solver(format!(
                    "{} oracle returned {:?}",
                    solver.name(),
                    solution.status
                )));
            }
            warn!(solver = solver.name(), status = ?solution.status, iterations, "LP oracle failed, keeping current iterate");
            break;
        }
        let vertex = &solution.values;

        let gap: f64 = gradient
            .iter()
            .zip(vertex.iter().zip(&x))
            .map(|(g, (s, xi))| g * (s - xi))
            .sum();
        if gap < settings.tolerance {
            debug!(iterations, gap, "Frank-Wolfe converged");
            break;
        }

        let gamma = 2.0 / (iterations as f64 + 2.0);
        for (xi, si) in x.iter_mut().zip(vertex) {
            *xi = (1.0 - gamma) * *xi + gamma * si;
        }

        let amounts = amounts_from_fractions(&x, total);
        let shares = evaluator.total_shares(&amounts)?;
        if shares > best_shares {
            best_shares = shares;
            best_amounts = amounts;
        }
    }

    Ok(best_amounts)
}
