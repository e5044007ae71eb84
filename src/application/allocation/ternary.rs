//! Ternary search over a two-pool split.
//!
//! Assumes total shares are unimodal in the amount sent to the first pool.
//! Integer share counts plateau, so the best value seen anywhere in the
//! search is kept rather than trusting the final bracket.

use super::evaluator::PoolEvaluator;
use crate::error::OptimizationError;

pub(super) fn search(
    evaluator: &PoolEvaluator<'_>,
    total: f64,
    tolerance: f64,
) -> Result<Vec<f64>, OptimizationError> {
    let objective = |x: f64| evaluator.total_shares(&[x, total - x]);
    let epsilon = total * tolerance;

    let mut best = (objective(0.0)?, 0.0);
    let mut consider = |shares: u64, x: f64| {
        if shares > best.0 {
            best = (shares, x);
        }
    };
    consider(objective(total)?, total);

    let (mut left, mut right) = (0.0, total);
    while right - left > epsilon {
        let third = (right - left) / 3.0;
        let (m1, m2) = (left + third, right - third);
        let (v1, v2) = (objective(m1)?, objective(m2)?);
        consider(v1, m1);
        consider(v2, m2);
        if v1 < v2 {
            left = m1;
        } else {
            right = m2;
        }
    }
    let middle = (left + right) / 2.0;
    consider(objective(middle)?, middle);

    let x = best.1;
    Ok(vec![x, total - x])
}
