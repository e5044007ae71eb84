//! Grid search over the allocation simplex.
//!
//! Up to three pools the simplex is enumerated exactly at `1/steps`
//! resolution. Beyond that the candidate set is an equal split, one
//! "favor pool i" variant per pool (others at half the equal share) and the
//! single-pool vertices.

use tracing::trace;

use super::evaluator::{amounts_from_fractions, single_pool_split, PoolEvaluator};
use crate::error::OptimizationError;

/// Largest pool count enumerated exhaustively.
pub const EXHAUSTIVE_POOL_LIMIT: usize = 3;

pub(super) fn search(
    evaluator: &PoolEvaluator<'_>,
    total: f64,
    steps: usize,
) -> Result<Vec<f64>, OptimizationError> {
    let n = evaluator.len();
    let candidates = if n <= EXHAUSTIVE_POOL_LIMIT {
        compositions(n, steps)
            .into_iter()
            .map(|parts| parts.into_iter().map(|k| k as f64 / steps as f64).collect())
            .collect()
    } else {
        heuristic_candidates(n)
    };

    let mut best: Option<(u64, Vec<f64>)> = None;
    let mut skipped = 0usize;
    for fractions in &candidates {
        let amounts = amounts_from_fractions(fractions, total);
        match evaluator.total_shares(&amounts) {
            Ok(shares) => {
                if best.as_ref().map_or(true, |(top, _)| shares > *top) {
                    best = Some((shares, amounts));
                }
            }
            Err(_) => skipped += 1,
        }
    }

    trace!(candidates = candidates.len(), skipped, "Grid search finished");
    best.map(|(_, amounts)| amounts)
        .ok_or(OptimizationError::NoFeasibleCombination)
}

/// Every way to write `steps` as an ordered sum of `parts` non-negative
/// integers.
fn compositions(parts: usize, steps: usize) -> Vec<Vec<usize>> {
    if parts == 1 {
        return vec![vec![steps]];
    }
    (0..=steps)
        .flat_map(|head| {
            compositions(parts - 1, steps - head)
                .into_iter()
                .map(move |mut tail| {
                    tail.insert(0, head);
                    tail
                })
        })
        .collect()
}

fn heuristic_candidates(n: usize) -> Vec<Vec<f64>> {
    let equal = 1.0 / n as f64;
    let mut candidates = vec![vec![equal; n]];
    for favored in 0..n {
        let mut fractions = vec![equal * 0.5; n];
        fractions[favored] = 1.0 - equal * 0.5 * (n - 1) as f64;
        candidates.push(fractions);
    }
    candidates.extend((0..n).map(|i| single_pool_split(n, i, 1.0)));
    candidates
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compositions_cover_the_simplex() {
        let two = compositions(2, 4);
        assert_eq!(two.len(), 5);
        assert!(two.iter().all(|c| c.iter().sum::<usize>() == 4));

        // C(steps + 2, 2) points for three pools
        assert_eq!(compositions(3, 20).len(), 231);
    }

    #[test]
    fn heuristic_set_includes_equal_favored_and_vertices() {
        let candidates = heuristic_candidates(4);
        assert_eq!(candidates.len(), 1 + 4 + 4);
        for fractions in &candidates {
            assert!((fractions.iter().sum::<f64>() - 1.0).abs() < 1e-12);
        }
        assert!((candidates[1][0] - 0.625).abs() < 1e-12);
        assert!((candidates[1][1] - 0.125).abs() < 1e-12);
    }
}
