//! HiGHS solver implementation via good_lp.
//!
//! HiGHS is an open-source linear programming solver; good_lp provides the
//! model-building layer.

use good_lp::solvers::highs::highs;
use good_lp::{constraint, variable, variables, Expression, Solution, SolverModel};
use tracing::debug;

use crate::error::Result;
use crate::port::outbound::solver::{ConstraintSense, LpProblem, LpSolution, SolutionStatus, Solver};

/// HiGHS-based LP solver.
#[derive(Debug, Default, Clone)]
pub struct HighsSolver;

impl HighsSolver {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Solver for HighsSolver {
    fn name(&self) -> &'static str {
        "highs"
    }

    fn solve_lp(&self, problem: &LpProblem) -> Result<LpSolution> {
        let n = problem.num_vars();
        if n == 0 {
            return Ok(LpSolution {
                values: vec![],
                objective: 0.0,
                status: SolutionStatus::Optimal,
            });
        }

        let mut vars = variables!();
        let mut var_list = Vec::with_capacity(n);
        for i in 0..n {
            let bounds = problem.bounds.get(i).copied().unwrap_or_default();
            let mut v = variable();
            if let Some(lb) = bounds.lower {
                v = v.min(lb);
            }
            if let Some(ub) = bounds.upper {
                v = v.max(ub);
            }
            var_list.push(vars.add(v));
        }

        let objective: Expression = var_list
            .iter()
            .zip(&problem.objective)
            .map(|(v, c)| *c * *v)
            .sum();

        let mut model = vars.minimise(&objective).using(highs);
        for constr in &problem.constraints {
            let lhs: Expression = var_list
                .iter()
                .zip(&constr.coefficients)
                .map(|(v, c)| *c * *v)
                .sum();
            let rhs = constr.rhs;
            model = match constr.sense {
                ConstraintSense::GreaterEqual => model.with(constraint!(lhs >= rhs)),
                ConstraintSense::LessEqual => model.with(constraint!(lhs <= rhs)),
                ConstraintSense::Equal => model.with(constraint!(lhs == rhs)),
            };
        }

        match model.solve() {
            Ok(solution) => {
                let values: Vec<f64> = var_list.iter().map(|v| solution.value(*v)).collect();
                let objective = values
                    .iter()
                    .zip(&problem.objective)
                    .map(|(x, c)| x * c)
                    .sum();
                Ok(LpSolution {
                    values,
                    objective,
                    status: SolutionStatus::Optimal,
                })
            }
            Err(e) => {
                let status = match e {
                    good_lp::ResolutionError::Unbounded => SolutionStatus::Unbounded,
                    good_lp::ResolutionError::Infeasible => SolutionStatus::Infeasible,
                    _ => SolutionStatus::Error,
                };
                debug!(error = %e, ?status, "HiGHS did not return a solution");
                Ok(LpSolution {
                    values: vec![0.0; n],
                    objective: 0.0,
                    status,
                })
            }
        }
    }
}
