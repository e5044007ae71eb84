//! Solver port for linear programming.
//!
//! Used as the linear minimization oracle of the constrained allocation
//! strategy.
//!
//! - [`Solver`]: Core LP solver interface
//! - [`LpProblem`]: Problem definition
//! - [`LpSolution`]: Solution representation

use crate::error::Result;

/// Linear programming solver.
///
/// Implementations wrap specific solver backends and must be thread-safe.
pub trait Solver: Send + Sync {
    /// Return the solver name for logging and configuration.
    fn name(&self) -> &'static str;

    /// Solve a linear programming problem.
    ///
    /// Minimizes `c * x` subject to the constraints and bounds.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend encounters an internal error.
    /// Infeasible and unbounded problems are reported via
    /// [`LpSolution::status`].
    fn solve_lp(&self, problem: &LpProblem) -> Result<LpSolution>;
}

/// Relation between a constraint's left-hand side and its bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstraintSense {
    LessEqual,
    GreaterEqual,
    Equal,
}

/// A linear constraint `coefficients * x (sense) rhs`.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearConstraint {
    pub coefficients: Vec<f64>,
    pub sense: ConstraintSense,
    pub rhs: f64,
}

impl LinearConstraint {
    #[must_use]
    pub fn eq(coefficients: Vec<f64>, rhs: f64) -> Self {
        Self {
            coefficients,
            sense: ConstraintSense::Equal,
            rhs,
        }
    }

    #[must_use]
    pub fn leq(coefficients: Vec<f64>, rhs: f64) -> Self {
        Self {
            coefficients,
            sense: ConstraintSense::LessEqual,
            rhs,
        }
    }

    #[must_use]
    pub fn geq(coefficients: Vec<f64>, rhs: f64) -> Self {
        Self {
            coefficients,
            sense: ConstraintSense::GreaterEqual,
            rhs,
        }
    }
}

/// Lower and upper bound for one variable. `None` means unbounded.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct VariableBounds {
    pub lower: Option<f64>,
    pub upper: Option<f64>,
}

impl VariableBounds {
    #[must_use]
    pub const fn unit() -> Self {
        Self {
            lower: Some(0.0),
            upper: Some(1.0),
        }
    }

    #[must_use]
    pub const fn non_negative() -> Self {
        Self {
            lower: Some(0.0),
            upper: None,
        }
    }
}

/// Linear programming problem definition.
///
/// ```text
/// minimize    c^T * x
/// subject to  constraints
///             bounds on x
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct LpProblem {
    pub objective: Vec<f64>,
    pub constraints: Vec<LinearConstraint>,
    pub bounds: Vec<VariableBounds>,
}

impl LpProblem {
    /// Minimize `objective` over the probability simplex
    /// (`Σ x = 1`, `0 <= x <= 1`).
    #[must_use]
    pub fn over_simplex(objective: Vec<f64>) -> Self {
        let n = objective.len();
        Self {
            objective,
            constraints: vec![LinearConstraint::eq(vec![1.0; n], 1.0)],
            bounds: vec![VariableBounds::unit(); n],
        }
    }

    #[must_use]
    pub fn num_vars(&self) -> usize {
        self.objective.len()
    }
}

/// Solution to a linear programming problem.
#[derive(Debug, Clone, PartialEq)]
pub struct LpSolution {
    pub values: Vec<f64>,
    pub objective: f64,
    pub status: SolutionStatus,
}

impl LpSolution {
    #[must_use]
    pub fn is_optimal(&self) -> bool {
        self.status == SolutionStatus::Optimal
    }
}

/// Termination status of an optimization solver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolutionStatus {
    Optimal,
    Infeasible,
    Unbounded,
    Error,
}
