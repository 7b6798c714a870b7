//! Optimization algorithms.
//!
//! Minimization of smooth objectives over the probability simplex
//! `{x : x_i >= 0, Σ x_i = 1}`, which is exactly the feasible set of a
//! long-only, fully invested allocation. Upper bounds of 1 are implied.
//!
//! - [`minimize_on_simplex`]: projected gradient with Barzilai-Borwein steps
//!   and Armijo backtracking
//! - [`minimize_on_simplex_with_equality`]: augmented Lagrangian outer loop
//!   for one extra linear equality `aᵗx = b`

mod projected;
mod simplex;

pub use projected::{minimize_on_simplex, minimize_on_simplex_with_equality};
pub use simplex::project_onto_simplex;

use crate::error::{MathError, MathResult};

/// Configuration for optimization algorithms.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OptimizationConfig {
    /// Stationarity tolerance on `‖x − P(x − ∇f)‖∞`.
    pub tolerance: f64,
    /// Maximum number of projected-gradient iterations per solve.
    pub max_iterations: u32,
    /// Initial step length.
    pub step_size: f64,
    /// Tolerance on the equality-constraint residual.
    pub constraint_tolerance: f64,
    /// Maximum augmented-Lagrangian outer iterations.
    pub max_outer_iterations: u32,
}

impl Default for OptimizationConfig {
    fn default() -> Self {
        Self {
            tolerance: 1e-8,
            max_iterations: 2_000,
            step_size: 1.0,
            constraint_tolerance: 1e-8,
            max_outer_iterations: 40,
        }
    }
}

/// Result of an optimization run.
#[derive(Debug, Clone)]
pub struct OptimizationResult {
    /// Optimal parameters found.
    pub parameters: Vec<f64>,
    /// Final objective function value.
    pub objective_value: f64,
    /// Number of iterations used (inner iterations summed across outer loops).
    pub iterations: u32,
    /// Whether the optimization converged.
    pub converged: bool,
    /// Final stationarity or constraint residual, whichever failed last.
    pub residual: f64,
}

impl OptimizationResult {
    /// Turns a non-converged run into [`MathError::ConvergenceFailed`].
    pub fn require_converged(self) -> MathResult<Self> {
        if self.converged {
            Ok(self)
        } else {
            Err(MathError::convergence_failed(self.iterations, self.residual))
        }
    }
}

/// A linear equality constraint `coefficients · x = target`.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearConstraint {
    /// Constraint row `a`.
    pub coefficients: Vec<f64>,
    /// Right-hand side `b`.
    pub target: f64,
}

impl LinearConstraint {
    /// Creates a new constraint.
    #[must_use]
    pub fn new(coefficients: Vec<f64>, target: f64) -> Self {
        Self {
            coefficients,
            target,
        }
    }

    /// Signed residual `a · x − b`.
    #[must_use]
    pub fn residual(&self, x: &[f64]) -> f64 {
        self.coefficients
            .iter()
            .zip(x)
            .map(|(a, xi)| a * xi)
            .sum::<f64>()
            - self.target
    }
}
