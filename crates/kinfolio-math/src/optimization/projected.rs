//! Projected-gradient and augmented-Lagrangian solvers on the simplex.

use super::simplex::project_onto_simplex;
use super::{LinearConstraint, OptimizationConfig, OptimizationResult};
use crate::error::{MathError, MathResult};

/// Armijo sufficient-decrease parameter.
const ARMIJO: f64 = 1e-4;

/// Smallest step before the line search gives up.
const MIN_STEP: f64 = 1e-16;

/// Largest Barzilai-Borwein step accepted.
const MAX_STEP: f64 = 1e12;

/// Minimizes `f` over the probability simplex.
///
/// Each iteration moves along the projection arc `P(x − t∇f(x))` with a
/// Barzilai-Borwein trial step `t`, halved until the Armijo condition holds.
/// Convergence is declared when the projected-gradient residual
/// `‖x − P(x − ∇f(x))‖∞` drops below `config.tolerance`.
///
/// A run that exhausts its iteration budget returns `converged == false`
/// rather than an error; errors are reserved for invalid input and
/// non-finite objective values.
///
/// # Arguments
///
/// * `f` - Objective
/// * `grad` - Gradient of the objective
/// * `initial` - Starting point; projected onto the simplex first
/// * `config` - Tolerances and iteration caps
pub fn minimize_on_simplex<F, G>(
    f: F,
    grad: G,
    initial: &[f64],
    config: &OptimizationConfig,
) -> MathResult<OptimizationResult>
where
    F: Fn(&[f64]) -> f64,
    G: Fn(&[f64]) -> Vec<f64>,
{
    let n = initial.len();
    let mut x = project_onto_simplex(initial)?;
    let mut fx = f(&x);
    if !fx.is_finite() {
        return Err(MathError::non_finite("objective at initial point"));
    }

    let mut step = config.step_size;
    let mut previous: Option<(Vec<f64>, Vec<f64>)> = None;
    let mut residual = f64::INFINITY;

    for iteration in 0..config.max_iterations {
        let g = grad(&x);
        if g.len() != n {
            return Err(MathError::length_mismatch(n, g.len()));
        }
        if g.iter().any(|v| !v.is_finite()) {
            return Err(MathError::non_finite("gradient"));
        }

        residual = stationarity(&x, &g)?;
        if residual < config.tolerance {
            return Ok(OptimizationResult {
                parameters: x,
                objective_value: fx,
                iterations: iteration,
                converged: true,
                residual,
            });
        }

        if let Some((px, pg)) = &previous {
            let s: Vec<f64> = x.iter().zip(px).map(|(a, b)| a - b).collect();
            let y: Vec<f64> = g.iter().zip(pg).map(|(a, b)| a - b).collect();
            let sy: f64 = s.iter().zip(&y).map(|(a, b)| a * b).sum();
            if sy > 0.0 {
                let ss: f64 = s.iter().map(|a| a * a).sum();
                step = (ss / sy).clamp(MIN_STEP, MAX_STEP);
            }
        }

        let mut t = step;
        let accepted = loop {
            let trial: Vec<f64> = x.iter().zip(&g).map(|(xi, gi)| xi - t * gi).collect();
            let candidate = project_onto_simplex(&trial)?;
            let fc = f(&candidate);
            let decrease: f64 = g
                .iter()
                .zip(candidate.iter().zip(&x))
                .map(|(gi, (ci, xi))| gi * (ci - xi))
                .sum();

            if fc.is_finite() && fc <= fx + ARMIJO * decrease {
                break Some((candidate, fc));
            }

            t *= 0.5;
            if t < MIN_STEP {
                break None;
            }
        };

        match accepted {
            Some((candidate, fc)) => {
                previous = Some((std::mem::replace(&mut x, candidate), g));
                fx = fc;
            }
            None => {
                // Line search exhausted at round-off level: accept a
                // residual that is small in the looser sqrt sense.
                log::debug!(
                    "simplex line search stalled at iteration {} (residual {:.2e})",
                    iteration,
                    residual
                );
                return Ok(OptimizationResult {
                    parameters: x,
                    objective_value: fx,
                    iterations: iteration,
                    converged: residual < config.tolerance.sqrt(),
                    residual,
                });
            }
        }
    }

    log::debug!(
        "simplex solver hit {} iterations (residual {:.2e})",
        config.max_iterations,
        residual
    );

    Ok(OptimizationResult {
        parameters: x,
        objective_value: fx,
        iterations: config.max_iterations,
        converged: false,
        residual,
    })
}

/// Minimizes `f` over the simplex subject to one linear equality.
///
/// Augmented Lagrangian: the equality is moved into the objective as
/// `λh(x) + ρ/2·h(x)²`, the inner problem is solved with
/// [`minimize_on_simplex`], then `λ ← λ + ρh` and `ρ` grows tenfold whenever
/// the violation fails to shrink by a factor of four.
pub fn minimize_on_simplex_with_equality<F, G>(
    f: F,
    grad: G,
    constraint: &LinearConstraint,
    initial: &[f64],
    config: &OptimizationConfig,
) -> MathResult<OptimizationResult>
where
    F: Fn(&[f64]) -> f64,
    G: Fn(&[f64]) -> Vec<f64>,
{
    if constraint.coefficients.len() != initial.len() {
        return Err(MathError::length_mismatch(
            constraint.coefficients.len(),
            initial.len(),
        ));
    }

    let mut lambda = 0.0;
    let mut rho = 10.0;
    let mut x = initial.to_vec();
    let mut previous_violation = f64::INFINITY;
    let mut iterations = 0u32;
    let mut last_inner_converged = false;
    let mut violation = f64::INFINITY;

    for outer in 0..config.max_outer_iterations {
        let penalized = |p: &[f64]| {
            let h = constraint.residual(p);
            f(p) + lambda * h + 0.5 * rho * h * h
        };
        let penalized_grad = |p: &[f64]| {
            let h = constraint.residual(p);
            let scale = lambda + rho * h;
            grad(p)
                .into_iter()
                .zip(&constraint.coefficients)
                .map(|(g, a)| g + scale * a)
                .collect::<Vec<f64>>()
        };

        let inner = minimize_on_simplex(penalized, penalized_grad, &x, config)?;
        iterations = iterations.saturating_add(inner.iterations);
        last_inner_converged = inner.converged;
        x = inner.parameters;

        let h = constraint.residual(&x);
        violation = h.abs();

        if violation < config.constraint_tolerance && inner.converged {
            return Ok(OptimizationResult {
                objective_value: f(&x),
                parameters: x,
                iterations,
                converged: true,
                residual: violation,
            });
        }

        lambda += rho * h;
        if violation > 0.25 * previous_violation {
            rho = (rho * 10.0).min(1e12);
        }
        previous_violation = violation;

        log::trace!(
            "augmented lagrangian outer {}: violation {:.2e}, rho {:.1e}",
            outer,
            violation,
            rho
        );
    }

    Ok(OptimizationResult {
        objective_value: f(&x),
        parameters: x,
        iterations,
        converged: false,
        residual: if last_inner_converged {
            violation
        } else {
            violation.max(config.tolerance)
        },
    })
}

/// `‖x − P(x − g)‖∞`, zero exactly at KKT points of the simplex problem.
fn stationarity(x: &[f64], g: &[f64]) -> MathResult<f64> {
    let trial: Vec<f64> = x.iter().zip(g).map(|(xi, gi)| xi - gi).collect();
    let projected = project_onto_simplex(&trial)?;
    Ok(x
        .iter()
        .zip(&projected)
        .map(|(a, b)| (a - b).abs())
        .fold(0.0, f64::max))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_quadratic_interior_minimum() {
        // Minimize (x0 - 0.3)^2 + (x1 - 0.7)^2 on the simplex: optimum is interior.
        let f = |x: &[f64]| (x[0] - 0.3).powi(2) + (x[1] - 0.7).powi(2);
        let g = |x: &[f64]| vec![2.0 * (x[0] - 0.3), 2.0 * (x[1] - 0.7)];

        let result =
            minimize_on_simplex(f, g, &[0.5, 0.5], &OptimizationConfig::default()).unwrap();

        assert!(result.converged);
        assert_relative_eq!(result.parameters[0], 0.3, epsilon = 1e-6);
        assert_relative_eq!(result.parameters[1], 0.7, epsilon = 1e-6);
    }

    #[test]
    fn test_min_variance_two_assets() {
        // Uncorrelated assets with variances 0.04 and 0.01: w0 = 0.01 / 0.05 = 0.2.
        let f = |x: &[f64]| 0.04 * x[0] * x[0] + 0.01 * x[1] * x[1];
        let g = |x: &[f64]| vec![0.08 * x[0], 0.02 * x[1]];

        let result =
            minimize_on_simplex(f, g, &[0.5, 0.5], &OptimizationConfig::default()).unwrap();

        assert!(result.converged);
        assert_relative_eq!(result.parameters[0], 0.2, epsilon = 1e-5);
        assert_relative_eq!(result.parameters.iter().sum::<f64>(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_vertex_solution() {
        // Linear objective: all weight on the cheapest coordinate.
        let f = |x: &[f64]| 3.0 * x[0] + 1.0 * x[1] + 2.0 * x[2];
        let g = |_: &[f64]| vec![3.0, 1.0, 2.0];

        let result = minimize_on_simplex(
            f,
            g,
            &[1.0 / 3.0; 3],
            &OptimizationConfig::default(),
        )
        .unwrap();

        assert!(result.converged);
        assert_relative_eq!(result.parameters[1], 1.0, epsilon = 1e-9);
    }

    #[test]
    fn test_iteration_cap_reports_not_converged() {
        let f = |x: &[f64]| (x[0] - 0.3).powi(2) + (x[1] - 0.7).powi(2);
        let g = |x: &[f64]| vec![2.0 * (x[0] - 0.3), 2.0 * (x[1] - 0.7)];
        let config = OptimizationConfig {
            max_iterations: 0,
            ..OptimizationConfig::default()
        };

        let result = minimize_on_simplex(f, g, &[0.5, 0.5], &config).unwrap();
        assert!(!result.converged);
    }

    #[test]
    fn test_equality_constrained_variance() {
        // Three uncorrelated assets, returns 0.05 / 0.10 / 0.15, target 0.10.
        let var = [0.04, 0.04, 0.04];
        let f = |x: &[f64]| x.iter().zip(&var).map(|(w, v)| v * w * w).sum::<f64>();
        let g = |x: &[f64]| x.iter().zip(&var).map(|(w, v)| 2.0 * v * w).collect();
        let constraint = LinearConstraint::new(vec![0.05, 0.10, 0.15], 0.10);

        let result = minimize_on_simplex_with_equality(
            f,
            g,
            &constraint,
            &[0.6, 0.2, 0.2],
            &OptimizationConfig::default(),
        )
        .unwrap();

        assert!(result.converged);
        assert!(constraint.residual(&result.parameters).abs() < 1e-7);
        // Symmetric problem: equal weights hit the target with least variance.
        for w in &result.parameters {
            assert_relative_eq!(*w, 1.0 / 3.0, epsilon = 1e-4);
        }
    }

    #[test]
    fn test_rejects_mismatched_constraint() {
        let constraint = LinearConstraint::new(vec![1.0], 0.5);
        let result = minimize_on_simplex_with_equality(
            |x: &[f64]| x[0],
            |_: &[f64]| vec![1.0, 1.0],
            &constraint,
            &[0.5, 0.5],
            &OptimizationConfig::default(),
        );
        assert!(result.is_err());
    }
}
