//! Long-only mean-variance optimization.
//!
//! Every method returns weights on the probability simplex (each weight in
//! `[0, 1]`, summing to one). Solver failures come back as
//! [`Outcome::Failed`], never as errors.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use kinfolio_math::optimization::{
    minimize_on_simplex, minimize_on_simplex_with_equality, LinearConstraint,
    OptimizationResult as SolverResult,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::Moments;
use crate::error::PortfolioError;
use crate::outcome::Outcome;
use crate::types::AnalyticsConfig;

/// Optimization objective.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OptimizationMethod {
    /// Maximize the Sharpe ratio.
    #[default]
    MaxSharpe,
    /// Minimize portfolio volatility.
    MinVolatility,
    /// `1/n` in every asset.
    EqualWeight,
    /// Maximize the Sharpe ratio at a fixed expected return.
    TargetReturn,
}

impl OptimizationMethod {
    /// All methods.
    pub const ALL: [Self; 4] = [
        Self::MaxSharpe,
        Self::MinVolatility,
        Self::EqualWeight,
        Self::TargetReturn,
    ];

    /// Canonical name.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MaxSharpe => "max_sharpe",
            Self::MinVolatility => "min_volatility",
            Self::EqualWeight => "equal_weight",
            Self::TargetReturn => "target_return",
        }
    }
}

impl fmt::Display for OptimizationMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OptimizationMethod {
    type Err = PortfolioError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('-', "_");
        Self::ALL
            .into_iter()
            .find(|m| m.as_str() == normalized)
            .ok_or_else(|| PortfolioError::invalid_input(format!("unknown optimization method: {s}")))
    }
}

/// A set of weights with its annualized return statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Allocation {
    /// Symbol → weight (fraction).
    pub weights: BTreeMap<String, f64>,
    /// Expected annual return `wᵗμ`.
    pub expected_return: f64,
    /// Annual volatility `sqrt(wᵗΣw)`.
    pub volatility: f64,
    /// `(return − risk_free_rate) / volatility`, 0 when volatility is 0.
    pub sharpe_ratio: f64,
}

impl Allocation {
    /// Evaluates weights given in `moments.symbols` order.
    #[must_use]
    pub fn evaluate(moments: &Moments, weights: &[f64], risk_free_rate: f64) -> Self {
        let expected_return = moments.portfolio_return(weights);
        let volatility = moments.portfolio_variance(weights).max(0.0).sqrt();
        let sharpe_ratio = if volatility > 0.0 {
            (expected_return - risk_free_rate) / volatility
        } else {
            0.0
        };

        Self {
            weights: moments.symbols.iter().cloned().zip(weights.iter().copied()).collect(),
            expected_return,
            volatility,
            sharpe_ratio,
        }
    }

    /// Weight of `symbol`, 0 when absent.
    #[must_use]
    pub fn weight(&self, symbol: &str) -> f64 {
        self.weights.get(symbol).copied().unwrap_or(0.0)
    }
}

/// Starting point: current weights over the optimized symbols, renormalized;
/// equal weights when none are given or they sum to zero.
fn initial_weights(moments: &Moments, current: Option<&BTreeMap<String, f64>>) -> Vec<f64> {
    let n = moments.len();
    let equal = vec![1.0 / n as f64; n];
    let Some(current) = current else {
        return equal;
    };

    let seed: Vec<f64> = moments
        .symbols
        .iter()
        .map(|s| current.get(s).copied().unwrap_or(1.0 / n as f64).max(0.0))
        .collect();
    let total: f64 = seed.iter().sum();
    if total > 0.0 && total.is_finite() {
        seed.into_iter().map(|w| w / total).collect()
    } else {
        equal
    }
}

/// Optimizes over precomputed moments.
///
/// `target_return` adds the equality `wᵗμ = target` to any solver-based
/// method and is required by [`OptimizationMethod::TargetReturn`].
pub fn optimize_with_moments(
    moments: &Moments,
    current_weights: Option<&BTreeMap<String, f64>>,
    method: OptimizationMethod,
    target_return: Option<f64>,
    config: &AnalyticsConfig,
) -> Outcome<Allocation> {
    let n = moments.len();
    if n == 0 {
        return Outcome::unavailable("no symbols to optimize");
    }
    let rf = config.risk_free_rate;

    if method == OptimizationMethod::EqualWeight {
        return Outcome::ready(Allocation::evaluate(moments, &vec![1.0 / n as f64; n], rf));
    }
    if method == OptimizationMethod::TargetReturn && target_return.is_none() {
        return Outcome::failed("target_return method requires a target return");
    }

    if let Some(target) = target_return {
        let reachable = moments
            .return_range()
            .is_some_and(|(lo, hi)| target >= lo - 1e-12 && target <= hi + 1e-12);
        if !reachable {
            return Outcome::failed(format!("target return {target:.4} is not attainable"));
        }
    }

    let initial = initial_weights(moments, current_weights);
    let solver = config.solver.to_optimization_config();

    let variance = |w: &[f64]| moments.portfolio_variance(w);
    let variance_grad = |w: &[f64]| -> Vec<f64> {
        moments.covariance_times(w).into_iter().map(|g| 2.0 * g).collect()
    };

    let negative_sharpe = |w: &[f64]| {
        let sigma = moments.portfolio_variance(w).max(0.0).sqrt();
        -(moments.portfolio_return(w) - rf) / sigma
    };
    let negative_sharpe_grad = |w: &[f64]| -> Vec<f64> {
        let variance = moments.portfolio_variance(w).max(0.0);
        let sigma = variance.sqrt();
        let excess = moments.portfolio_return(w) - rf;
        let cov_w = moments.covariance_times(w);
        moments
            .expected_returns
            .iter()
            .zip(cov_w)
            .map(|(mu, cw)| -(mu / sigma - excess * cw / (variance * sigma)))
            .collect()
    };

    let constraint = target_return.map(|t| LinearConstraint::new(moments.expected_returns.clone(), t));

    let solved = match (method, &constraint) {
        (OptimizationMethod::MinVolatility, None) => {
            minimize_on_simplex(variance, variance_grad, &initial, &solver)
        }
        (OptimizationMethod::MinVolatility, Some(c)) => {
            minimize_on_simplex_with_equality(variance, variance_grad, c, &initial, &solver)
        }
        (_, None) => minimize_on_simplex(negative_sharpe, negative_sharpe_grad, &initial, &solver),
        (_, Some(c)) => minimize_on_simplex_with_equality(
            negative_sharpe,
            negative_sharpe_grad,
            c,
            &initial,
            &solver,
        ),
    };

    match solved.and_then(SolverResult::require_converged) {
        Ok(result) => {
            debug!(
                method = %method,
                iterations = result.iterations,
                objective = result.objective_value,
                "optimization converged"
            );
            Outcome::ready(Allocation::evaluate(moments, &result.parameters, rf))
        }
        Err(e) => {
            warn!(method = %method, error = %e, "optimization failed");
            Outcome::failed(e.to_string())
        }
    }
}
