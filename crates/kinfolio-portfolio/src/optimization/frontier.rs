//! Efficient frontier sampling.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{optimize_with_moments, Moments, OptimizationMethod};
use crate::analytics::maybe_parallel_map;
use crate::outcome::Outcome;
use crate::types::AnalyticsConfig;

/// One frontier point.
///
/// Infeasible targets keep their slot with NaN statistics, so the point count
/// and order always match the request.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FrontierPoint {
    /// Requested annual return.
    pub target_return: f64,
    /// Achieved annual return; NaN when infeasible.
    pub expected_return: f64,
    /// Annual volatility; NaN when infeasible.
    pub volatility: f64,
    /// Sharpe ratio; NaN when infeasible.
    pub sharpe_ratio: f64,
    /// False when the solver failed at this target.
    pub feasible: bool,
}

impl FrontierPoint {
    fn infeasible(target_return: f64) -> Self {
        Self {
            target_return,
            expected_return: f64::NAN,
            volatility: f64::NAN,
            sharpe_ratio: f64::NAN,
            feasible: false,
        }
    }
}

/// Frontier points in ascending target order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EfficientFrontier {
    /// Symbols the frontier was computed over.
    pub symbols: Vec<String>,
    /// Sampled points.
    pub points: Vec<FrontierPoint>,
}

impl EfficientFrontier {
    /// Points where the solver succeeded.
    pub fn feasible_points(&self) -> impl Iterator<Item = &FrontierPoint> {
        self.points.iter().filter(|p| p.feasible)
    }

    /// Feasible point with the lowest volatility.
    #[must_use]
    pub fn minimum_volatility(&self) -> Option<&FrontierPoint> {
        self.feasible_points()
            .min_by(|a, b| a.volatility.total_cmp(&b.volatility))
    }
}

/// `n` evenly spaced values from `lo` to `hi` inclusive.
fn linspace(lo: f64, hi: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![lo],
        _ => {
            let step = (hi - lo) / (n - 1) as f64;
            (0..n).map(|i| lo + step * i as f64).collect()
        }
    }
}

/// Samples `n_points` target returns between the lowest and highest
/// single-asset expected return and solves each target.
pub fn efficient_frontier(
    moments: &Moments,
    n_points: usize,
    config: &AnalyticsConfig,
) -> Outcome<EfficientFrontier> {
    let Some((lo, hi)) = moments.return_range() else {
        return Outcome::unavailable("no symbols to build a frontier from");
    };

    let targets = linspace(lo, hi, n_points);
    let points = maybe_parallel_map(&targets, config, |target| {
        match optimize_with_moments(
            moments,
            None,
            OptimizationMethod::TargetReturn,
            Some(*target),
            config,
        ) {
            Outcome::Ready { value } => FrontierPoint {
                target_return: *target,
                expected_return: value.expected_return,
                volatility: value.volatility,
                sharpe_ratio: value.sharpe_ratio,
                feasible: true,
            },
            _ => FrontierPoint::infeasible(*target),
        }
    });

    debug!(
        requested = n_points,
        feasible = points.iter().filter(|p| p.feasible).count(),
        "efficient frontier sampled"
    );

    Outcome::ready(EfficientFrontier {
        symbols: moments.symbols.clone(),
        points,
    })
}
