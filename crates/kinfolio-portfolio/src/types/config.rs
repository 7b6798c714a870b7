//! Configuration for portfolio analytics computation.

use kinfolio_math::optimization::OptimizationConfig;
use serde::{Deserialize, Serialize};

/// Solver settings exposed through configuration files.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    /// Stationarity tolerance of the projected-gradient solver.
    pub tolerance: f64,
    /// Iteration cap per solve.
    pub max_iterations: u32,
    /// Tolerance on the target-return equality.
    pub constraint_tolerance: f64,
    /// Outer iteration cap for the target-return constraint.
    pub max_outer_iterations: u32,
}

impl Default for SolverConfig {
    fn default() -> Self {
        let base = OptimizationConfig::default();
        Self {
            tolerance: base.tolerance,
            max_iterations: base.max_iterations,
            constraint_tolerance: base.constraint_tolerance,
            max_outer_iterations: base.max_outer_iterations,
        }
    }
}

impl SolverConfig {
    /// Converts to the solver's own configuration type.
    #[must_use]
    pub fn to_optimization_config(&self) -> OptimizationConfig {
        OptimizationConfig {
            tolerance: self.tolerance,
            max_iterations: self.max_iterations,
            constraint_tolerance: self.constraint_tolerance,
            max_outer_iterations: self.max_outer_iterations,
            ..OptimizationConfig::default()
        }
    }
}

/// Configuration for portfolio analytics computation.
///
/// Controls market assumptions, lookback, risk parameters, parallelism and
/// solver limits. Every field has a default, so partial TOML/JSON documents
/// deserialize.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyticsConfig {
    /// Annualized risk-free rate used in every Sharpe ratio.
    pub risk_free_rate: f64,

    /// Trading days per year used to annualize daily statistics.
    pub trading_days: u32,

    /// Trading days of history requested from the market data source.
    pub lookback_days: u32,

    /// Confidence level for VaR/CVaR.
    pub confidence_level: f64,

    /// Rebalancing dead-band as a fraction of total value.
    pub rebalance_threshold: f64,

    /// Number of points on the efficient frontier.
    pub frontier_points: usize,

    /// Enable parallel processing (requires 'parallel' feature).
    pub parallel: bool,

    /// Minimum item count to trigger parallel processing.
    /// Below this threshold, sequential is faster due to thread overhead.
    pub parallel_threshold: usize,

    /// Solver limits.
    pub solver: SolverConfig,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            risk_free_rate: 0.065,
            trading_days: 252,
            lookback_days: 252,
            confidence_level: 0.95,
            rebalance_threshold: 0.01,
            frontier_points: 50,
            parallel: true,
            parallel_threshold: 16,
            solver: SolverConfig::default(),
        }
    }
}

impl AnalyticsConfig {
    /// Creates a new config with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a config that always uses sequential processing.
    #[must_use]
    pub fn sequential() -> Self {
        Self {
            parallel: false,
            ..Self::default()
        }
    }

    /// Sets the risk-free rate.
    #[must_use]
    pub fn with_risk_free_rate(mut self, rate: f64) -> Self {
        self.risk_free_rate = rate;
        self
    }

    /// Sets the lookback window in trading days.
    #[must_use]
    pub fn with_lookback_days(mut self, days: u32) -> Self {
        self.lookback_days = days;
        self
    }

    /// Sets the VaR/CVaR confidence level.
    #[must_use]
    pub fn with_confidence_level(mut self, level: f64) -> Self {
        self.confidence_level = level;
        self
    }

    /// Sets the rebalancing dead-band.
    #[must_use]
    pub fn with_rebalance_threshold(mut self, threshold: f64) -> Self {
        self.rebalance_threshold = threshold;
        self
    }

    /// Sets the number of frontier points.
    #[must_use]
    pub fn with_frontier_points(mut self, points: usize) -> Self {
        self.frontier_points = points;
        self
    }

    /// Sets whether to use parallel processing.
    #[must_use]
    pub fn with_parallel(mut self, enabled: bool) -> Self {
        self.parallel = enabled;
        self
    }

    /// Sets the threshold for parallel processing.
    #[must_use]
    pub fn with_threshold(mut self, threshold: usize) -> Self {
        self.parallel_threshold = threshold;
        self
    }

    /// Sets the solver limits.
    #[must_use]
    pub fn with_solver(mut self, solver: SolverConfig) -> Self {
        self.solver = solver;
        self
    }

    /// Annualization factor for volatilities, `sqrt(trading_days)`.
    #[must_use]
    pub fn annualization(&self) -> f64 {
        f64::from(self.trading_days).sqrt()
    }

    /// Returns true if parallel processing should be used for the given count.
    #[must_use]
    pub fn should_parallelize(&self, count: usize) -> bool {
        cfg!(feature = "parallel") && self.parallel && count >= self.parallel_threshold
    }
}
