//! Annualized return and covariance estimates for the optimizer.

use kinfolio_math::linear_algebra::covariance_matrix;
use kinfolio_math::stats::{mean, Ddof};
use nalgebra::DMatrix;

use crate::analytics::ReturnTable;
use crate::outcome::Outcome;

/// Expected returns and covariance of a symbol set, annualized.
///
/// Built from the return table restricted to the requested symbols, with
/// missing cells read as zero returns. Requested symbols without history are
/// listed in `excluded_symbols` and take no part in the optimization.
#[derive(Debug, Clone, PartialEq)]
pub struct Moments {
    /// Symbols with history, sorted.
    pub symbols: Vec<String>,
    /// Mean daily return × trading days, parallel to `symbols`.
    pub expected_returns: Vec<f64>,
    /// Sample covariance of daily returns × trading days.
    pub covariance: DMatrix<f64>,
    /// Requested symbols that had no history.
    pub excluded_symbols: Vec<String>,
}

impl Moments {
    /// Estimates moments for `symbols`.
    ///
    /// Unavailable when no requested symbol has history or fewer than two
    /// dates are available for the covariance.
    pub fn estimate(table: &ReturnTable, symbols: &[String], trading_days: u32) -> Outcome<Self> {
        let restricted = table.restrict(symbols);
        if restricted.is_empty() {
            return Outcome::unavailable("no historical data for any requested symbol");
        }
        if restricted.dates().len() < 2 {
            return Outcome::unavailable("fewer than two return observations");
        }

        let annual = f64::from(trading_days);
        let included = restricted.symbols().to_vec();
        let columns: Vec<Vec<f64>> = included
            .iter()
            .filter_map(|s| restricted.filled_column(s))
            .collect();

        let expected_returns = columns
            .iter()
            .map(|c| mean(c).unwrap_or(0.0) * annual)
            .collect();
        let covariance = match covariance_matrix(&columns, Ddof::Sample) {
            Ok(cov) => cov * annual,
            Err(e) => return Outcome::failed(format!("covariance estimation failed: {e}")),
        };

        let mut excluded_symbols: Vec<String> = symbols
            .iter()
            .filter(|s| !restricted.contains(s))
            .cloned()
            .collect();
        excluded_symbols.sort();
        excluded_symbols.dedup();

        Outcome::ready(Self {
            symbols: included,
            expected_returns,
            covariance,
            excluded_symbols,
        })
    }

    /// Number of assets.
    #[must_use]
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    /// True when there are no assets.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Portfolio expected return `wᵗμ`.
    #[must_use]
    pub fn portfolio_return(&self, weights: &[f64]) -> f64 {
        weights
            .iter()
            .zip(&self.expected_returns)
            .map(|(w, mu)| w * mu)
            .sum()
    }

    /// Portfolio variance `wᵗΣw`.
    #[must_use]
    pub fn portfolio_variance(&self, weights: &[f64]) -> f64 {
        let w = nalgebra::DVector::from_column_slice(weights);
        w.dot(&(&self.covariance * &w))
    }

    /// `Σw` as a plain vector.
    #[must_use]
    pub fn covariance_times(&self, weights: &[f64]) -> Vec<f64> {
        let w = nalgebra::DVector::from_column_slice(weights);
        (&self.covariance * w).iter().copied().collect()
    }

    /// Smallest and largest single-asset expected return.
    #[must_use]
    pub fn return_range(&self) -> Option<(f64, f64)> {
        let min = self.expected_returns.iter().copied().reduce(f64::min)?;
        let max = self.expected_returns.iter().copied().reduce(f64::max)?;
        Some((min, max))
    }
}
