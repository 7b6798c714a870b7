//! Return, volatility, Sharpe and beta of daily return series.

use std::collections::BTreeMap;

use kinfolio_math::stats::{covariance, mean, std_dev, variance, Ddof};
use tracing::debug;

use super::returns::{DatedReturn, ReturnTable};
use crate::types::{AnalyticsConfig, StockMetrics};

/// Annualized statistics of daily return series.
///
/// Pure: the engine only carries the market assumptions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MetricsEngine {
    risk_free_rate: f64,
    trading_days: f64,
}

impl MetricsEngine {
    /// Creates an engine from the analytics configuration.
    #[must_use]
    pub fn new(config: &AnalyticsConfig) -> Self {
        Self {
            risk_free_rate: config.risk_free_rate,
            trading_days: f64::from(config.trading_days),
        }
    }

    /// Mean daily return × trading days. 0 for an empty series.
    #[must_use]
    pub fn expected_return(&self, returns: &[f64]) -> f64 {
        mean(returns).map_or(0.0, |m| m * self.trading_days)
    }

    /// Standard deviation of daily returns × √trading days. 0 for an empty
    /// series.
    #[must_use]
    pub fn volatility(&self, returns: &[f64]) -> f64 {
        std_dev(returns, Ddof::Population).map_or(0.0, |s| s * self.trading_days.sqrt())
    }

    /// `(expected_return − risk_free_rate) / volatility`, 0 when volatility is 0.
    #[must_use]
    pub fn sharpe(&self, returns: &[f64]) -> f64 {
        self.sharpe_of(self.expected_return(returns), self.volatility(returns))
    }

    /// Sharpe ratio from already annualized figures.
    #[must_use]
    pub fn sharpe_of(&self, expected_return: f64, volatility: f64) -> f64 {
        if volatility > 0.0 {
            (expected_return - self.risk_free_rate) / volatility
        } else {
            0.0
        }
    }

    /// Beta of an asset against the market, aligned on date.
    ///
    /// 1.0 when either series is empty, fewer than two dates align, or the
    /// market does not move.
    #[must_use]
    pub fn beta(&self, asset: &[DatedReturn], market: &[DatedReturn]) -> f64 {
        if asset.is_empty() || market.is_empty() {
            return 1.0;
        }

        let market_by_date: BTreeMap<_, _> = market.iter().copied().collect();
        let (a, m): (Vec<f64>, Vec<f64>) = asset
            .iter()
            .filter_map(|(date, r)| market_by_date.get(date).map(|mr| (*r, *mr)))
            .unzip();

        if a.len() < 2 {
            return 1.0;
        }

        let market_variance = variance(&m, Ddof::Sample).unwrap_or(0.0);
        if market_variance == 0.0 {
            return 1.0;
        }

        covariance(&a, &m, Ddof::Sample).map_or(1.0, |cov| cov / market_variance)
    }

    /// Full metrics bundle of one dated return series.
    #[must_use]
    pub fn series_metrics(&self, series: &[DatedReturn], market: &[DatedReturn]) -> StockMetrics {
        if series.is_empty() {
            return StockMetrics::NEUTRAL;
        }

        let returns: Vec<f64> = series.iter().map(|(_, r)| *r).collect();
        let expected_return = self.expected_return(&returns);
        let volatility = self.volatility(&returns);

        StockMetrics {
            volatility,
            expected_return,
            sharpe_ratio: self.sharpe_of(expected_return, volatility),
            beta: self.beta(series, market),
        }
    }

    /// Metrics of one symbol's column; neutral when it has no history.
    #[must_use]
    pub fn stock_metrics(
        &self,
        table: &ReturnTable,
        symbol: &str,
        market: &[DatedReturn],
    ) -> StockMetrics {
        self.series_metrics(&table.column(symbol), market)
    }

    /// Metrics of a weighted portfolio of symbols.
    ///
    /// Symbols without history are dropped and the remaining weights are
    /// rescaled to sum to one. Neutral when nothing remains.
    #[must_use]
    pub fn portfolio_metrics(
        &self,
        weights: &[(String, f64)],
        table: &ReturnTable,
        market: &[DatedReturn],
    ) -> StockMetrics {
        if weights.is_empty() || table.is_empty() {
            return StockMetrics::NEUTRAL;
        }

        let available: Vec<(String, f64)> = weights
            .iter()
            .filter(|(symbol, _)| table.contains(symbol))
            .cloned()
            .collect();
        if available.is_empty() {
            debug!("no history for any portfolio symbol, using neutral metrics");
            return StockMetrics::NEUTRAL;
        }

        let total: f64 = available.iter().map(|(_, w)| w).sum();
        let rescaled: Vec<(String, f64)> = if available.len() < weights.len() && total > 0.0 {
            available
                .into_iter()
                .map(|(symbol, w)| (symbol, w / total))
                .collect()
        } else {
            available
        };

        self.series_metrics(&table.weighted_returns(&rescaled), market)
    }
}

impl Default for MetricsEngine {
    fn default() -> Self {
        Self::new(&AnalyticsConfig::default())
    }
}
