//! Family-level optimization: current vs optimized allocation and the trades
//! between them.

use std::collections::BTreeMap;

use kinfolio_traits::MarketDataSource;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::{
    efficient_frontier, optimize_with_moments, rebalance_trades, Allocation, CurrentPosition,
    EfficientFrontier, Moments, OptimizationMethod, Trade,
};
use crate::outcome::Outcome;
use crate::portfolio::MarketHistory;
use crate::types::{AnalyticsConfig, FamilyPortfolio};

/// Change from the current to the optimized allocation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Improvement {
    /// Optimized minus current expected return.
    pub return_change: f64,
    /// Optimized minus current volatility.
    pub volatility_change: f64,
    /// Optimized minus current Sharpe ratio.
    pub sharpe_change: f64,
}

impl Improvement {
    fn between(current: &Allocation, optimized: &Allocation) -> Self {
        Self {
            return_change: optimized.expected_return - current.expected_return,
            volatility_change: optimized.volatility - current.volatility,
            sharpe_change: optimized.sharpe_ratio - current.sharpe_ratio,
        }
    }
}

/// Result of optimizing a family portfolio.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizationResult {
    /// Method used.
    pub method: OptimizationMethod,
    /// Current allocation over the optimized symbols.
    pub current: Allocation,
    /// Optimized allocation.
    pub optimized: Allocation,
    /// Optimized minus current statistics.
    pub improvement: Improvement,
    /// Trades toward the optimized weights, largest first.
    pub trades: Vec<Trade>,
    /// Held symbols without history; they are neither optimized nor traded.
    pub excluded_symbols: Vec<String>,
}

/// Merges every member's lots by symbol.
///
/// The price of a merged position is the price of its first lot.
#[must_use]
pub fn merged_positions(portfolio: &FamilyPortfolio) -> Vec<CurrentPosition> {
    let mut merged: BTreeMap<&str, CurrentPosition> = BTreeMap::new();
    for holding in portfolio.members.iter().flat_map(|m| &m.holdings) {
        let position = merged
            .entry(holding.symbol.as_str())
            .or_insert_with(|| CurrentPosition {
                symbol: holding.symbol.clone(),
                quantity: Decimal::ZERO,
                current_price: holding.current_price,
                value: Decimal::ZERO,
            });
        position.quantity += holding.quantity;
        position.value += holding.value;
    }
    merged.into_values().collect()
}

/// Optimizes the family's aggregated holdings over precomputed moments.
pub fn optimize_family(
    portfolio: &FamilyPortfolio,
    moments: &Moments,
    method: OptimizationMethod,
    target_return: Option<f64>,
    config: &AnalyticsConfig,
) -> Outcome<OptimizationResult> {
    let positions: Vec<CurrentPosition> = merged_positions(portfolio)
        .into_iter()
        .filter(|p| moments.symbols.contains(&p.symbol))
        .collect();

    let investable: f64 = positions.iter().filter_map(|p| p.value.to_f64()).sum();
    let current_weights: BTreeMap<String, f64> = positions
        .iter()
        .map(|p| {
            let w = if investable > 0.0 {
                p.value.to_f64().unwrap_or(0.0) / investable
            } else {
                0.0
            };
            (p.symbol.clone(), w)
        })
        .collect();

    let current_vector: Vec<f64> = moments
        .symbols
        .iter()
        .map(|s| current_weights.get(s).copied().unwrap_or(0.0))
        .collect();
    let current = Allocation::evaluate(moments, &current_vector, config.risk_free_rate);

    optimize_with_moments(moments, Some(&current_weights), method, target_return, config).map(
        |optimized| {
            let trades = rebalance_trades(
                &positions,
                &optimized.weights,
                investable,
                config.rebalance_threshold,
            );
            debug!(method = %method, trades = trades.len(), "family optimization complete");

            OptimizationResult {
                method,
                improvement: Improvement::between(&current, &optimized),
                current,
                optimized,
                trades,
                excluded_symbols: moments.excluded_symbols.clone(),
            }
        },
    )
}

/// Optimizer bound to a market data source.
///
/// Each call fetches the history it needs; nothing is cached between calls.
pub struct Optimizer<'a, M: MarketDataSource + ?Sized> {
    source: &'a M,
    config: &'a AnalyticsConfig,
}

impl<'a, M: MarketDataSource + ?Sized> Optimizer<'a, M> {
    /// Creates an optimizer.
    pub fn new(source: &'a M, config: &'a AnalyticsConfig) -> Self {
        Self { source, config }
    }

    fn moments(&self, symbols: &[String]) -> Outcome<Moments> {
        let history = MarketHistory::load(self.source, symbols, self.config.lookback_days);
        let moments = Moments::estimate(&history.table, symbols, self.config.trading_days);
        if let Some(m) = moments.as_ready() {
            if !m.excluded_symbols.is_empty() {
                warn!(symbols = ?m.excluded_symbols, "excluded from optimization, no history");
            }
        }
        moments
    }

    /// Optimizes weights over `symbols`.
    pub fn optimize(
        &self,
        symbols: &[String],
        current_weights: Option<&BTreeMap<String, f64>>,
        method: OptimizationMethod,
        target_return: Option<f64>,
    ) -> Outcome<Allocation> {
        self.moments(symbols).and_then(|m| {
            optimize_with_moments(&m, current_weights, method, target_return, self.config)
        })
    }

    /// Samples the efficient frontier over `symbols`.
    pub fn efficient_frontier(&self, symbols: &[String], n_points: usize) -> Outcome<EfficientFrontier> {
        self.moments(symbols)
            .and_then(|m| efficient_frontier(&m, n_points, self.config))
    }

    /// Optimizes a family portfolio and derives rebalancing trades.
    pub fn optimize_family(
        &self,
        portfolio: &FamilyPortfolio,
        method: OptimizationMethod,
        target_return: Option<f64>,
    ) -> Outcome<OptimizationResult> {
        self.moments(&portfolio.symbols())
            .and_then(|m| optimize_family(portfolio, &m, method, target_return, self.config))
    }
}
