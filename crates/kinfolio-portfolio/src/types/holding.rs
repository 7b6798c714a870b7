//! Valued holdings and their return metrics.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::StockInput;

/// Annualized return statistics of one return series.
///
/// Used for single stocks and, with a diversification score attached, for
/// whole portfolios.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StockMetrics {
    /// Annualized volatility (population standard deviation × √252).
    pub volatility: f64,
    /// Annualized expected return (mean daily return × 252).
    pub expected_return: f64,
    /// `(expected_return − risk_free_rate) / volatility`, 0 when volatility is 0.
    pub sharpe_ratio: f64,
    /// Beta against the market benchmark.
    pub beta: f64,
}

impl StockMetrics {
    /// Metrics assumed when there is no history: flat, market-neutral.
    pub const NEUTRAL: Self = Self {
        volatility: 0.0,
        expected_return: 0.0,
        sharpe_ratio: 0.0,
        beta: 1.0,
    };
}

impl Default for StockMetrics {
    fn default() -> Self {
        Self::NEUTRAL
    }
}

/// A single stock lot valued at the current price.
///
/// Created during aggregation; immutable afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Holding {
    /// Ticker symbol.
    pub symbol: String,
    /// Number of shares.
    pub quantity: Decimal,
    /// Average cost per share; zero when unknown.
    pub cost_basis: Decimal,
    /// Current price; zero when unresolved.
    pub current_price: Decimal,
    /// False when the market data source had no price.
    pub price_resolved: bool,
    /// `quantity × current_price`.
    pub value: Decimal,
    /// `quantity × cost_basis`, zero when the cost basis is unknown.
    pub total_cost: Decimal,
    /// `value − total_cost`, zero when the cost is unknown.
    pub gain: Decimal,
    /// Gain as a percentage of cost, zero when the cost is unknown.
    pub gain_pct: f64,
    /// Share of the owning member's value (fraction, 0 to 1).
    pub weight: f64,
    /// Stock-level metrics.
    pub metrics: StockMetrics,
}

impl Holding {
    /// Values a lot. The weight is filled in once the member total is known.
    #[must_use]
    pub fn value_lot(stock: &StockInput, price: Option<Decimal>, metrics: StockMetrics) -> Self {
        let current_price = price.unwrap_or(Decimal::ZERO);
        let value = stock.quantity * current_price;
        let total_cost = if stock.cost_basis > Decimal::ZERO {
            stock.quantity * stock.cost_basis
        } else {
            Decimal::ZERO
        };
        let gain = if total_cost > Decimal::ZERO {
            value - total_cost
        } else {
            Decimal::ZERO
        };

        Self {
            symbol: stock.symbol.clone(),
            quantity: stock.quantity,
            cost_basis: stock.cost_basis,
            current_price,
            price_resolved: price.is_some(),
            value,
            total_cost,
            gain,
            gain_pct: percent_of(gain, total_cost),
            weight: 0.0,
            metrics,
        }
    }

    /// Sets the weight from the owning portfolio's total value.
    #[must_use]
    pub fn with_weight_of(mut self, total_value: Decimal) -> Self {
        self.weight = fraction_of(self.value, total_value);
        self
    }
}

/// `part / whole` as `f64`, 0 when `whole` is not positive.
pub(crate) fn fraction_of(part: Decimal, whole: Decimal) -> f64 {
    if whole > Decimal::ZERO {
        (part / whole).to_f64().unwrap_or(0.0)
    } else {
        0.0
    }
}

/// `part / whole × 100`, 0 when `whole` is not positive.
pub(crate) fn percent_of(part: Decimal, whole: Decimal) -> f64 {
    fraction_of(part, whole) * 100.0
}
