//! Trades that move current holdings to target weights.

use std::collections::BTreeMap;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A currently held position, merged across members.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentPosition {
    /// Ticker symbol.
    pub symbol: String,
    /// Shares held.
    pub quantity: Decimal,
    /// Current price; zero when unresolved.
    pub current_price: Decimal,
    /// Market value.
    pub value: Decimal,
}

impl CurrentPosition {
    /// Creates a position.
    #[must_use]
    pub fn new(symbol: impl Into<String>, quantity: Decimal, current_price: Decimal) -> Self {
        Self {
            symbol: symbol.into(),
            quantity,
            current_price,
            value: quantity * current_price,
        }
    }
}

/// Direction of a trade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TradeAction {
    /// Increase the position.
    Buy,
    /// Reduce the position.
    Sell,
}

impl std::fmt::Display for TradeAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Buy => write!(f, "BUY"),
            Self::Sell => write!(f, "SELL"),
        }
    }
}

/// One rebalancing trade. Weights are percentages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    /// Ticker symbol.
    pub symbol: String,
    /// BUY or SELL.
    pub action: TradeAction,
    /// Shares to trade; 0 when the price is unresolved.
    pub quantity: f64,
    /// Absolute trade value.
    pub value: f64,
    /// Current weight (%).
    pub current_weight: f64,
    /// Target weight (%).
    pub target_weight: f64,
    /// `target_weight − current_weight` (%).
    pub weight_change: f64,
    /// True when no price was available to size the trade.
    pub price_unresolved: bool,
}

/// Generates trades from current positions toward target weights.
///
/// A symbol trades only when `|target_value − current_value|` exceeds
/// `threshold × total_value`. Trades are ordered by value, largest first.
/// Symbols absent from `targets` are left alone.
#[must_use]
pub fn rebalance_trades(
    current: &[CurrentPosition],
    targets: &BTreeMap<String, f64>,
    total_value: f64,
    threshold: f64,
) -> Vec<Trade> {
    if total_value <= 0.0 {
        return Vec::new();
    }

    let positions: BTreeMap<&str, &CurrentPosition> =
        current.iter().map(|p| (p.symbol.as_str(), p)).collect();
    let band = threshold * total_value;

    let mut trades: Vec<Trade> = targets
        .iter()
        .filter_map(|(symbol, target_weight)| {
            let position = positions.get(symbol.as_str());
            let current_value = position.and_then(|p| p.value.to_f64()).unwrap_or(0.0);
            let price = position.and_then(|p| p.current_price.to_f64()).unwrap_or(0.0);

            let diff = total_value * target_weight - current_value;
            if diff.abs() <= band {
                return None;
            }

            let current_weight = current_value / total_value * 100.0;
            let target_pct = target_weight * 100.0;
            Some(Trade {
                symbol: symbol.clone(),
                action: if diff > 0.0 {
                    TradeAction::Buy
                } else {
                    TradeAction::Sell
                },
                quantity: if price > 0.0 { diff.abs() / price } else { 0.0 },
                value: diff.abs(),
                current_weight,
                target_weight: target_pct,
                weight_change: target_pct - current_weight,
                price_unresolved: price <= 0.0,
            })
        })
        .collect();

    trades.sort_by(|a, b| b.value.total_cmp(&a.value));
    trades
}
