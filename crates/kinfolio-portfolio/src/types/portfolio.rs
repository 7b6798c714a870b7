//! Member and family portfolio snapshots.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{Holding, StockMetrics};

/// Portfolio-level metrics: the stock metrics bundle plus diversification.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PortfolioMetrics {
    /// Annualized volatility of the weighted return series.
    pub volatility: f64,
    /// Annualized expected return of the weighted return series.
    pub expected_return: f64,
    /// Sharpe ratio of the weighted return series.
    pub sharpe_ratio: f64,
    /// Beta of the weighted return series.
    pub beta: f64,
    /// Diversification score, 0 to 10.
    pub diversification_score: f64,
}

impl PortfolioMetrics {
    /// Attaches a diversification score to a metrics bundle.
    #[must_use]
    pub fn new(metrics: StockMetrics, diversification_score: f64) -> Self {
        Self {
            volatility: metrics.volatility,
            expected_return: metrics.expected_return,
            sharpe_ratio: metrics.sharpe_ratio,
            beta: metrics.beta,
            diversification_score,
        }
    }
}

/// One family member's valued portfolio.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemberPortfolio {
    /// Member id.
    pub id: String,
    /// Member name.
    pub name: String,
    /// Total market value.
    pub value: Decimal,
    /// Total known cost.
    pub cost: Decimal,
    /// `value − cost`.
    pub gain: Decimal,
    /// Gain as a percentage of cost, 0 when no cost is known.
    pub gain_pct: f64,
    /// Number of lots.
    pub holdings_count: usize,
    /// Lots in input order.
    pub holdings: Vec<Holding>,
    /// Portfolio-level metrics.
    pub metrics: PortfolioMetrics,
}

/// A symbol aggregated across the whole family.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FamilyHolding {
    /// Ticker symbol.
    pub symbol: String,
    /// Total shares across members.
    pub quantity: Decimal,
    /// Current price; zero when unresolved.
    pub current_price: Decimal,
    /// Total market value across members.
    pub value: Decimal,
    /// Total known cost across members.
    pub cost: Decimal,
    /// Share of the family's total value (fraction, 0 to 1).
    pub weight: f64,
    /// Owning member names, in order of first appearance.
    pub owners: Vec<String>,
    /// Owning member ids, parallel to `owners`.
    pub owner_ids: Vec<String>,
}

impl FamilyHolding {
    /// Starts an aggregate from a member's lot.
    #[must_use]
    pub fn new(symbol: impl Into<String>, current_price: Decimal) -> Self {
        Self {
            symbol: symbol.into(),
            quantity: Decimal::ZERO,
            current_price,
            value: Decimal::ZERO,
            cost: Decimal::ZERO,
            weight: 0.0,
            owners: Vec::new(),
            owner_ids: Vec::new(),
        }
    }

    /// Adds a member's lot. A member holding the symbol in several lots is
    /// listed once.
    pub fn add_lot(&mut self, member_id: &str, member_name: &str, holding: &Holding) {
        self.quantity += holding.quantity;
        self.value += holding.value;
        self.cost += holding.total_cost;
        if !self.owner_ids.iter().any(|id| id == member_id) {
            self.owner_ids.push(member_id.to_string());
            self.owners.push(member_name.to_string());
        }
    }

    /// True when at least two distinct members hold the symbol.
    #[must_use]
    pub fn is_overlap(&self) -> bool {
        self.owner_ids.len() >= 2
    }
}

/// Family-level totals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FamilySummary {
    /// Contact email.
    pub email: String,
    /// Total market value.
    pub total_value: Decimal,
    /// Total known cost.
    pub total_cost: Decimal,
    /// `total_value − total_cost`.
    pub total_gain: Decimal,
    /// Gain as a percentage of cost, 0 when no cost is known.
    pub total_gain_pct: f64,
    /// Number of members.
    pub member_count: usize,
    /// Number of distinct symbols.
    pub unique_stocks: usize,
    /// Number of symbols held by two or more members.
    pub overlapping_stocks: usize,
    /// Composite risk score, 0 to 10 (higher is riskier).
    pub risk_score: f64,
    /// Family-level metrics.
    pub metrics: PortfolioMetrics,
}

/// The analysed family: an immutable snapshot threaded through the
/// optimizer, risk analyzer and scenario simulator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FamilyPortfolio {
    /// Family totals and metrics.
    pub family: FamilySummary,
    /// Per-member portfolios, in input order.
    pub members: Vec<MemberPortfolio>,
    /// Symbol → owner names for symbols held by two or more members.
    pub overlaps: BTreeMap<String, Vec<String>>,
    /// Symbol → family-wide aggregate.
    pub family_holdings: BTreeMap<String, FamilyHolding>,
}

impl FamilyPortfolio {
    /// Distinct symbols held by the family, sorted.
    #[must_use]
    pub fn symbols(&self) -> Vec<String> {
        self.family_holdings.keys().cloned().collect()
    }

    /// Family weight of each symbol (fractions).
    #[must_use]
    pub fn weights(&self) -> BTreeMap<String, f64> {
        self.family_holdings
            .iter()
            .map(|(symbol, h)| (symbol.clone(), h.weight))
            .collect()
    }

    /// Family total value.
    #[must_use]
    pub fn total_value(&self) -> Decimal {
        self.family.total_value
    }

    /// Serializes the snapshot to pretty JSON.
    pub fn to_json(&self) -> crate::PortfolioResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
