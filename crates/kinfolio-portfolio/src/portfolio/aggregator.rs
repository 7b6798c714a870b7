//! Family portfolio aggregation.
//!
//! Values every lot at its current price, computes stock, member and family
//! metrics from a shared return table, merges holdings across members to
//! find overlap and scores overall risk.

use std::collections::BTreeMap;

use kinfolio_traits::MarketDataSource;
use rust_decimal::Decimal;
use tracing::{debug, warn};

use super::MarketHistory;
use crate::analytics::{diversification_score, maybe_parallel_map, CorrelationMatrix, MetricsEngine};
use crate::error::PortfolioResult;
use crate::types::{
    fraction_of, percent_of, AnalyticsConfig, FamilyHolding, FamilyPortfolio, FamilySummary,
    Holding, InvestorInput, MemberPortfolio, PortfolioInput, PortfolioMetrics, StockMetrics,
};

/// Builds [`FamilyPortfolio`] snapshots from raw input.
///
/// Data gaps never abort aggregation: an unresolved price values the lot at
/// zero and a symbol without history gets neutral metrics.
pub struct Aggregator<'a, M: MarketDataSource + ?Sized> {
    source: &'a M,
    config: &'a AnalyticsConfig,
}

impl<'a, M: MarketDataSource + ?Sized> Aggregator<'a, M> {
    /// Creates an aggregator over a market data source.
    pub fn new(source: &'a M, config: &'a AnalyticsConfig) -> Self {
        Self { source, config }
    }

    /// Validates the input and produces the family snapshot.
    pub fn process_portfolio(&self, input: &PortfolioInput) -> PortfolioResult<FamilyPortfolio> {
        input.validate()?;

        let symbols = input.symbols();
        debug!(
            members = input.investors.len(),
            symbols = symbols.len(),
            "aggregating family portfolio"
        );

        let prices = self.resolve_prices(&symbols);
        let history = MarketHistory::load(self.source, &symbols, self.config.lookback_days);
        let engine = MetricsEngine::new(self.config);

        let stock_metrics: BTreeMap<String, StockMetrics> = symbols
            .iter()
            .cloned()
            .zip(maybe_parallel_map(&symbols, self.config, |symbol| {
                engine.stock_metrics(&history.table, symbol, &history.market)
            }))
            .collect();

        let members: Vec<MemberPortfolio> = input
            .investors
            .iter()
            .map(|investor| build_member(investor, &prices, &stock_metrics, &engine, &history))
            .collect();

        Ok(build_family(&input.email, members, &engine, &history))
    }

    fn resolve_prices(&self, symbols: &[String]) -> BTreeMap<String, Option<Decimal>> {
        let resolved = maybe_parallel_map(symbols, self.config, |symbol| {
            match self.source.current_price(symbol) {
                Ok(Some(price)) => Some(price),
                Ok(None) => {
                    warn!(symbol = %symbol, "no current price, valuing at zero");
                    None
                }
                Err(e) => {
                    warn!(symbol = %symbol, error = %e, "price lookup failed, valuing at zero");
                    None
                }
            }
        });
        symbols.iter().cloned().zip(resolved).collect()
    }
}

fn build_member(
    investor: &InvestorInput,
    prices: &BTreeMap<String, Option<Decimal>>,
    stock_metrics: &BTreeMap<String, StockMetrics>,
    engine: &MetricsEngine,
    history: &MarketHistory,
) -> MemberPortfolio {
    let lots: Vec<Holding> = investor
        .stocks
        .iter()
        .map(|stock| {
            Holding::value_lot(
                stock,
                prices.get(&stock.symbol).copied().flatten(),
                stock_metrics.get(&stock.symbol).copied().unwrap_or_default(),
            )
        })
        .collect();

    let value: Decimal = lots.iter().map(|h| h.value).sum();
    let cost: Decimal = lots.iter().map(|h| h.total_cost).sum();
    let holdings: Vec<Holding> = lots.into_iter().map(|h| h.with_weight_of(value)).collect();

    let mut weights: BTreeMap<String, f64> = BTreeMap::new();
    for holding in &holdings {
        *weights.entry(holding.symbol.clone()).or_default() += holding.weight;
    }
    let weights: Vec<(String, f64)> = weights.into_iter().collect();

    let metrics = portfolio_metrics(&weights, engine, history);
    let gain = value - cost;

    MemberPortfolio {
        id: investor.id.clone(),
        name: investor.name.clone(),
        value,
        cost,
        gain,
        gain_pct: percent_of(gain, cost),
        holdings_count: holdings.len(),
        holdings,
        metrics,
    }
}

fn build_family(
    email: &str,
    members: Vec<MemberPortfolio>,
    engine: &MetricsEngine,
    history: &MarketHistory,
) -> FamilyPortfolio {
    let mut family_holdings: BTreeMap<String, FamilyHolding> = BTreeMap::new();
    for member in &members {
        for holding in &member.holdings {
            family_holdings
                .entry(holding.symbol.clone())
                .or_insert_with(|| FamilyHolding::new(&holding.symbol, holding.current_price))
                .add_lot(&member.id, &member.name, holding);
        }
    }

    let total_value: Decimal = members.iter().map(|m| m.value).sum();
    let total_cost: Decimal = members.iter().map(|m| m.cost).sum();
    for aggregate in family_holdings.values_mut() {
        aggregate.weight = fraction_of(aggregate.value, total_value);
    }

    let overlaps: BTreeMap<String, Vec<String>> = family_holdings
        .iter()
        .filter(|(_, h)| h.is_overlap())
        .map(|(symbol, h)| (symbol.clone(), h.owners.clone()))
        .collect();

    let weights: Vec<(String, f64)> = family_holdings
        .iter()
        .map(|(symbol, h)| (symbol.clone(), h.weight))
        .collect();
    let metrics = portfolio_metrics(&weights, engine, history);
    let risk_score = risk_score(&metrics, overlaps.len(), family_holdings.len());
    let total_gain = total_value - total_cost;

    debug!(
        total_value = %total_value,
        overlapping = overlaps.len(),
        risk_score,
        "family portfolio aggregated"
    );

    FamilyPortfolio {
        family: FamilySummary {
            email: email.to_string(),
            total_value,
            total_cost,
            total_gain,
            total_gain_pct: percent_of(total_gain, total_cost),
            member_count: members.len(),
            unique_stocks: family_holdings.len(),
            overlapping_stocks: overlaps.len(),
            risk_score,
            metrics,
        },
        members,
        overlaps,
        family_holdings,
    }
}

fn portfolio_metrics(
    weights: &[(String, f64)],
    engine: &MetricsEngine,
    history: &MarketHistory,
) -> PortfolioMetrics {
    let stats = engine.portfolio_metrics(weights, &history.table, &history.market);
    let symbols: Vec<String> = weights.iter().map(|(s, _)| s.clone()).collect();
    let correlations = CorrelationMatrix::from_table(&history.table.restrict(&symbols));
    PortfolioMetrics::new(stats, diversification_score(symbols.len(), &correlations))
}

/// Composite risk score on a 0 to 10 scale (higher is riskier).
///
/// ```text
/// volatility      min(vol × 10, 3)
/// beta            min(|beta − 1| × 2, 2)
/// diversification max(0, 3 − div / 10 × 3)
/// overlap         min(overlaps / symbols × 2, 2), 0 without symbols
/// ```
#[must_use]
pub fn risk_score(metrics: &PortfolioMetrics, overlap_count: usize, total_symbols: usize) -> f64 {
    let volatility = (metrics.volatility * 10.0).min(3.0);
    let beta = ((metrics.beta - 1.0).abs() * 2.0).min(2.0);
    let diversification = (3.0 - metrics.diversification_score / 10.0 * 3.0).max(0.0);
    let overlap = if total_symbols == 0 {
        0.0
    } else {
        (overlap_count as f64 / total_symbols as f64 * 2.0).min(2.0)
    };

    (volatility + beta + diversification + overlap).clamp(0.0, 10.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::StockInput;
    use approx::assert_relative_eq;
    use chrono::NaiveDate;
    use kinfolio_ext_file::InMemoryMarketData;
    use rust_decimal_macros::dec;

    fn member(id: &str, name: &str, stocks: Vec<StockInput>) -> InvestorInput {
        InvestorInput {
            id: id.to_string(),
            name: name.to_string(),
            stocks,
        }
    }

    fn family() -> PortfolioInput {
        PortfolioInput {
            email: "family@example.com".to_string(),
            investors: vec![
                member(
                    "A",
                    "Asha",
                    vec![
                        StockInput::new("RELIANCE", dec!(10), dec!(2000)),
                        StockInput::new("TCS", dec!(5), dec!(0)),
                    ],
                ),
                member("B", "Ravi", vec![StockInput::new("RELIANCE", dec!(10), dec!(2600))]),
            ],
        }
    }

    fn source() -> InMemoryMarketData {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        InMemoryMarketData::new()
            .with_price("RELIANCE", dec!(2500))
            .with_price("TCS", dec!(4000))
            .with_closes("RELIANCE", start, &[2400.0, 2420.0, 2410.0, 2450.0, 2500.0])
            .with_closes("TCS", start, &[3900.0, 3950.0, 3920.0, 3980.0, 4000.0])
            .with_benchmark_closes(start, &[100.0, 101.0, 100.5, 101.5, 102.0])
    }

    #[test]
    fn test_overlap_and_totals() {
        let config = AnalyticsConfig::sequential();
        let source = source();
        let portfolio = Aggregator::new(&source, &config)
            .process_portfolio(&family())
            .unwrap();

        assert_eq!(portfolio.overlaps.len(), 1);
        assert_eq!(
            portfolio.overlaps["RELIANCE"],
            vec!["Asha".to_string(), "Ravi".to_string()]
        );

        assert_eq!(portfolio.family.total_value, dec!(70000));
        assert_eq!(portfolio.family.total_cost, dec!(46000));
        assert_eq!(portfolio.family.unique_stocks, 2);
        assert_eq!(portfolio.family.overlapping_stocks, 1);

        let asha = &portfolio.members[0];
        assert_eq!(asha.value, dec!(45000));
        // TCS has no cost basis, so the whole TCS value counts as gain
        assert_eq!(asha.gain, dec!(25000));
        let weights: f64 = asha.holdings.iter().map(|h| h.weight).sum();
        assert_relative_eq!(weights, 1.0, epsilon = 1e-12);

        let family_weights: f64 = portfolio.family_holdings.values().map(|h| h.weight).sum();
        assert_relative_eq!(family_weights, 1.0, epsilon = 1e-12);
        assert!((0.0..=10.0).contains(&portfolio.family.risk_score));
    }

    #[test]
    fn test_missing_data_uses_neutral_values() {
        let config = AnalyticsConfig::sequential();
        let source = InMemoryMarketData::new();
        let input = PortfolioInput {
            email: "family@example.com".to_string(),
            investors: vec![member("A", "Asha", vec![StockInput::new("XYZ", dec!(1), dec!(0))])],
        };

        let portfolio = Aggregator::new(&source, &config)
            .process_portfolio(&input)
            .unwrap();
        let holding = &portfolio.members[0].holdings[0];
        assert_eq!(holding.value, Decimal::ZERO);
        assert!(!holding.price_resolved);
        assert_eq!(holding.weight, 0.0);
        assert_eq!(holding.metrics, StockMetrics::NEUTRAL);
        assert_eq!(portfolio.members[0].metrics.diversification_score, 0.0);
    }

    #[test]
    fn test_invalid_input_is_rejected() {
        let config = AnalyticsConfig::sequential();
        let source = source();
        let mut input = family();
        input.email = "not-an-email".to_string();
        assert!(Aggregator::new(&source, &config)
            .process_portfolio(&input)
            .is_err());
    }

    #[test]
    fn test_risk_score_components() {
        let calm = PortfolioMetrics {
            volatility: 0.0,
            expected_return: 0.0,
            sharpe_ratio: 0.0,
            beta: 1.0,
            diversification_score: 10.0,
        };
        assert_relative_eq!(risk_score(&calm, 0, 0), 0.0);

        let wild = PortfolioMetrics {
            volatility: 0.9,
            beta: 3.0,
            diversification_score: 0.0,
            ..calm
        };
        assert_relative_eq!(risk_score(&wild, 4, 4), 10.0);

        let mid = PortfolioMetrics {
            volatility: 0.2,
            beta: 1.25,
            diversification_score: 5.0,
            ..calm
        };
        // 2 + 0.5 + 1.5 + 0.5
        assert_relative_eq!(risk_score(&mid, 1, 4), 4.5, epsilon = 1e-12);
    }
}
