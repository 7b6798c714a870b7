//! Integration tests for kinfolio-portfolio.
//!
//! These tests run whole analyses against an in-memory market with a few
//! months of synthetic history.

use std::collections::BTreeMap;

use approx::assert_relative_eq;
use chrono::NaiveDate;
use kinfolio_ext_file::InMemoryMarketData;
use kinfolio_portfolio::prelude::*;
use kinfolio_portfolio::{
    rebalance_trades, worst_case, ConcentrationLevel, CurrentPosition, FamilyHolding,
};
use rust_decimal::prelude::ToPrimitive;

// =============================================================================
// TEST FIXTURES
// =============================================================================

const SYMBOLS: [&str; 5] = ["HDFCBANK", "INFY", "RELIANCE", "TCS", "WIPRO"];

fn start() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
}

/// Deterministic pseudo-random return in roughly [-2%, 2%].
fn noise(seed: u64, i: u64) -> f64 {
    let mut x = seed.wrapping_mul(31).wrapping_add(i).wrapping_mul(0x9E37_79B9_7F4A_7C15);
    x ^= x >> 29;
    x = x.wrapping_mul(0xBF58_476D_1CE4_E5B9);
    x ^= x >> 32;
    (x % 4001) as f64 / 100_000.0 - 0.02
}

/// Closes compounding `drift` plus noise from `base`.
fn closes(seed: u64, base: f64, drift: f64, days: u64) -> Vec<f64> {
    let mut price = base;
    (0..days)
        .map(|i| {
            if i > 0 {
                price *= 1.0 + drift + noise(seed, i);
            }
            price
        })
        .collect()
}

/// A market with ~120 days of history for every symbol and the benchmark.
fn market() -> InMemoryMarketData {
    let days = 120;
    let params = [
        ("HDFCBANK", 1600.0, 0.0004),
        ("INFY", 1500.0, 0.0008),
        ("RELIANCE", 2500.0, 0.0006),
        ("TCS", 4000.0, 0.0002),
        ("WIPRO", 450.0, -0.0001),
    ];

    let mut market = InMemoryMarketData::new();
    for (seed, (symbol, base, drift)) in params.iter().enumerate() {
        let series = closes(seed as u64 + 1, *base, *drift, days);
        let last = *series.last().unwrap();
        market = market
            .with_price(*symbol, Decimal::try_from(last.round()).unwrap())
            .with_closes(*symbol, start(), &series);
    }
    market.with_benchmark_closes(start(), &closes(99, 20_000.0, 0.0004, days))
}

fn investor(id: &str, name: &str, stocks: Vec<StockInput>) -> InvestorInput {
    InvestorInput {
        id: id.to_string(),
        name: name.to_string(),
        stocks,
    }
}

/// Three members; INFY is held by all, RELIANCE by two.
fn family_input() -> PortfolioInput {
    PortfolioInput {
        email: "sharma.family@example.com".to_string(),
        investors: vec![
            investor(
                "INV001",
                "Asha",
                vec![
                    StockInput::new("RELIANCE", dec!(20), dec!(2300)),
                    StockInput::new("INFY", dec!(30), dec!(1400)),
                    StockInput::new("TCS", dec!(10), dec!(3600)),
                ],
            ),
            investor(
                "INV002",
                "Ravi",
                vec![
                    StockInput::new("INFY", dec!(15), dec!(1550)),
                    StockInput::new("HDFCBANK", dec!(40), dec!(1500)),
                ],
            ),
            investor(
                "INV003",
                "Meera",
                vec![
                    StockInput::new("RELIANCE", dec!(5), dec!(2600)),
                    StockInput::new("INFY", dec!(10), dec!(0)),
                    StockInput::new("WIPRO", dec!(100), dec!(420)),
                ],
            ),
        ],
    }
}

fn session() -> AnalysisSession<InMemoryMarketData> {
    AnalysisSession::start(market(), AnalyticsConfig::sequential(), &family_input()).unwrap()
}

// =============================================================================
// AGGREGATION
// =============================================================================

#[test]
fn test_overlaps_list_every_owner() {
    let session = session();
    let portfolio = session.portfolio();

    assert_eq!(portfolio.overlaps.len(), 2);
    assert_eq!(portfolio.overlaps["INFY"], vec!["Asha", "Ravi", "Meera"]);
    assert_eq!(portfolio.overlaps["RELIANCE"], vec!["Asha", "Meera"]);
    assert!(!portfolio.overlaps.contains_key("TCS"));

    let infy = &portfolio.family_holdings["INFY"];
    assert_eq!(infy.quantity, dec!(55));
    assert_eq!(infy.owner_ids, vec!["INV001", "INV002", "INV003"]);
    assert!(infy.is_overlap());

    assert_eq!(portfolio.family.member_count, 3);
    assert_eq!(portfolio.family.unique_stocks, 5);
    assert_eq!(portfolio.family.overlapping_stocks, 2);
}

#[test]
fn test_family_totals_match_members() {
    let session = session();
    let portfolio = session.portfolio();

    let member_value: Decimal = portfolio.members.iter().map(|m| m.value).sum();
    let member_cost: Decimal = portfolio.members.iter().map(|m| m.cost).sum();
    assert_eq!(portfolio.family.total_value, member_value);
    assert_eq!(portfolio.family.total_cost, member_cost);
    assert_eq!(
        portfolio.family.total_gain,
        portfolio.family.total_value - portfolio.family.total_cost
    );

    let holding_value: Decimal = portfolio.family_holdings.values().map(|h| h.value).sum();
    assert_eq!(holding_value, portfolio.family.total_value);

    let weights: f64 = portfolio.family_holdings.values().map(|h| h.weight).sum();
    assert_relative_eq!(weights, 1.0, epsilon = 1e-9);

    for member in &portfolio.members {
        let weights: f64 = member.holdings.iter().map(|h| h.weight).sum();
        assert_relative_eq!(weights, 1.0, epsilon = 1e-9);
        assert_eq!(member.holdings_count, member.holdings.len());
    }
}

#[test]
fn test_metrics_are_finite_and_score_bounded() {
    let session = session();
    let family = &session.portfolio().family;

    assert!(family.metrics.volatility.is_finite());
    assert!(family.metrics.volatility > 0.0);
    assert!(family.metrics.expected_return.is_finite());
    assert!(family.metrics.sharpe_ratio.is_finite());
    assert!(family.metrics.beta.is_finite());
    assert!((0.0..=10.0).contains(&family.risk_score));

    for holding in session.portfolio().members.iter().flat_map(|m| &m.holdings) {
        assert!(holding.price_resolved, "{} should be priced", holding.symbol);
        assert!(holding.metrics.volatility > 0.0);
    }
}

#[test]
fn test_snapshot_serializes_with_documented_names() {
    let json = session().portfolio().to_json().unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();

    assert!(value["family"]["risk_score"].is_number());
    assert!(value["members"][0]["metrics"]["sharpe_ratio"].is_number());
    assert_eq!(
        value["family_holdings"]["RELIANCE"]["owners"],
        serde_json::json!(["Asha", "Meera"])
    );
}

#[test]
fn test_unknown_symbol_degrades_gracefully() {
    let mut input = family_input();
    input.investors[1]
        .stocks
        .push(StockInput::new("DELISTED", dec!(10), dec!(100)));

    let session =
        AnalysisSession::start(market(), AnalyticsConfig::sequential(), &input).unwrap();
    let holding = &session.portfolio().family_holdings["DELISTED"];
    assert_eq!(holding.value, Decimal::ZERO);
    assert_eq!(holding.weight, 0.0);

    // Optimization ignores it and never trades it
    let result = session
        .optimize(OptimizationMethod::EqualWeight, None)
        .into_ready()
        .unwrap();
    assert_eq!(result.excluded_symbols, vec!["DELISTED"]);
    assert!(result.trades.iter().all(|t| t.symbol != "DELISTED"));
}

#[test]
fn test_invalid_input_is_rejected() {
    let json = r#"{"email": "nobody", "investor": [{"id": "A", "name": "A",
        "stocks": [{"symbol": "TCS", "quantity": "1", "cost_basis": "10"}]}]}"#;
    assert!(PortfolioInput::parse(json).is_err());

    let mut input = family_input();
    input.investors[0].stocks[0].quantity = Decimal::ZERO;
    assert!(AnalysisSession::start(market(), AnalyticsConfig::sequential(), &input).is_err());
}

#[test]
fn test_input_accepts_text_and_numbers() {
    let json = r#"{"email": "a@b.co", "investor": [{"id": "A", "name": "Asha",
        "stocks": [{"symbol": "TCS", "quantity": "10", "cost_basis": 3500.5},
                   {"symbol": "INFY", "quantity": 5}]}]}"#;
    let input = PortfolioInput::parse(json).unwrap();
    let stocks = &input.investors[0].stocks;
    assert_eq!(stocks[0].cost_basis, dec!(3500.5));
    assert_eq!(stocks[1].cost_basis, Decimal::ZERO);
    assert_eq!(input.symbols(), vec!["INFY", "TCS"]);
}

// =============================================================================
// OPTIMIZATION
// =============================================================================

#[test]
fn test_equal_weight_over_five_symbols() {
    let result = session()
        .optimize(OptimizationMethod::EqualWeight, None)
        .into_ready()
        .unwrap();

    assert_eq!(result.optimized.weights.len(), 5);
    for symbol in SYMBOLS {
        assert_relative_eq!(result.optimized.weight(symbol), 0.2, epsilon = 1e-12);
    }
    assert_relative_eq!(
        result.improvement.sharpe_change,
        result.optimized.sharpe_ratio - result.current.sharpe_ratio,
        epsilon = 1e-12
    );
}

#[test]
fn test_min_volatility_beats_current_allocation() {
    let result = session()
        .optimize(OptimizationMethod::MinVolatility, None)
        .into_ready()
        .unwrap();

    let total: f64 = result.optimized.weights.values().sum();
    assert_relative_eq!(total, 1.0, epsilon = 1e-6);
    assert!(result.optimized.weights.values().all(|w| *w >= -1e-9));
    assert!(result.optimized.volatility <= result.current.volatility + 1e-9);
    assert!(result.improvement.volatility_change <= 1e-9);
}

#[test]
fn test_trades_move_toward_optimized_weights() {
    let session = session();
    let result = session
        .optimize(OptimizationMethod::EqualWeight, None)
        .into_ready()
        .unwrap();

    for pair in result.trades.windows(2) {
        assert!(pair[0].value >= pair[1].value);
    }
    for trade in &result.trades {
        let expected = if trade.target_weight > trade.current_weight {
            TradeAction::Buy
        } else {
            TradeAction::Sell
        };
        assert_eq!(trade.action, expected, "{}", trade.symbol);
        assert!(trade.quantity >= 0.0);
    }
}

#[test]
fn test_target_return_requires_target() {
    let outcome = session().optimize(OptimizationMethod::TargetReturn, None);
    assert!(matches!(outcome, Outcome::Failed { .. }));
}

#[test]
fn test_efficient_frontier_point_count() {
    let session = session();
    let frontier = session.efficient_frontier(Some(8)).into_ready().unwrap();
    assert_eq!(frontier.points.len(), 8);
    assert_eq!(frontier.symbols.len(), 5);

    for pair in frontier.points.windows(2) {
        assert!(pair[0].target_return < pair[1].target_return);
    }
    for point in frontier.feasible_points() {
        assert!(point.volatility.is_finite());
        assert_relative_eq!(point.expected_return, point.target_return, epsilon = 1e-3);
    }

    let default = session.efficient_frontier(None).into_ready().unwrap();
    assert_eq!(default.points.len(), session.config().frontier_points);
}

#[test]
fn test_no_history_makes_optimization_unavailable() {
    let market = InMemoryMarketData::new()
        .with_price("TCS", dec!(4000))
        .with_price("INFY", dec!(1500));
    let input = PortfolioInput {
        email: "a@b.co".to_string(),
        investors: vec![investor(
            "A",
            "Asha",
            vec![
                StockInput::new("TCS", dec!(1), dec!(3000)),
                StockInput::new("INFY", dec!(2), dec!(1000)),
            ],
        )],
    };

    let session = AnalysisSession::start(market, AnalyticsConfig::sequential(), &input).unwrap();
    let family = &session.portfolio().family;
    assert_eq!(family.metrics.volatility, 0.0);
    assert_eq!(family.metrics.beta, 1.0);

    assert!(matches!(
        session.optimize(OptimizationMethod::MaxSharpe, None),
        Outcome::Unavailable { .. }
    ));
    assert!(matches!(
        session.efficient_frontier(None),
        Outcome::Unavailable { .. }
    ));

    let report = session.analyze_risk();
    assert!(matches!(report.var, Outcome::Unavailable { .. }));
    assert!(report.risk_contributions.is_empty());
    assert_relative_eq!(report.concentration_risk.top_5_concentration, 100.0, epsilon = 1e-9);
}

// =============================================================================
// REBALANCING
// =============================================================================

#[test]
fn test_rebalance_dead_band() {
    let current = vec![
        CurrentPosition::new("A", dec!(50), dec!(100)),
        CurrentPosition::new("B", dec!(50), dec!(100)),
    ];
    let mut targets = BTreeMap::new();
    targets.insert("A".to_string(), 0.505);
    targets.insert("B".to_string(), 0.495);

    // 0.5% drift stays inside a 1% band
    assert!(rebalance_trades(&current, &targets, 10_000.0, 0.01).is_empty());

    targets.insert("A".to_string(), 0.7);
    targets.insert("B".to_string(), 0.3);
    let trades = rebalance_trades(&current, &targets, 10_000.0, 0.01);
    assert_eq!(trades.len(), 2);
    let buy = trades.iter().find(|t| t.symbol == "A").unwrap();
    assert_eq!(buy.action, TradeAction::Buy);
    assert_relative_eq!(buy.value, 2000.0, epsilon = 1e-9);
    assert_relative_eq!(buy.quantity, 20.0, epsilon = 1e-9);
}

// =============================================================================
// RISK
// =============================================================================

#[test]
fn test_risk_report() {
    let session = session();
    let report = session.analyze_risk();

    assert_eq!(report.correlation_matrix.len(), 5);
    for symbol in SYMBOLS {
        assert_eq!(report.correlation_matrix.get(symbol, symbol), Some(1.0));
    }

    let var = report.var.as_ready().unwrap();
    let cvar = report.cvar.as_ready().unwrap();
    assert!(cvar.daily <= var.daily);
    assert!(var.daily < 0.0);
    assert_relative_eq!(var.annual, var.daily * 252f64.sqrt(), epsilon = 1e-12);

    let total: f64 = report
        .risk_contributions
        .iter()
        .map(|c| c.risk_contribution)
        .sum();
    assert_relative_eq!(total, 100.0, epsilon = 1e-6);
    for pair in report.risk_contributions.windows(2) {
        assert!(pair[0].risk_contribution.abs() >= pair[1].risk_contribution.abs());
    }

    let concentration = &report.concentration_risk;
    assert!(concentration.top_1_concentration <= concentration.top_3_concentration);
    assert!(concentration.top_3_concentration <= concentration.top_5_concentration);
    assert!(concentration.effective_holdings > 1.0);
    assert!(concentration.effective_holdings <= 5.0 + 1e-9);
}

#[test]
fn test_single_holding_is_very_concentrated() {
    let mut holdings = BTreeMap::new();
    let mut holding = FamilyHolding::new("TCS", dec!(4000));
    holding.weight = 1.0;
    holdings.insert("TCS".to_string(), holding);

    let risk = kinfolio_portfolio::concentration_risk(&holdings);
    assert_eq!(risk.concentration_level, ConcentrationLevel::VeryHigh);
    assert_relative_eq!(risk.hhi, 10_000.0);
    assert_relative_eq!(risk.effective_holdings, 1.0);
}

// =============================================================================
// SCENARIOS
// =============================================================================

#[test]
fn test_zero_shock_changes_nothing() {
    let session = session();
    let results = session.run_scenarios(&[Scenario::uniform("Flat", 0.0)]);
    let flat = &results[0];
    assert_eq!(flat.value_change, 0.0);
    assert_eq!(flat.pct_change, 0.0);
    assert_relative_eq!(flat.scenario_value, flat.current_value);
}

#[test]
fn test_market_crash_scales_value() {
    let session = session();
    let total = session.portfolio().family.total_value.to_f64().unwrap();

    let results = session.run_scenarios(&[stress_scenarios::market_crash()]);
    assert_relative_eq!(results[0].current_value, total, max_relative = 1e-12);
    assert_relative_eq!(results[0].scenario_value, total * 0.8, max_relative = 1e-9);
    assert_relative_eq!(results[0].pct_change, -20.0, epsilon = 1e-9);
}

#[test]
fn test_standard_scenarios() {
    let session = session();
    let results = session.run_default_scenarios(0.0);
    assert_eq!(results.len(), 4);

    let worst = worst_case(&results).unwrap();
    assert_eq!(worst.scenario, "Market Crash (-20%)");

    // Tech selloff only moves INFY, TCS and WIPRO here
    let tech = results.iter().find(|r| r.scenario.contains("Tech")).unwrap();
    let portfolio = session.portfolio();
    let tech_value: f64 = ["INFY", "TCS", "WIPRO"]
        .iter()
        .map(|s| portfolio.family_holdings[*s].value.to_f64().unwrap())
        .sum();
    assert_relative_eq!(tech.value_change, -0.15 * tech_value, max_relative = 1e-9);

    let summary = summarize_results(&results).unwrap();
    assert_eq!(summary.scenario_count, 4);
    assert_eq!(summary.best_scenario, "Market Rally (+15%)");
}

#[test]
fn test_scenario_from_json() {
    let scenario: Scenario =
        serde_json::from_str(r#"{"name": "Custom", "shocks": {"TCS": -10.0}}"#).unwrap();
    assert_eq!(scenario.shock_for("TCS"), -10.0);
    assert_eq!(scenario.shock_for("INFY"), 0.0);

    let results = session().run_scenarios(&[scenario]);
    assert!(results[0].is_loss());
}
