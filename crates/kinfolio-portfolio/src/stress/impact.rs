//! Scenario impact on a family portfolio.

use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};

use super::scenarios::Scenario;
use crate::types::FamilyPortfolio;

/// Result of applying one scenario to a portfolio.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioResult {
    /// Scenario name.
    pub scenario: String,

    /// Family value before the shock.
    pub current_value: f64,

    /// Family value after the shock.
    pub scenario_value: f64,

    /// `scenario_value − current_value`.
    pub value_change: f64,

    /// Change as a percentage of current value, 0 when the portfolio is empty.
    pub pct_change: f64,
}

impl ScenarioResult {
    /// Returns true if this is a gain.
    #[must_use]
    pub fn is_gain(&self) -> bool {
        self.value_change > 0.0
    }

    /// Returns true if this is a loss.
    #[must_use]
    pub fn is_loss(&self) -> bool {
        self.value_change < 0.0
    }
}

/// Applies a scenario to every family holding.
///
/// ```text
/// new_value = value × (1 + shock% / 100)
/// ```
#[must_use]
pub fn simulate_scenario(portfolio: &FamilyPortfolio, scenario: &Scenario) -> ScenarioResult {
    let current_value = portfolio.total_value().to_f64().unwrap_or(0.0);
    let scenario_value: f64 = portfolio
        .family_holdings
        .iter()
        .map(|(symbol, holding)| {
            let value = holding.value.to_f64().unwrap_or(0.0);
            value * (1.0 + scenario.shock_for(symbol) / 100.0)
        })
        .sum();

    let value_change = scenario_value - current_value;
    let pct_change = if current_value > 0.0 {
        value_change / current_value * 100.0
    } else {
        0.0
    };

    ScenarioResult {
        scenario: scenario.name.clone(),
        current_value,
        scenario_value,
        value_change,
        pct_change,
    }
}

/// Runs several scenarios, in order.
///
/// # Example
///
/// ```ignore
/// use kinfolio_portfolio::stress::{run_scenarios, standard};
///
/// for result in run_scenarios(&portfolio, &standard::all(0.0)) {
///     println!("{}: {:.2}%", result.scenario, result.pct_change);
/// }
/// ```
#[must_use]
pub fn run_scenarios(portfolio: &FamilyPortfolio, scenarios: &[Scenario]) -> Vec<ScenarioResult> {
    scenarios
        .iter()
        .map(|s| simulate_scenario(portfolio, s))
        .collect()
}

/// Scenario with the largest loss.
#[must_use]
pub fn worst_case(results: &[ScenarioResult]) -> Option<&ScenarioResult> {
    results
        .iter()
        .min_by(|a, b| a.value_change.total_cmp(&b.value_change))
}

/// Scenario with the largest gain.
#[must_use]
pub fn best_case(results: &[ScenarioResult]) -> Option<&ScenarioResult> {
    results
        .iter()
        .max_by(|a, b| a.value_change.total_cmp(&b.value_change))
}

/// Summary of scenario results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioSummary {
    /// Number of scenarios run.
    pub scenario_count: usize,

    /// Worst-case scenario name.
    pub worst_scenario: String,

    /// Worst-case value change.
    pub worst_change: f64,

    /// Worst-case percentage change.
    pub worst_pct_change: f64,

    /// Best-case scenario name.
    pub best_scenario: String,

    /// Best-case value change.
    pub best_change: f64,

    /// Best-case percentage change.
    pub best_pct_change: f64,

    /// Average percentage change.
    pub avg_pct_change: f64,
}

/// Summarizes scenario results; `None` when there are none.
#[must_use]
pub fn summarize_results(results: &[ScenarioResult]) -> Option<ScenarioSummary> {
    let worst = worst_case(results)?;
    let best = best_case(results)?;

    Some(ScenarioSummary {
        scenario_count: results.len(),
        worst_scenario: worst.scenario.clone(),
        worst_change: worst.value_change,
        worst_pct_change: worst.pct_change,
        best_scenario: best.scenario.clone(),
        best_change: best.value_change,
        best_pct_change: best.pct_change,
        avg_pct_change: results.iter().map(|r| r.pct_change).sum::<f64>() / results.len() as f64,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stress::standard;
    use crate::types::{FamilyHolding, FamilySummary, PortfolioMetrics, StockMetrics};
    use approx::assert_relative_eq;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use std::collections::BTreeMap;

    fn portfolio(values: &[(&str, Decimal)]) -> FamilyPortfolio {
        let total: Decimal = values.iter().map(|(_, v)| *v).sum();
        let family_holdings: BTreeMap<String, FamilyHolding> = values
            .iter()
            .map(|(symbol, value)| {
                let mut holding = FamilyHolding::new(*symbol, dec!(100));
                holding.value = *value;
                (symbol.to_string(), holding)
            })
            .collect();

        FamilyPortfolio {
            family: FamilySummary {
                email: "family@example.com".to_string(),
                total_value: total,
                total_cost: Decimal::ZERO,
                total_gain: Decimal::ZERO,
                total_gain_pct: 0.0,
                member_count: 1,
                unique_stocks: values.len(),
                overlapping_stocks: 0,
                risk_score: 0.0,
                metrics: PortfolioMetrics::new(StockMetrics::NEUTRAL, 0.0),
            },
            members: Vec::new(),
            overlaps: BTreeMap::new(),
            family_holdings,
        }
    }

    #[test]
    fn test_zero_shock_leaves_value_unchanged() {
        let p = portfolio(&[("TCS", dec!(40000)), ("SBIN", dec!(60000))]);
        let result = simulate_scenario(&p, &Scenario::uniform("Flat", 0.0));
        assert_relative_eq!(result.scenario_value, result.current_value);
        assert_eq!(result.pct_change, 0.0);
    }

    #[test]
    fn test_sector_scenarios() {
        let p = portfolio(&[("TCS", dec!(40000)), ("SBIN", dec!(60000))]);
        let results = run_scenarios(&p, &standard::all(0.0));

        assert_relative_eq!(results[0].pct_change, -20.0, epsilon = 1e-9);
        assert_relative_eq!(results[1].pct_change, 15.0, epsilon = 1e-9);
        // TCS −15% on 40% of the portfolio
        assert_relative_eq!(results[2].value_change, -6000.0, epsilon = 1e-9);
        // SBIN +25% on 60% of the portfolio
        assert_relative_eq!(results[3].pct_change, 15.0, epsilon = 1e-9);

        let summary = summarize_results(&results).unwrap();
        assert_eq!(summary.scenario_count, 4);
        assert_eq!(summary.worst_scenario, "Market Crash (-20%)");
        assert!(results[0].is_loss());
        assert!(summary.best_change > 0.0);
    }

    #[test]
    fn test_empty_portfolio() {
        let p = portfolio(&[]);
        let result = simulate_scenario(&p, &standard::market_crash());
        assert_eq!(result.current_value, 0.0);
        assert_eq!(result.pct_change, 0.0);
        assert!(summarize_results(&[]).is_none());
    }
}
