//! Full risk report for a family portfolio.

use kinfolio_traits::MarketDataSource;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::{
    concentration_risk, conditional_var, risk_contribution, value_at_risk, ConcentrationRisk,
    RiskContribution, TailRisk,
};
use crate::analytics::{CorrelationMatrix, ReturnTable};
use crate::outcome::Outcome;
use crate::portfolio::MarketHistory;
use crate::types::{AnalyticsConfig, FamilyPortfolio};

/// Correlation, tail risk, risk contributions and concentration in one place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskReport {
    /// Pairwise correlations of the family's symbols.
    pub correlation_matrix: CorrelationMatrix,
    /// Historical VaR of the family's daily returns.
    pub var: Outcome<TailRisk>,
    /// Expected shortfall beyond the VaR threshold.
    pub cvar: Outcome<TailRisk>,
    /// Per-holding volatility contributions, largest first.
    pub risk_contributions: Vec<RiskContribution>,
    /// Concentration of family weights.
    pub concentration_risk: ConcentrationRisk,
}

/// Builds a risk report from an already loaded return table.
///
/// Family weights are applied as they are: symbols without history simply
/// drop out, without rescaling the rest. Concentration is computed even when
/// there are no returns at all.
#[must_use]
pub fn analyze_risk(
    portfolio: &FamilyPortfolio,
    table: &ReturnTable,
    config: &AnalyticsConfig,
) -> RiskReport {
    let restricted = table.restrict(&portfolio.symbols());
    let correlation_matrix = CorrelationMatrix::from_table(&restricted);
    let concentration = concentration_risk(&portfolio.family_holdings);

    if restricted.is_empty() {
        warn!("no return history, VaR and risk contributions unavailable");
        return RiskReport {
            correlation_matrix,
            var: Outcome::unavailable("no historical returns"),
            cvar: Outcome::unavailable("no historical returns"),
            risk_contributions: Vec::new(),
            concentration_risk: concentration,
        };
    }

    let symbols = restricted.symbols().to_vec();
    let weights: Vec<f64> = symbols
        .iter()
        .map(|s| portfolio.family_holdings.get(s).map_or(0.0, |h| h.weight))
        .collect();
    let weighted: Vec<(String, f64)> = symbols.iter().cloned().zip(weights.iter().copied()).collect();
    let returns: Vec<f64> = restricted
        .weighted_returns(&weighted)
        .into_iter()
        .map(|(_, r)| r)
        .collect();

    let var = value_at_risk(&returns, config.confidence_level, config.trading_days);
    let cvar = conditional_var(&returns, config.confidence_level, config.trading_days);

    let columns: Vec<Vec<f64>> = symbols
        .iter()
        .filter_map(|s| restricted.filled_column(s))
        .collect();
    let risk_contributions = match risk_contribution(&columns, &weights, &symbols) {
        Ok(contributions) => contributions,
        Err(e) => {
            warn!(error = %e, "risk contributions unavailable");
            Vec::new()
        }
    };

    debug!(
        symbols = symbols.len(),
        observations = returns.len(),
        "risk report computed"
    );

    RiskReport {
        correlation_matrix,
        var,
        cvar,
        risk_contributions,
        concentration_risk: concentration,
    }
}

/// Risk analyzer bound to a market data source.
pub struct RiskAnalyzer<'a, M: MarketDataSource + ?Sized> {
    source: &'a M,
    config: &'a AnalyticsConfig,
}

impl<'a, M: MarketDataSource + ?Sized> RiskAnalyzer<'a, M> {
    /// Creates an analyzer.
    pub fn new(source: &'a M, config: &'a AnalyticsConfig) -> Self {
        Self { source, config }
    }

    /// Fetches history for the family's symbols and builds the report.
    pub fn analyze(&self, portfolio: &FamilyPortfolio) -> RiskReport {
        let history =
            MarketHistory::load(self.source, &portfolio.symbols(), self.config.lookback_days);
        analyze_risk(portfolio, &history.table, self.config)
    }
}
