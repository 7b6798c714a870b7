//! Analysis session: one portfolio snapshot plus the means to analyse it.

use kinfolio_traits::MarketDataSource;

use crate::error::PortfolioResult;
use crate::optimization::{EfficientFrontier, OptimizationMethod, OptimizationResult, Optimizer};
use crate::outcome::Outcome;
use crate::portfolio::Aggregator;
use crate::risk::{RiskAnalyzer, RiskReport};
use crate::stress::{run_scenarios, standard, Scenario, ScenarioResult};
use crate::types::{AnalyticsConfig, FamilyPortfolio, PortfolioInput};

/// Owns a market data source, a configuration and the family snapshot built
/// from them.
///
/// Sessions share nothing with each other, so any number of families can be
/// analysed concurrently. The snapshot never changes after [`start`](Self::start).
///
/// # Example
///
/// ```ignore
/// let session = AnalysisSession::start(source, AnalyticsConfig::default(), &input)?;
/// println!("risk score {:.1}", session.portfolio().family.risk_score);
///
/// if let Some(result) = session.optimize(OptimizationMethod::MaxSharpe, None).into_ready() {
///     for trade in &result.trades {
///         println!("{} {} {:.0}", trade.action, trade.symbol, trade.quantity);
///     }
/// }
/// ```
pub struct AnalysisSession<M: MarketDataSource> {
    source: M,
    config: AnalyticsConfig,
    portfolio: FamilyPortfolio,
}

impl<M: MarketDataSource> AnalysisSession<M> {
    /// Validates and aggregates `input`.
    pub fn start(source: M, config: AnalyticsConfig, input: &PortfolioInput) -> PortfolioResult<Self> {
        let portfolio = Aggregator::new(&source, &config).process_portfolio(input)?;
        Ok(Self {
            source,
            config,
            portfolio,
        })
    }

    /// The family snapshot.
    pub fn portfolio(&self) -> &FamilyPortfolio {
        &self.portfolio
    }

    /// The configuration in use.
    pub fn config(&self) -> &AnalyticsConfig {
        &self.config
    }

    /// The market data source.
    pub fn source(&self) -> &M {
        &self.source
    }

    /// Consumes the session, keeping the snapshot.
    pub fn into_portfolio(self) -> FamilyPortfolio {
        self.portfolio
    }

    /// Optimizes the family's holdings.
    pub fn optimize(
        &self,
        method: OptimizationMethod,
        target_return: Option<f64>,
    ) -> Outcome<OptimizationResult> {
        Optimizer::new(&self.source, &self.config).optimize_family(
            &self.portfolio,
            method,
            target_return,
        )
    }

    /// Efficient frontier over the family's symbols; `n_points` defaults to
    /// the configured count.
    pub fn efficient_frontier(&self, n_points: Option<usize>) -> Outcome<EfficientFrontier> {
        Optimizer::new(&self.source, &self.config).efficient_frontier(
            &self.portfolio.symbols(),
            n_points.unwrap_or(self.config.frontier_points),
        )
    }

    /// Full risk report.
    pub fn analyze_risk(&self) -> RiskReport {
        RiskAnalyzer::new(&self.source, &self.config).analyze(&self.portfolio)
    }

    /// Applies each scenario to the snapshot.
    pub fn run_scenarios(&self, scenarios: &[Scenario]) -> Vec<ScenarioResult> {
        run_scenarios(&self.portfolio, scenarios)
    }

    /// Applies the standard scenario library.
    pub fn run_default_scenarios(&self, default_shock: f64) -> Vec<ScenarioResult> {
        run_scenarios(&self.portfolio, &standard::all(default_shock))
    }
}
