//! # Kinfolio Portfolio
//!
//! Analytics for the combined equity holdings of a family.
//!
//! Each family member ("investor") holds lots of exchange-listed stocks. This
//! crate values those lots, rolls them up per member and for the family, and
//! then answers the questions a family office asks of the combined book.
//!
//! ## Design Philosophy
//!
//! - **Injected market data**: prices and history come from a
//!   [`MarketDataSource`](kinfolio_traits::MarketDataSource); nothing is global
//! - **Immutable snapshots**: a [`FamilyPortfolio`] never changes once built
//! - **Degrade, don't fail**: missing data falls back to documented neutral
//!   values, solver trouble is reported through [`Outcome`]
//! - **Config-driven parallelism**: optional rayon support with threshold-based switching
//!
//! ## Features
//!
//! - **Aggregation**: holdings, members, family totals, overlap detection
//! - **Return metrics**: expected return, volatility, Sharpe, beta, diversification
//! - **Composite risk score** on a 0-10 scale
//! - **Optimization**: max Sharpe, min volatility, equal weight, target return,
//!   efficient frontier and rebalancing trades
//! - **Risk analysis**: correlation, historical VaR/CVaR, risk contribution,
//!   concentration
//! - **Scenarios**: per-symbol price shocks with a default for everything else
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use kinfolio_ext_file::InMemoryMarketData;
//! use kinfolio_portfolio::prelude::*;
//!
//! let input = PortfolioInput::from_json(&std::fs::read_to_string("family.json")?)?;
//! let session = AnalysisSession::start(market_data, AnalyticsConfig::default(), &input)?;
//!
//! let family = &session.portfolio().family;
//! println!("{} stocks, risk score {:.1}", family.unique_stocks, family.risk_score);
//!
//! let report = session.analyze_risk();
//! let crash = session.run_scenarios(&[stress_scenarios::market_crash()]);
//! ```
//!
//! ## Module Overview
//!
//! - [`analytics`] - Return tables, per-series metrics, correlation
//! - [`optimization`] - Mean-variance optimization, frontier, rebalancing
//! - [`portfolio`] - Aggregation of raw input into a family snapshot
//! - [`risk`] - VaR/CVaR, risk contribution, concentration
//! - [`stress`] - What-if scenarios and their impact
//! - [`types`] - Input, holdings, snapshot and configuration types
//!
//! ## Feature Flags
//!
//! - `parallel`: Enable rayon-based parallel processing for per-symbol work

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![allow(clippy::module_name_repetitions)]

// Module declarations
pub mod analytics;
pub mod error;
pub mod optimization;
pub mod outcome;
pub mod portfolio;
pub mod risk;
pub mod session;
pub mod stress;
pub mod types;

// Re-export error types at crate root
pub use error::{PortfolioError, PortfolioResult};
pub use outcome::Outcome;
pub use session::AnalysisSession;

// Re-export main types
pub use types::{
    // Config
    AnalyticsConfig,
    // Snapshot
    FamilyHolding,
    FamilyPortfolio,
    FamilySummary,
    // Holding
    Holding,
    // Input
    InvestorInput,
    MemberPortfolio,
    PortfolioInput,
    PortfolioMetrics,
    SolverConfig,
    StockInput,
    StockMetrics,
};

// Re-export aggregation
pub use portfolio::{risk_score, Aggregator, MarketHistory};

// Re-export analytics types and functions
pub use analytics::{
    benchmark_returns, daily_returns, diversification_score, maybe_parallel_map,
    CorrelationMatrix, DatedReturn, MetricsEngine, ReturnTable, NEUTRAL_DIVERSIFICATION,
};

// Re-export optimization types and functions
pub use optimization::{
    efficient_frontier, merged_positions, optimize_family, optimize_with_moments,
    rebalance_trades, Allocation, CurrentPosition, EfficientFrontier, FrontierPoint, Improvement,
    Moments, OptimizationMethod, OptimizationResult, Optimizer, Trade, TradeAction,
};

// Re-export risk types and functions
pub use risk::{
    analyze_risk, concentration_from_weights, concentration_risk, conditional_var,
    risk_contribution, value_at_risk, ConcentrationLevel, ConcentrationRisk, RiskAnalyzer,
    RiskContribution, RiskReport, TailRisk,
};

// Re-export stress testing types and functions
pub use stress::{
    best_case, run_scenarios, simulate_scenario,
    // Standard scenarios
    standard as stress_scenarios,
    summarize_results, worst_case, Scenario, ScenarioResult, ScenarioSummary,
};

/// Prelude module for convenient imports.
///
/// ```rust,ignore
/// use kinfolio_portfolio::prelude::*;
/// ```
pub mod prelude {
    // Error types
    pub use crate::error::{PortfolioError, PortfolioResult};
    pub use crate::outcome::Outcome;

    // Input and snapshot
    pub use crate::types::{
        AnalyticsConfig, FamilyHolding, FamilyPortfolio, FamilySummary, Holding, InvestorInput,
        MemberPortfolio, PortfolioInput, PortfolioMetrics, StockInput, StockMetrics,
    };

    // Session
    pub use crate::session::AnalysisSession;

    // Optimization
    pub use crate::optimization::{
        EfficientFrontier, OptimizationMethod, OptimizationResult, Trade, TradeAction,
    };

    // Risk
    pub use crate::risk::{ConcentrationRisk, RiskContribution, RiskReport, TailRisk};

    // Stress testing
    pub use crate::stress::{
        standard as stress_scenarios, summarize_results, Scenario, ScenarioResult,
    };

    // Re-export commonly used types from dependencies
    pub use kinfolio_traits::MarketDataSource;
    pub use rust_decimal::Decimal;
    pub use rust_decimal_macros::dec;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crate_compiles() {
        let err = PortfolioError::invalid_input("missing field `email`");
        assert!(err.to_string().contains("email"));
    }
}
