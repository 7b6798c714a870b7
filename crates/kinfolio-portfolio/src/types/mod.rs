//! Domain types for portfolio analytics.
//!
//! This module provides type-safe representations of portfolio concepts:
//!
//! - [`PortfolioInput`]: Raw family input with validation
//! - [`Holding`]: A valued stock lot with its [`StockMetrics`]
//! - [`MemberPortfolio`] / [`FamilyPortfolio`]: Aggregated snapshots
//! - [`FamilyHolding`]: A symbol merged across members (overlap detection)
//! - [`AnalyticsConfig`]: Configuration for analytics computation

mod config;
mod holding;
mod input;
mod portfolio;

// Re-export all types
pub use config::{AnalyticsConfig, SolverConfig};
pub use holding::{Holding, StockMetrics};
pub(crate) use holding::{fraction_of, percent_of};
pub use input::{
    is_valid_email, InvestorInput, PortfolioInput, StockInput, MAX_INVESTORS,
    MAX_STOCKS_PER_INVESTOR,
};
pub use portfolio::{FamilyHolding, FamilyPortfolio, FamilySummary, MemberPortfolio, PortfolioMetrics};
