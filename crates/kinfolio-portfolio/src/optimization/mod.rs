//! Portfolio optimization.
//!
//! - [`Moments`]: annualized expected returns and covariance
//! - [`optimize_with_moments`]: max Sharpe, min volatility, equal weight and
//!   target return allocations, long-only and fully invested
//! - [`efficient_frontier`]: target-return sweep
//! - [`rebalance_trades`]: dead-banded trades toward target weights
//! - [`Optimizer`]: the above bound to a market data source, plus
//!   [`optimize_family`] for a whole [`FamilyPortfolio`](crate::types::FamilyPortfolio)

mod family;
mod frontier;
mod moments;
mod optimizer;
mod rebalance;

pub use family::{merged_positions, optimize_family, Improvement, OptimizationResult, Optimizer};
pub use frontier::{efficient_frontier, EfficientFrontier, FrontierPoint};
pub use moments::Moments;
pub use optimizer::{optimize_with_moments, Allocation, OptimizationMethod};
pub use rebalance::{rebalance_trades, CurrentPosition, Trade, TradeAction};
