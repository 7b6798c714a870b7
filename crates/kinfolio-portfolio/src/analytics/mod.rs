//! Return-series analytics.
//!
//! This module provides the statistics every other component builds on:
//! - Daily returns and the symbol × date return table
//! - Annualized return, volatility, Sharpe ratio and beta
//! - Pairwise correlation and the diversification score
//!
//! All functions are pure - they take return data and configuration as input
//! and return computed results. No caching, no I/O, no side effects.

mod correlation;
mod metrics;
mod parallel;
mod returns;

pub use correlation::*;
pub use metrics::*;
pub use parallel::*;
pub use returns::*;
