//! Risk analysis for family portfolios.
//!
//! This module provides:
//! - Historical VaR and CVaR (expected shortfall)
//! - Volatility decomposition by holding
//! - Concentration metrics (HHI, top-N weights, effective holdings)
//! - [`RiskReport`] combining all of the above with the correlation matrix

mod concentration;
mod contribution;
mod report;
mod var;

pub use concentration::*;
pub use contribution::*;
pub use report::*;
pub use var::*;
