//! Family portfolio construction.
//!
//! This module provides the [`Aggregator`] that turns validated input into a
//! [`FamilyPortfolio`](crate::types::FamilyPortfolio) snapshot, and the
//! [`MarketHistory`] shared by every downstream component.

mod aggregator;
mod history;

pub use aggregator::{risk_score, Aggregator};
pub use history::MarketHistory;
