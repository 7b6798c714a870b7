//! Scenario analysis for family portfolios.
//!
//! This module provides:
//! - Scenario definitions (per-symbol percentage shocks with a default)
//! - A standard scenario library (market crash/rally, sector moves)
//! - Impact calculation and multi-scenario summaries
//!
//! Shocks are applied to current market values; no repricing from history
//! is performed.

mod impact;
mod scenarios;

pub use impact::*;
pub use scenarios::*;
