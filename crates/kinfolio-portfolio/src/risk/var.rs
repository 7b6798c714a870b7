//! Historical Value at Risk and expected shortfall.

use kinfolio_math::stats::{mean, percentile};
use serde::{Deserialize, Serialize};

use crate::outcome::Outcome;

/// A tail-risk figure at a confidence level, daily and annualized.
///
/// Values are returns, so losses are negative.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TailRisk {
    /// Confidence level, e.g. 0.95.
    pub confidence_level: f64,
    /// Daily figure.
    pub daily: f64,
    /// Daily figure × √trading days.
    pub annual: f64,
}

fn check_inputs(returns: &[f64], confidence_level: f64) -> Option<Outcome<TailRisk>> {
    if returns.is_empty() {
        return Some(Outcome::unavailable("no portfolio returns"));
    }
    if !(confidence_level > 0.0 && confidence_level < 1.0) {
        return Some(Outcome::failed(format!(
            "confidence level must be in (0, 1), got {confidence_level}"
        )));
    }
    None
}

fn threshold(returns: &[f64], confidence_level: f64) -> Option<f64> {
    percentile(returns, (1.0 - confidence_level) * 100.0)
}

/// The `(1 − confidence)` percentile of daily returns.
pub fn value_at_risk(returns: &[f64], confidence_level: f64, trading_days: u32) -> Outcome<TailRisk> {
    if let Some(outcome) = check_inputs(returns, confidence_level) {
        return outcome;
    }

    match threshold(returns, confidence_level) {
        Some(daily) => Outcome::ready(TailRisk {
            confidence_level,
            daily,
            annual: daily * f64::from(trading_days).sqrt(),
        }),
        None => Outcome::failed("percentile undefined"),
    }
}

/// Mean of the returns at or below the VaR threshold.
pub fn conditional_var(
    returns: &[f64],
    confidence_level: f64,
    trading_days: u32,
) -> Outcome<TailRisk> {
    if let Some(outcome) = check_inputs(returns, confidence_level) {
        return outcome;
    }

    let Some(cutoff) = threshold(returns, confidence_level) else {
        return Outcome::failed("percentile undefined");
    };
    let tail: Vec<f64> = returns.iter().copied().filter(|r| *r <= cutoff).collect();

    match mean(&tail) {
        Some(daily) => Outcome::ready(TailRisk {
            confidence_level,
            daily,
            annual: daily * f64::from(trading_days).sqrt(),
        }),
        None => Outcome::failed("empty tail"),
    }
}
