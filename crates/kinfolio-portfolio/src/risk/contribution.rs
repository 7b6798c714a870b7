//! Risk contribution analysis.
//!
//! Decomposes portfolio volatility into per-holding contributions using the
//! daily return covariance.

use kinfolio_math::linear_algebra::{covariance_matrix, mat_vec, quadratic_form};
use kinfolio_math::stats::Ddof;
use serde::{Deserialize, Serialize};

use crate::error::{PortfolioError, PortfolioResult};

/// Contribution of one holding to portfolio volatility.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskContribution {
    /// Ticker symbol.
    pub symbol: String,

    /// Portfolio weight (%).
    pub weight: f64,

    /// Share of portfolio volatility (%). Contributions sum to 100 when the
    /// weights sum to one.
    pub risk_contribution: f64,

    /// Marginal contribution `(Σw)_i / σ`.
    pub marginal_risk: f64,
}

/// Per-holding risk contributions, largest absolute contribution first.
///
/// `columns[i]` is the daily return series of `symbols[i]`; `weights` are
/// fractions. When the portfolio has zero variance every contribution is 0.
pub fn risk_contribution(
    columns: &[Vec<f64>],
    weights: &[f64],
    symbols: &[String],
) -> PortfolioResult<Vec<RiskContribution>> {
    if columns.len() != weights.len() || symbols.len() != weights.len() {
        return Err(PortfolioError::invalid_input(format!(
            "{} return columns, {} weights and {} symbols",
            columns.len(),
            weights.len(),
            symbols.len()
        )));
    }
    if columns.is_empty() {
        return Ok(Vec::new());
    }

    let cov = covariance_matrix(columns, Ddof::Sample)?;
    let variance = quadratic_form(weights, &cov)?;
    let volatility = variance.max(0.0).sqrt();
    let cov_w = mat_vec(&cov, weights)?;

    let mut contributions: Vec<RiskContribution> = symbols
        .iter()
        .zip(weights)
        .zip(cov_w)
        .map(|((symbol, w), cw)| {
            let (marginal_risk, risk_contribution) = if volatility > 0.0 {
                let marginal = cw / volatility;
                (marginal, w * marginal / volatility * 100.0)
            } else {
                (0.0, 0.0)
            };
            RiskContribution {
                symbol: symbol.clone(),
                weight: w * 100.0,
                risk_contribution,
                marginal_risk,
            }
        })
        .collect();

    contributions.sort_by(|a, b| b.risk_contribution.abs().total_cmp(&a.risk_contribution.abs()));
    Ok(contributions)
}
