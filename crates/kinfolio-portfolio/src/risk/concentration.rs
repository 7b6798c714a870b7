//! Concentration risk: HHI, top-N weights and effective holdings.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::types::FamilyHolding;

/// Concentration band, derived from the top-3 weight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConcentrationLevel {
    /// Top 3 at most 30%.
    Low,
    /// Top 3 above 30%.
    Moderate,
    /// Top 3 above 50%.
    High,
    /// Top 3 above 75%.
    #[serde(rename = "Very High")]
    VeryHigh,
}

impl ConcentrationLevel {
    /// Band for a top-3 concentration in percent.
    #[must_use]
    pub fn from_top_3(top_3_pct: f64) -> Self {
        if top_3_pct > 75.0 {
            Self::VeryHigh
        } else if top_3_pct > 50.0 {
            Self::High
        } else if top_3_pct > 30.0 {
            Self::Moderate
        } else {
            Self::Low
        }
    }

    /// Human-readable risk rating.
    #[must_use]
    pub fn risk_rating(&self) -> &'static str {
        match self {
            Self::VeryHigh => "High Risk",
            Self::High => "Moderate-High Risk",
            Self::Moderate => "Moderate Risk",
            Self::Low => "Low Risk",
        }
    }
}

impl fmt::Display for ConcentrationLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Low => "Low",
            Self::Moderate => "Moderate",
            Self::High => "High",
            Self::VeryHigh => "Very High",
        })
    }
}

/// Concentration metrics of a set of weights.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConcentrationRisk {
    /// Herfindahl-Hirschman index, `Σw² × 10000`.
    pub hhi: f64,
    /// Largest weight (%).
    pub top_1_concentration: f64,
    /// Sum of the three largest weights (%).
    pub top_3_concentration: f64,
    /// Sum of the five largest weights (%).
    pub top_5_concentration: f64,
    /// Band derived from the top-3 concentration.
    pub concentration_level: ConcentrationLevel,
    /// Rating text for the band.
    pub risk_rating: String,
    /// `1 / Σw²`, the equivalent number of equal positions; 0 without weight.
    pub effective_holdings: f64,
}

/// Concentration of weights given as fractions.
#[must_use]
pub fn concentration_from_weights(weights: &[f64]) -> ConcentrationRisk {
    let mut sorted = weights.to_vec();
    sorted.sort_by(|a, b| b.total_cmp(a));

    let sum_sq: f64 = sorted.iter().map(|w| w * w).sum();
    let top = |n: usize| sorted.iter().take(n).sum::<f64>() * 100.0;
    let top_3 = top(3);
    let level = ConcentrationLevel::from_top_3(top_3);

    ConcentrationRisk {
        hhi: sum_sq * 10_000.0,
        top_1_concentration: top(1),
        top_3_concentration: top_3,
        top_5_concentration: top(5),
        concentration_level: level,
        risk_rating: level.risk_rating().to_string(),
        effective_holdings: if sum_sq > 0.0 { 1.0 / sum_sq } else { 0.0 },
    }
}

/// Concentration of a family's aggregated holdings.
#[must_use]
pub fn concentration_risk(family_holdings: &BTreeMap<String, FamilyHolding>) -> ConcentrationRisk {
    let weights: Vec<f64> = family_holdings.values().map(|h| h.weight).collect();
    concentration_from_weights(&weights)
}
