//! Price-shock scenario definitions.
//!
//! A scenario maps symbols to percentage price changes. Symbols it does not
//! name receive its default shock, which may be zero.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A named set of percentage price shocks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    /// Scenario name.
    pub name: String,

    /// Symbol → shock in percent (−20 means a 20% fall).
    #[serde(default)]
    pub shocks: BTreeMap<String, f64>,

    /// Shock applied to symbols not listed in `shocks` (percent).
    #[serde(default)]
    pub default_shock: f64,
}

impl Scenario {
    /// Creates a scenario with no shocks.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            shocks: BTreeMap::new(),
            default_shock: 0.0,
        }
    }

    /// Creates a scenario that moves every symbol by `shock_pct`.
    #[must_use]
    pub fn uniform(name: impl Into<String>, shock_pct: f64) -> Self {
        Self::new(name).with_default(shock_pct)
    }

    /// Sets the shock for one symbol.
    #[must_use]
    pub fn with_shock(mut self, symbol: impl Into<String>, shock_pct: f64) -> Self {
        self.shocks.insert(symbol.into(), shock_pct);
        self
    }

    /// Sets the shock for unlisted symbols.
    #[must_use]
    pub fn with_default(mut self, shock_pct: f64) -> Self {
        self.default_shock = shock_pct;
        self
    }

    /// Shock applied to `symbol` (percent).
    #[must_use]
    pub fn shock_for(&self, symbol: &str) -> f64 {
        self.shocks.get(symbol).copied().unwrap_or(self.default_shock)
    }
}

/// Standard scenarios for Indian equity portfolios.
pub mod standard {
    use super::*;

    /// Every symbol −20%.
    #[must_use]
    pub fn market_crash() -> Scenario {
        Scenario::uniform("Market Crash (-20%)", -20.0)
    }

    /// Every symbol +15%.
    #[must_use]
    pub fn market_rally() -> Scenario {
        Scenario::uniform("Market Rally (+15%)", 15.0)
    }

    /// IT services −15%; other symbols move by `default_shock`.
    #[must_use]
    pub fn tech_selloff(default_shock: f64) -> Scenario {
        Scenario::new("Tech Selloff")
            .with_shock("TCS", -15.0)
            .with_shock("INFY", -15.0)
            .with_shock("WIPRO", -15.0)
            .with_shock("TECHM", -15.0)
            .with_default(default_shock)
    }

    /// Private and public sector banks up 18-25%; other symbols move by
    /// `default_shock`.
    #[must_use]
    pub fn banking_rally(default_shock: f64) -> Scenario {
        Scenario::new("Banking Rally")
            .with_shock("HDFCBANK", 20.0)
            .with_shock("ICICIBANK", 18.0)
            .with_shock("AXISBANK", 22.0)
            .with_shock("SBIN", 25.0)
            .with_default(default_shock)
    }

    /// All standard scenarios. `default_shock` applies to symbols the sector
    /// scenarios do not name.
    #[must_use]
    pub fn all(default_shock: f64) -> Vec<Scenario> {
        vec![
            market_crash(),
            market_rally(),
            tech_selloff(default_shock),
            banking_rally(default_shock),
        ]
    }

    /// Looks up a standard scenario by name. Case, the parenthesised shock
    /// and `-`/`_` separators are ignored, so `market-crash` finds
    /// "Market Crash (-20%)".
    #[must_use]
    pub fn by_name(name: &str, default_shock: f64) -> Option<Scenario> {
        let wanted = key(name);
        all(default_shock).into_iter().find(|s| key(&s.name) == wanted)
    }

    fn key(name: &str) -> String {
        name.split('(')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase()
            .replace(['-', '_'], " ")
    }
}
