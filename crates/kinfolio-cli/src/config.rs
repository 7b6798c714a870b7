//! CLI configuration file.
//!
//! ```toml
//! [analytics]
//! risk_free_rate = 0.065
//! lookback_days = 252
//!
//! [data]
//! history = "data/history.csv"
//! benchmark = "data/nifty.csv"
//! ```
//!
//! Every key is optional. Without a file the analytics defaults apply and the
//! data paths must come from the command line.

use std::path::{Path, PathBuf};

use kinfolio_portfolio::AnalyticsConfig;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{read_file, CliError, CliResult};

/// Market data file locations.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataPaths {
    /// Daily closes, `symbol,date,close`.
    pub history: Option<PathBuf>,

    /// Benchmark closes, `date,close`.
    pub benchmark: Option<PathBuf>,

    /// Current price overrides, `symbol,price`.
    pub prices: Option<PathBuf>,
}

/// Everything the CLI reads from its configuration file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    /// Analytics settings passed to the core.
    pub analytics: AnalyticsConfig,

    /// Market data files.
    pub data: DataPaths,
}

impl CliConfig {
    /// Parses a TOML document.
    pub fn from_toml(content: &str) -> CliResult<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Loads configuration from a TOML file.
    pub fn from_file(path: &Path) -> CliResult<Self> {
        let config = Self::from_toml(&read_file(path)?)?;
        debug!(path = %path.display(), "loaded configuration");
        Ok(config)
    }

    /// Loads `explicit` if given, else the default file when it exists, else
    /// defaults.
    pub fn load(explicit: Option<&Path>) -> CliResult<Self> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }
        match default_path() {
            Some(path) if path.exists() => Self::from_file(&path),
            _ => Ok(Self::default()),
        }
    }

    /// Serializes to TOML.
    pub fn to_toml(&self) -> CliResult<String> {
        toml::to_string_pretty(self).map_err(|e| CliError::Serialization(e.to_string()))
    }

    /// Overrides data paths with the ones given on the command line.
    #[must_use]
    pub fn with_data_overrides(mut self, overrides: &DataPaths) -> Self {
        if overrides.history.is_some() {
            self.data.history.clone_from(&overrides.history);
        }
        if overrides.benchmark.is_some() {
            self.data.benchmark.clone_from(&overrides.benchmark);
        }
        if overrides.prices.is_some() {
            self.data.prices.clone_from(&overrides.prices);
        }
        self
    }
}

/// `<config dir>/kinfolio/config.toml`.
pub fn default_path() -> Option<PathBuf> {
    dirs::config_dir()
        .or_else(dirs::home_dir)
        .map(|dir| dir.join("kinfolio").join("config.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config = CliConfig::from_toml(
            r#"
            [analytics]
            risk_free_rate = 0.05

            [data]
            history = "closes.csv"
            "#,
        )
        .unwrap();

        assert_eq!(config.analytics.risk_free_rate, 0.05);
        assert_eq!(config.analytics.trading_days, 252);
        assert_eq!(config.data.history, Some(PathBuf::from("closes.csv")));
        assert_eq!(config.data.benchmark, None);
    }

    #[test]
    fn test_empty_file_is_default() {
        assert_eq!(CliConfig::from_toml("").unwrap(), CliConfig::default());
    }

    #[test]
    fn test_round_trip() {
        let config = CliConfig::default();
        let text = config.to_toml().unwrap();
        assert_eq!(CliConfig::from_toml(&text).unwrap(), config);
    }

    #[test]
    fn test_overrides() {
        let base = CliConfig::from_toml("[data]\nhistory = \"a.csv\"\nbenchmark = \"b.csv\"").unwrap();
        let merged = base.with_data_overrides(&DataPaths {
            history: Some(PathBuf::from("c.csv")),
            ..DataPaths::default()
        });
        assert_eq!(merged.data.history, Some(PathBuf::from("c.csv")));
        assert_eq!(merged.data.benchmark, Some(PathBuf::from("b.csv")));
    }

    #[test]
    fn test_bad_toml() {
        assert!(matches!(
            CliConfig::from_toml("[analytics]\nrisk_free_rate = \"high\""),
            Err(CliError::Config(_))
        ));
    }
}
