//! CLI error types.

use std::path::PathBuf;

use kinfolio_portfolio::PortfolioError;
use kinfolio_traits::TraitError;
use thiserror::Error;

/// CLI error type.
#[derive(Debug, Error)]
pub enum CliError {
    /// A file could not be read.
    #[error("Cannot read {path}: {source}")]
    Read {
        /// The file.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// Missing required argument.
    #[error("Missing required argument: {0}")]
    MissingArgument(String),

    /// Unknown scenario name.
    #[error("Unknown scenario '{0}'. Use one of: market-crash, market-rally, tech-selloff, banking-rally")]
    UnknownScenario(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Portfolio input or analytics error.
    #[error(transparent)]
    Portfolio(#[from] PortfolioError),

    /// Market data could not be loaded.
    #[error("Market data error: {0}")]
    MarketData(#[from] TraitError),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<toml::de::Error> for CliError {
    fn from(err: toml::de::Error) -> Self {
        Self::Config(err.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

/// CLI result type.
pub type CliResult<T> = Result<T, CliError>;

/// Reads a whole file, naming it in the error.
pub fn read_file(path: &std::path::Path) -> CliResult<String> {
    std::fs::read_to_string(path).map_err(|source| CliError::Read {
        path: path.to_path_buf(),
        source,
    })
}
