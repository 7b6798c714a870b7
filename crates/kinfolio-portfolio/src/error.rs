//! Error types for portfolio analytics.
//!
//! Only malformed input and programming-level inconsistencies are errors.
//! Data gaps and numerical degeneracy fall back to documented defaults, and
//! solver failures are reported through [`Outcome`](crate::Outcome).

use kinfolio_math::MathError;
use kinfolio_traits::TraitError;
use thiserror::Error;

/// Result type for portfolio operations.
pub type PortfolioResult<T> = Result<T, PortfolioError>;

/// Errors that can occur during portfolio operations.
#[derive(Error, Debug, Clone)]
pub enum PortfolioError {
    /// Input could not be parsed.
    #[error("Invalid input: {reason}")]
    InvalidInput {
        /// Why parsing failed.
        reason: String,
    },

    /// Input parsed but violates a portfolio constraint.
    #[error("Invalid portfolio: {reason}")]
    InvalidPortfolio {
        /// The reason the portfolio is invalid.
        reason: String,
    },

    /// Invalid holding data.
    #[error("Invalid holding '{symbol}' of investor '{investor}': {reason}")]
    InvalidHolding {
        /// Owning investor id.
        investor: String,
        /// The holding symbol.
        symbol: String,
        /// The reason the holding is invalid.
        reason: String,
    },

    /// The market data collaborator failed.
    #[error("Market data error: {reason}")]
    MarketData {
        /// Source error message.
        reason: String,
    },

    /// A numerical routine rejected its inputs.
    #[error("Math error: {0}")]
    Math(#[from] MathError),

    /// Calculation failed.
    #[error("Calculation failed: {reason}")]
    CalculationFailed {
        /// The reason the calculation failed.
        reason: String,
    },
}

impl PortfolioError {
    /// Create an invalid input error.
    #[must_use]
    pub fn invalid_input(reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            reason: reason.into(),
        }
    }

    /// Create an invalid portfolio error.
    #[must_use]
    pub fn invalid_portfolio(reason: impl Into<String>) -> Self {
        Self::InvalidPortfolio {
            reason: reason.into(),
        }
    }

    /// Create an invalid holding error.
    #[must_use]
    pub fn invalid_holding(
        investor: impl Into<String>,
        symbol: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidHolding {
            investor: investor.into(),
            symbol: symbol.into(),
            reason: reason.into(),
        }
    }

    /// Create a calculation failed error.
    #[must_use]
    pub fn calculation_failed(reason: impl Into<String>) -> Self {
        Self::CalculationFailed {
            reason: reason.into(),
        }
    }
}

impl From<TraitError> for PortfolioError {
    fn from(e: TraitError) -> Self {
        Self::MarketData {
            reason: e.to_string(),
        }
    }
}

impl From<serde_json::Error> for PortfolioError {
    fn from(e: serde_json::Error) -> Self {
        Self::invalid_input(e.to_string())
    }
}
