//! Raw portfolio input and its validation.
//!
//! ```json
//! { "email": "family@example.com",
//!   "investor": [ { "id": "INV001", "name": "Asha",
//!                   "stocks": [ { "symbol": "RELIANCE", "quantity": "100",
//!                                 "cost_basis": "2450.50" } ] } ] }
//! ```
//!
//! `quantity` and `cost_basis` may be JSON strings or numbers.

use std::collections::HashSet;
use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{PortfolioError, PortfolioResult};

/// Maximum number of family members.
pub const MAX_INVESTORS: usize = 20;

/// Maximum number of stock lots per member.
pub const MAX_STOCKS_PER_INVESTOR: usize = 50;

static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").expect("Invalid regex pattern")
});

/// Returns true for a syntactically valid email address.
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_REGEX.is_match(email)
}

/// A family portfolio as submitted by the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioInput {
    /// Contact email of the family.
    pub email: String,
    /// Family members.
    #[serde(rename = "investor")]
    pub investors: Vec<InvestorInput>,
}

/// One family member.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvestorInput {
    /// Unique member id.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Stock lots.
    pub stocks: Vec<StockInput>,
}

/// One stock lot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockInput {
    /// Ticker symbol.
    pub symbol: String,
    /// Number of shares (> 0).
    #[serde(deserialize_with = "decimal_from_text_or_number")]
    pub quantity: Decimal,
    /// Average cost per share (>= 0); zero when unknown.
    #[serde(default, deserialize_with = "decimal_from_text_or_number")]
    pub cost_basis: Decimal,
}

impl StockInput {
    /// Creates a lot.
    #[must_use]
    pub fn new(symbol: impl Into<String>, quantity: Decimal, cost_basis: Decimal) -> Self {
        Self {
            symbol: symbol.into(),
            quantity,
            cost_basis,
        }
    }
}

fn decimal_from_text_or_number<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(f64),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Text(text) => Decimal::from_str(text.trim())
            .or_else(|_| Decimal::from_scientific(text.trim()))
            .map_err(|_| serde::de::Error::custom(format!("'{text}' is not a number"))),
        Raw::Number(number) => Decimal::try_from(number)
            .map_err(|_| serde::de::Error::custom(format!("{number} is not representable"))),
    }
}

impl PortfolioInput {
    /// Parses JSON input without validating it.
    pub fn from_json(json: &str) -> PortfolioResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Parses and validates JSON input.
    pub fn parse(json: &str) -> PortfolioResult<Self> {
        let input = Self::from_json(json)?;
        input.validate()?;
        Ok(input)
    }

    /// Checks the structural constraints on a family portfolio.
    ///
    /// 1-20 investors with unique non-empty ids, 1-50 stocks each, a valid
    /// email, non-empty symbols, positive quantities and non-negative cost
    /// basis. The first violation is reported.
    pub fn validate(&self) -> PortfolioResult<()> {
        if !is_valid_email(&self.email) {
            return Err(PortfolioError::invalid_portfolio(format!(
                "Invalid email format: {}",
                self.email
            )));
        }

        if self.investors.is_empty() {
            return Err(PortfolioError::invalid_portfolio(
                "At least one investor required",
            ));
        }
        if self.investors.len() > MAX_INVESTORS {
            return Err(PortfolioError::invalid_portfolio(format!(
                "Maximum {MAX_INVESTORS} family members allowed"
            )));
        }

        let mut ids = HashSet::new();
        for (idx, investor) in self.investors.iter().enumerate() {
            if investor.id.trim().is_empty() {
                return Err(PortfolioError::invalid_portfolio(format!(
                    "Investor {}: Invalid ID",
                    idx + 1
                )));
            }
            if !ids.insert(investor.id.as_str()) {
                return Err(PortfolioError::invalid_portfolio(format!(
                    "Duplicate investor ID: {}",
                    investor.id
                )));
            }
            investor.validate()?;
        }

        Ok(())
    }

    /// Distinct symbols across all members, sorted.
    #[must_use]
    pub fn symbols(&self) -> Vec<String> {
        let mut symbols: Vec<String> = self
            .investors
            .iter()
            .flat_map(|i| i.stocks.iter().map(|s| s.symbol.clone()))
            .collect();
        symbols.sort();
        symbols.dedup();
        symbols
    }
}

impl InvestorInput {
    fn validate(&self) -> PortfolioResult<()> {
        if self.stocks.is_empty() {
            return Err(PortfolioError::invalid_portfolio(format!(
                "Investor {}: At least one stock required",
                self.id
            )));
        }
        if self.stocks.len() > MAX_STOCKS_PER_INVESTOR {
            return Err(PortfolioError::invalid_portfolio(format!(
                "Investor {}: Maximum {MAX_STOCKS_PER_INVESTOR} stocks allowed",
                self.id
            )));
        }

        for stock in &self.stocks {
            if stock.symbol.trim().is_empty() {
                return Err(PortfolioError::invalid_holding(
                    &self.id,
                    &stock.symbol,
                    "Invalid symbol format",
                ));
            }
            if stock.quantity <= Decimal::ZERO {
                return Err(PortfolioError::invalid_holding(
                    &self.id,
                    &stock.symbol,
                    "Quantity must be positive",
                ));
            }
            if stock.cost_basis < Decimal::ZERO {
                return Err(PortfolioError::invalid_holding(
                    &self.id,
                    &stock.symbol,
                    "Cost basis cannot be negative",
                ));
            }
        }

        Ok(())
    }
}
