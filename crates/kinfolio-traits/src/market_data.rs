//! Market data source traits.
//!
//! The analytics core consumes exactly three things from the outside world:
//! - the current price of a symbol
//! - daily closes per symbol over a lookback window
//! - daily closes of the market benchmark used for beta
//!
//! Sources are synchronous and `Send + Sync` so the core can resolve symbols
//! from a rayon pool without an async runtime.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, FixedOffset, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::TraitError;

/// Source type for market data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SourceType {
    /// Snapshot/request-response (REST APIs)
    Snapshot,
    /// File-based (CSV, JSON)
    File,
    /// In-process fixture or manual entry
    Manual,
}

// =============================================================================
// ROW TYPES
// =============================================================================

/// One daily close of one symbol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyClose {
    /// Ticker symbol
    pub symbol: String,
    /// Trading date (naive; offsets already stripped)
    pub date: NaiveDate,
    /// Closing price
    pub close: f64,
}

impl DailyClose {
    /// Creates a new close row.
    pub fn new(symbol: impl Into<String>, date: NaiveDate, close: f64) -> Self {
        Self {
            symbol: symbol.into(),
            date,
            close,
        }
    }
}

/// One daily close of the market benchmark.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkClose {
    /// Trading date (naive; offsets already stripped)
    pub date: NaiveDate,
    /// Closing level
    pub close: f64,
}

impl BenchmarkClose {
    /// Creates a new benchmark row.
    pub fn new(date: NaiveDate, close: f64) -> Self {
        Self { date, close }
    }
}

/// Normalizes an offset-carrying timestamp to the local calendar date.
///
/// Exchange timestamps arrive with the venue's offset attached
/// (`2024-03-01T00:00:00+05:30`). Converting to UTC first would move such a
/// close onto the previous day, so the local wall-clock date is kept.
pub fn trading_date(timestamp: &DateTime<FixedOffset>) -> NaiveDate {
    timestamp.naive_local().date()
}

// =============================================================================
// MARKET DATA SOURCE
// =============================================================================

/// The market data collaborator.
///
/// Contract:
/// - `historical_daily_closes` returns rows deduplicated per `(symbol, date)`
///   and ascending by date within each symbol; symbols without data are simply
///   absent from the result.
/// - `lookback_days` counts trading days, so a source returns at most
///   `lookback_days + 1` closes per symbol (enough for `lookback_days`
///   returns).
pub trait MarketDataSource: Send + Sync {
    /// Source type.
    fn source_type(&self) -> SourceType;

    /// Current price of `symbol`, `None` when the source has no quote.
    fn current_price(&self, symbol: &str) -> Result<Option<Decimal>, TraitError>;

    /// Current prices for several symbols; unresolved symbols are omitted.
    fn current_prices(&self, symbols: &[String]) -> Result<HashMap<String, Decimal>, TraitError> {
        let mut prices = HashMap::with_capacity(symbols.len());
        for symbol in symbols {
            if let Some(price) = self.current_price(symbol)? {
                prices.insert(symbol.clone(), price);
            }
        }
        Ok(prices)
    }

    /// Daily closes for `symbols` over the last `lookback_days` trading days.
    fn historical_daily_closes(
        &self,
        symbols: &[String],
        lookback_days: u32,
    ) -> Result<Vec<DailyClose>, TraitError>;

    /// Daily closes of the market benchmark over the last `lookback_days`.
    fn benchmark_daily_closes(&self, lookback_days: u32)
        -> Result<Vec<BenchmarkClose>, TraitError>;
}

impl<T: MarketDataSource + ?Sized> MarketDataSource for Arc<T> {
    fn source_type(&self) -> SourceType {
        (**self).source_type()
    }

    fn current_price(&self, symbol: &str) -> Result<Option<Decimal>, TraitError> {
        (**self).current_price(symbol)
    }

    fn current_prices(&self, symbols: &[String]) -> Result<HashMap<String, Decimal>, TraitError> {
        (**self).current_prices(symbols)
    }

    fn historical_daily_closes(
        &self,
        symbols: &[String],
        lookback_days: u32,
    ) -> Result<Vec<DailyClose>, TraitError> {
        (**self).historical_daily_closes(symbols, lookback_days)
    }

    fn benchmark_daily_closes(
        &self,
        lookback_days: u32,
    ) -> Result<Vec<BenchmarkClose>, TraitError> {
        (**self).benchmark_daily_closes(lookback_days)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    struct Fixed;

    impl MarketDataSource for Fixed {
        fn source_type(&self) -> SourceType {
            SourceType::Manual
        }

        fn current_price(&self, symbol: &str) -> Result<Option<Decimal>, TraitError> {
            Ok((symbol == "TCS").then_some(dec!(3500)))
        }

        fn historical_daily_closes(
            &self,
            _symbols: &[String],
            _lookback_days: u32,
        ) -> Result<Vec<DailyClose>, TraitError> {
            Ok(Vec::new())
        }

        fn benchmark_daily_closes(
            &self,
            _lookback_days: u32,
        ) -> Result<Vec<BenchmarkClose>, TraitError> {
            Ok(Vec::new())
        }
    }

    #[test]
    fn test_current_prices_omits_unresolved() {
        let prices = Fixed
            .current_prices(&["TCS".to_string(), "INFY".to_string()])
            .unwrap();
        assert_eq!(prices.len(), 1);
        assert_eq!(prices["TCS"], dec!(3500));
    }

    #[test]
    fn test_arc_delegates() {
        let source: Arc<dyn MarketDataSource> = Arc::new(Fixed);
        assert_eq!(source.source_type(), SourceType::Manual);
        assert_eq!(source.current_price("TCS").unwrap(), Some(dec!(3500)));
    }

    #[test]
    fn test_trading_date_keeps_local_day() {
        let ts = DateTime::parse_from_rfc3339("2024-03-01T00:00:00+05:30").unwrap();
        assert_eq!(
            trading_date(&ts),
            NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
        );
    }
}
