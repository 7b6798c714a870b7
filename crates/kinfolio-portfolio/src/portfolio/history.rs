//! Market history loaded once per analysis.

use kinfolio_traits::MarketDataSource;
use tracing::{debug, warn};

use crate::analytics::{benchmark_returns, DatedReturn, ReturnTable};

/// Return table of the requested symbols plus the benchmark returns.
///
/// A source error leaves the affected part empty; downstream statistics fall
/// back to their neutral values.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MarketHistory {
    /// Symbol × date daily returns.
    pub table: ReturnTable,
    /// Benchmark daily returns, ascending by date.
    pub market: Vec<DatedReturn>,
}

impl MarketHistory {
    /// Fetches closes for `symbols` and the benchmark over `lookback_days`.
    pub fn load<M>(source: &M, symbols: &[String], lookback_days: u32) -> Self
    where
        M: MarketDataSource + ?Sized,
    {
        let table = match source.historical_daily_closes(symbols, lookback_days) {
            Ok(rows) => ReturnTable::from_closes(&rows),
            Err(e) => {
                warn!(error = %e, "historical closes unavailable");
                ReturnTable::default()
            }
        };

        let market = match source.benchmark_daily_closes(lookback_days) {
            Ok(rows) => benchmark_returns(&rows),
            Err(e) => {
                warn!(error = %e, "benchmark closes unavailable, betas default to 1.0");
                Vec::new()
            }
        };

        let missing: Vec<&str> = symbols
            .iter()
            .filter(|s| !table.contains(s))
            .map(String::as_str)
            .collect();
        if !missing.is_empty() {
            warn!(symbols = ?missing, "no return history");
        }
        debug!(
            symbols = table.symbols().len(),
            dates = table.dates().len(),
            benchmark_points = market.len(),
            "loaded market history"
        );

        Self { table, market }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use kinfolio_ext_file::InMemoryMarketData;
    use kinfolio_traits::{BenchmarkClose, DailyClose, SourceType, TraitError};
    use rust_decimal::Decimal;

    struct Offline;

    impl MarketDataSource for Offline {
        fn source_type(&self) -> SourceType {
            SourceType::Manual
        }

        fn current_price(&self, _symbol: &str) -> Result<Option<Decimal>, TraitError> {
            Err(TraitError::ConnectionFailed("offline".into()))
        }

        fn historical_daily_closes(
            &self,
            _symbols: &[String],
            _lookback_days: u32,
        ) -> Result<Vec<DailyClose>, TraitError> {
            Err(TraitError::ConnectionFailed("offline".into()))
        }

        fn benchmark_daily_closes(
            &self,
            _lookback_days: u32,
        ) -> Result<Vec<BenchmarkClose>, TraitError> {
            Err(TraitError::ConnectionFailed("offline".into()))
        }
    }

    #[test]
    fn test_source_errors_leave_history_empty() {
        let history = MarketHistory::load(&Offline, &["TCS".to_string()], 252);
        assert!(history.table.is_empty());
        assert!(history.market.is_empty());
    }

    #[test]
    fn test_load_from_memory() {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let source = InMemoryMarketData::new()
            .with_closes("TCS", start, &[100.0, 101.0, 102.0])
            .with_benchmark_closes(start, &[50.0, 50.5, 51.0]);

        let history = MarketHistory::load(&source, &["TCS".to_string(), "INFY".to_string()], 252);
        assert!(history.table.contains("TCS"));
        assert!(!history.table.contains("INFY"));
        assert_eq!(history.market.len(), 2);
    }
}
