//! CSV-backed market data.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use dashmap::DashMap;
use rust_decimal::Decimal;
use serde::Deserialize;

use kinfolio_traits::error::TraitError;
use kinfolio_traits::market_data::*;

// =============================================================================
// CSV RECORDS
// =============================================================================

/// CSV record for symbol history: `symbol,date,close`.
#[derive(Debug, Deserialize)]
struct HistoryRecord {
    symbol: String,
    date: String,
    close: f64,
}

/// CSV record for the benchmark: `date,close`.
#[derive(Debug, Deserialize)]
struct BenchmarkRecord {
    date: String,
    close: f64,
}

/// CSV record for price overrides: `symbol,price`.
#[derive(Debug, Deserialize)]
struct PriceRecord {
    symbol: String,
    price: Decimal,
}

/// Parses a close date.
///
/// Accepts `YYYY-MM-DD`, RFC 3339 timestamps, and `YYYY-MM-DD HH:MM:SS` with
/// or without a trailing offset. Offsets are dropped after taking the local
/// calendar date, so series exported from different venues still align.
pub fn parse_close_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(trading_date(&ts));
    }
    if let Ok(ts) = DateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%:z") {
        return Some(trading_date(&ts));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S")
        .ok()
        .map(|ts| ts.date())
}

fn reader(path: &Path) -> Result<csv::Reader<std::fs::File>, TraitError> {
    csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|e| TraitError::IoError(format!("{}: {e}", path.display())))
}

fn checked_close(path: &Path, line: usize, close: f64) -> Result<f64, TraitError> {
    if close.is_finite() && close > 0.0 {
        Ok(close)
    } else {
        Err(TraitError::parse(
            format!("{} record {line}", path.display()),
            format!("close must be positive, got {close}"),
        ))
    }
}

/// Last `lookback_days + 1` closes: enough for `lookback_days` returns.
pub(crate) fn window<T>(rows: &[T], lookback_days: u32) -> &[T] {
    let keep = lookback_days as usize + 1;
    &rows[rows.len().saturating_sub(keep)..]
}

// =============================================================================
// CSV MARKET DATA
// =============================================================================

/// CSV-based market data source for EOD and offline analysis.
///
/// Duplicate `(symbol, date)` rows keep the last occurrence in the file.
pub struct CsvMarketData {
    history_path: PathBuf,
    benchmark_path: Option<PathBuf>,
    prices_path: Option<PathBuf>,
    closes: DashMap<String, Vec<(NaiveDate, f64)>>,
    benchmark: DashMap<NaiveDate, f64>,
    overrides: DashMap<String, Decimal>,
}

impl CsvMarketData {
    /// Create a new CSV market data source from a history file.
    pub fn new(history_path: impl AsRef<Path>) -> Result<Self, TraitError> {
        let source = Self {
            history_path: history_path.as_ref().to_path_buf(),
            benchmark_path: None,
            prices_path: None,
            closes: DashMap::new(),
            benchmark: DashMap::new(),
            overrides: DashMap::new(),
        };
        source.load_history()?;
        Ok(source)
    }

    /// Attach a benchmark file (`date,close`).
    pub fn with_benchmark(mut self, path: impl AsRef<Path>) -> Result<Self, TraitError> {
        self.benchmark_path = Some(path.as_ref().to_path_buf());
        self.load_benchmark()?;
        Ok(self)
    }

    /// Attach a price override file (`symbol,price`).
    pub fn with_price_overrides(mut self, path: impl AsRef<Path>) -> Result<Self, TraitError> {
        self.prices_path = Some(path.as_ref().to_path_buf());
        self.load_overrides()?;
        Ok(self)
    }

    /// Reload every attached file.
    pub fn reload(&self) -> Result<(), TraitError> {
        self.load_history()?;
        self.load_benchmark()?;
        self.load_overrides()
    }

    /// Number of symbols with at least one close.
    pub fn symbol_count(&self) -> usize {
        self.closes.len()
    }

    fn load_history(&self) -> Result<(), TraitError> {
        let path = &self.history_path;
        let mut by_symbol: BTreeMap<String, BTreeMap<NaiveDate, f64>> = BTreeMap::new();

        for (line, result) in reader(path)?.deserialize().enumerate() {
            let record: HistoryRecord = result.map_err(|e| TraitError::parse(path.display(), e))?;
            let date = parse_close_date(&record.date).ok_or_else(|| {
                TraitError::parse(
                    format!("{} record {}", path.display(), line + 1),
                    format!("unrecognized date '{}'", record.date),
                )
            })?;
            let close = checked_close(path, line + 1, record.close)?;
            by_symbol
                .entry(record.symbol)
                .or_default()
                .insert(date, close);
        }

        self.closes.clear();
        for (symbol, series) in by_symbol {
            self.closes.insert(symbol, series.into_iter().collect());
        }
        Ok(())
    }

    fn load_benchmark(&self) -> Result<(), TraitError> {
        let Some(path) = &self.benchmark_path else {
            return Ok(());
        };

        self.benchmark.clear();
        for (line, result) in reader(path)?.deserialize().enumerate() {
            let record: BenchmarkRecord =
                result.map_err(|e| TraitError::parse(path.display(), e))?;
            let date = parse_close_date(&record.date).ok_or_else(|| {
                TraitError::parse(
                    format!("{} record {}", path.display(), line + 1),
                    format!("unrecognized date '{}'", record.date),
                )
            })?;
            self.benchmark
                .insert(date, checked_close(path, line + 1, record.close)?);
        }
        Ok(())
    }

    fn load_overrides(&self) -> Result<(), TraitError> {
        let Some(path) = &self.prices_path else {
            return Ok(());
        };

        self.overrides.clear();
        for result in reader(path)?.deserialize() {
            let record: PriceRecord = result.map_err(|e| TraitError::parse(path.display(), e))?;
            self.overrides.insert(record.symbol, record.price);
        }
        Ok(())
    }
}

impl MarketDataSource for CsvMarketData {
    fn source_type(&self) -> SourceType {
        SourceType::File
    }

    fn current_price(&self, symbol: &str) -> Result<Option<Decimal>, TraitError> {
        if let Some(price) = self.overrides.get(symbol) {
            return Ok(Some(*price));
        }
        Ok(self
            .closes
            .get(symbol)
            .and_then(|series| series.last().map(|(_, close)| *close))
            .and_then(|close| Decimal::try_from(close).ok()))
    }

    fn historical_daily_closes(
        &self,
        symbols: &[String],
        lookback_days: u32,
    ) -> Result<Vec<DailyClose>, TraitError> {
        let mut rows = Vec::new();
        for symbol in symbols {
            if let Some(series) = self.closes.get(symbol) {
                rows.extend(
                    window(series.as_slice(), lookback_days)
                        .iter()
                        .map(|(date, close)| DailyClose::new(symbol.clone(), *date, *close)),
                );
            }
        }
        Ok(rows)
    }

    fn benchmark_daily_closes(
        &self,
        lookback_days: u32,
    ) -> Result<Vec<BenchmarkClose>, TraitError> {
        let mut rows: Vec<BenchmarkClose> = self
            .benchmark
            .iter()
            .map(|entry| BenchmarkClose::new(*entry.key(), *entry.value()))
            .collect();
        rows.sort_by_key(|row| row.date);
        Ok(window(&rows, lookback_days).to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn csv_file(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_parse_close_date_formats() {
        let expected = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        assert_eq!(parse_close_date("2024-03-01"), Some(expected));
        assert_eq!(parse_close_date("2024-03-01T00:00:00+05:30"), Some(expected));
        assert_eq!(parse_close_date("2024-03-01 00:00:00+05:30"), Some(expected));
        assert_eq!(parse_close_date("2024-03-01 15:30:00"), Some(expected));
        assert_eq!(parse_close_date("01/03/2024"), None);
    }

    #[test]
    fn test_history_sorted_and_deduplicated() {
        let history = csv_file(
            "symbol,date,close\n\
             TCS,2024-01-03,102\n\
             TCS,2024-01-01,100\n\
             TCS,2024-01-02,101\n\
             TCS,2024-01-02,101.5\n\
             INFY,2024-01-01,1500\n",
        );
        let source = CsvMarketData::new(history.path()).unwrap();
        assert_eq!(source.symbol_count(), 2);

        let rows = source
            .historical_daily_closes(&["TCS".to_string()], 252)
            .unwrap();
        let closes: Vec<f64> = rows.iter().map(|r| r.close).collect();
        assert_eq!(closes, vec![100.0, 101.5, 102.0]);
        assert!(rows.windows(2).all(|w| w[0].date < w[1].date));
    }

    #[test]
    fn test_lookback_window_keeps_one_extra_close() {
        let history = csv_file(
            "symbol,date,close\n\
             TCS,2024-01-01,100\n\
             TCS,2024-01-02,101\n\
             TCS,2024-01-03,102\n\
             TCS,2024-01-04,103\n",
        );
        let source = CsvMarketData::new(history.path()).unwrap();
        let rows = source
            .historical_daily_closes(&["TCS".to_string()], 2)
            .unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].close, 101.0);
    }

    #[test]
    fn test_current_price_prefers_override() {
        let history = csv_file("symbol,date,close\nTCS,2024-01-01,100\nTCS,2024-01-02,110\n");
        let prices = csv_file("symbol,price\nINFY,1520.25\n");
        let source = CsvMarketData::new(history.path())
            .unwrap()
            .with_price_overrides(prices.path())
            .unwrap();

        assert_eq!(source.current_price("TCS").unwrap(), Some(dec!(110)));
        assert_eq!(source.current_price("INFY").unwrap(), Some(dec!(1520.25)));
        assert_eq!(source.current_price("WIPRO").unwrap(), None);
    }

    #[test]
    fn test_benchmark_sorted() {
        let history = csv_file("symbol,date,close\nTCS,2024-01-01,100\n");
        let benchmark = csv_file("date,close\n2024-01-02,21010\n2024-01-01,21000\n");
        let source = CsvMarketData::new(history.path())
            .unwrap()
            .with_benchmark(benchmark.path())
            .unwrap();

        let rows = source.benchmark_daily_closes(252).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].close, 21000.0);
    }

    #[test]
    fn test_rejects_bad_rows() {
        let bad_date = csv_file("symbol,date,close\nTCS,yesterday,100\n");
        assert!(matches!(
            CsvMarketData::new(bad_date.path()),
            Err(TraitError::ParseError(_))
        ));

        let bad_close = csv_file("symbol,date,close\nTCS,2024-01-01,0\n");
        assert!(CsvMarketData::new(bad_close.path()).is_err());

        assert!(CsvMarketData::new("/nonexistent/history.csv").is_err());
    }
}
