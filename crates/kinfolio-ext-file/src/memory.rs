//! In-memory market data.

use std::collections::{BTreeMap, HashMap};

use chrono::{Days, NaiveDate};
use rust_decimal::Decimal;

use kinfolio_traits::error::TraitError;
use kinfolio_traits::market_data::*;

use crate::market_data::window;

/// Builder-populated market data source for tests, demos and fixtures.
///
/// Unlike [`CsvMarketData`](crate::CsvMarketData), the current price is only
/// what was set with [`with_price`](Self::with_price); history never implies
/// a price. That keeps "has history but no quote" expressible.
#[derive(Debug, Clone, Default)]
pub struct InMemoryMarketData {
    prices: HashMap<String, Decimal>,
    closes: HashMap<String, BTreeMap<NaiveDate, f64>>,
    benchmark: BTreeMap<NaiveDate, f64>,
}

impl InMemoryMarketData {
    /// Creates an empty source.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the current price of `symbol`.
    #[must_use]
    pub fn with_price(mut self, symbol: impl Into<String>, price: Decimal) -> Self {
        self.prices.insert(symbol.into(), price);
        self
    }

    /// Adds one close for `symbol`; a repeated date replaces the earlier close.
    #[must_use]
    pub fn with_close(mut self, symbol: impl Into<String>, date: NaiveDate, close: f64) -> Self {
        self.closes.entry(symbol.into()).or_default().insert(date, close);
        self
    }

    /// Adds consecutive daily closes for `symbol` starting at `start`.
    #[must_use]
    pub fn with_closes(mut self, symbol: impl Into<String>, start: NaiveDate, closes: &[f64]) -> Self {
        let series = self.closes.entry(symbol.into()).or_default();
        series.extend(consecutive(start, closes));
        self
    }

    /// Adds consecutive daily benchmark closes starting at `start`.
    #[must_use]
    pub fn with_benchmark_closes(mut self, start: NaiveDate, closes: &[f64]) -> Self {
        self.benchmark.extend(consecutive(start, closes));
        self
    }
}

fn consecutive(start: NaiveDate, closes: &[f64]) -> impl Iterator<Item = (NaiveDate, f64)> + '_ {
    closes.iter().enumerate().filter_map(move |(i, close)| {
        start
            .checked_add_days(Days::new(i as u64))
            .map(|date| (date, *close))
    })
}

impl MarketDataSource for InMemoryMarketData {
    fn source_type(&self) -> SourceType {
        SourceType::Manual
    }

    fn current_price(&self, symbol: &str) -> Result<Option<Decimal>, TraitError> {
        Ok(self.prices.get(symbol).copied())
    }

    fn historical_daily_closes(
        &self,
        symbols: &[String],
        lookback_days: u32,
    ) -> Result<Vec<DailyClose>, TraitError> {
        let mut rows = Vec::new();
        for symbol in symbols {
            if let Some(series) = self.closes.get(symbol) {
                let series: Vec<(NaiveDate, f64)> = series.iter().map(|(d, c)| (*d, *c)).collect();
                rows.extend(
                    window(&series, lookback_days)
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
        let rows: Vec<BenchmarkClose> = self
            .benchmark
            .iter()
            .map(|(date, close)| BenchmarkClose::new(*date, *close))
            .collect();
        Ok(window(&rows, lookback_days).to_vec())
    }
}
