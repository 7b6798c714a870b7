//! # Kinfolio Ext File
//!
//! File-based and in-memory market data for the Kinfolio analytics core.
//!
//! This crate provides default [`MarketDataSource`] implementations for
//! testing, end-of-day loads and offline analysis:
//! - [`CsvMarketData`]: daily closes, benchmark closes and optional price
//!   overrides read from CSV files
//! - [`InMemoryMarketData`]: a builder-populated source for tests and demos
//!
//! For live prices, implement [`MarketDataSource`] against a vendor API.

#![warn(missing_docs)]
#![warn(clippy::all)]

mod market_data;
mod memory;

pub use market_data::*;
pub use memory::*;

use std::path::Path;
use std::sync::Arc;

use kinfolio_traits::error::TraitError;
use kinfolio_traits::market_data::MarketDataSource;

/// Create a file-based market data source behind an `Arc`.
///
/// `prices_csv` is optional; without it the latest close of each symbol is
/// its current price.
pub fn create_file_market_data(
    history_csv: impl AsRef<Path>,
    benchmark_csv: impl AsRef<Path>,
    prices_csv: Option<&Path>,
) -> Result<Arc<dyn MarketDataSource>, TraitError> {
    let mut source = CsvMarketData::new(history_csv)?.with_benchmark(benchmark_csv)?;
    if let Some(prices) = prices_csv {
        source = source.with_price_overrides(prices)?;
    }
    Ok(Arc::new(source))
}
