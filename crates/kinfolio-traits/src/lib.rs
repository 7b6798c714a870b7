//! # Kinfolio Traits
//!
//! Trait definitions for the Kinfolio analytics core.
//!
//! This crate contains ONLY trait definitions and the plain row types they
//! exchange. Implementations live in extension crates such as
//! `kinfolio-ext-file`.
//!
//! ## Module Structure
//!
//! - [`market_data`]: The market data collaborator (current prices, daily
//!   closes, benchmark closes)
//! - [`error`]: Error type shared by every source implementation
//!
//! ## Dependency Injection
//!
//! The analytics core never fetches prices itself; it is handed a source:
//!
//! ```ignore
//! let source = CsvMarketData::from_paths(history, benchmark)?;
//! let family = Aggregator::new(&source, config).process_portfolio(&input)?;
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod market_data;

// Re-export commonly used types
pub use error::TraitError;
pub use market_data::{BenchmarkClose, DailyClose, MarketDataSource, SourceType};
