//! CLI command implementations.

pub mod analyze;
pub mod config;
pub mod frontier;
pub mod optimize;
pub mod risk;
pub mod scenarios;
pub mod validate;

// Re-export submodules for convenience
pub use analyze::AnalyzeArgs;
pub use config::ConfigArgs;
pub use frontier::FrontierArgs;
pub use optimize::OptimizeArgs;
pub use risk::RiskArgs;
pub use scenarios::ScenariosArgs;
pub use validate::ValidateArgs;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use kinfolio_ext_file::create_file_market_data;
use kinfolio_portfolio::{AnalysisSession, PortfolioInput};
use kinfolio_traits::MarketDataSource;
use tracing::info;

use crate::cli::OutputFormat;
use crate::config::CliConfig;
use crate::error::{read_file, CliError, CliResult};

/// Session over file-backed market data.
pub type FileSession = AnalysisSession<Arc<dyn MarketDataSource>>;

/// State shared by every command.
#[derive(Debug, Clone)]
pub struct Context {
    /// Output format.
    pub format: OutputFormat,
    /// Effective configuration.
    pub config: CliConfig,
    /// Where the configuration came from, if a file.
    pub config_path: Option<PathBuf>,
    /// Suppress non-essential output.
    pub quiet: bool,
}

impl Context {
    /// True when human-readable tables are wanted.
    pub fn is_table(&self) -> bool {
        self.format == OutputFormat::Table
    }
}

/// Reads and validates a portfolio JSON file.
pub fn load_input(path: &Path) -> CliResult<PortfolioInput> {
    Ok(PortfolioInput::parse(&read_file(path)?)?)
}

/// Loads market data and aggregates the portfolio in `path`.
pub fn open_session(path: &Path, ctx: &Context) -> CliResult<FileSession> {
    let input = load_input(path)?;

    let data = &ctx.config.data;
    let history = data.history.as_deref().ok_or_else(|| {
        CliError::MissingArgument("--history (or [data].history in the config file)".into())
    })?;
    let benchmark = data.benchmark.as_deref().ok_or_else(|| {
        CliError::MissingArgument("--benchmark (or [data].benchmark in the config file)".into())
    })?;
    let source = create_file_market_data(history, benchmark, data.prices.as_deref())?;

    info!(
        portfolio = %path.display(),
        members = input.investors.len(),
        "analysing portfolio"
    );
    Ok(AnalysisSession::start(
        source,
        ctx.config.analytics.clone(),
        &input,
    )?)
}
