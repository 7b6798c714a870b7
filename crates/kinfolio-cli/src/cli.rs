//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::commands::{
    AnalyzeArgs, ConfigArgs, FrontierArgs, OptimizeArgs, RiskArgs, ScenariosArgs, ValidateArgs,
};
use crate::config::DataPaths;

/// Kinfolio - Family portfolio analytics CLI
#[derive(Parser)]
#[command(name = "kinfolio")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, default_value = "table", global = true)]
    pub format: OutputFormat,

    /// Configuration file (TOML)
    #[arg(short, long, env = "KINFOLIO_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Log computation steps
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    pub verbose: bool,

    #[command(flatten)]
    pub data: DataArgs,

    #[command(subcommand)]
    pub command: Commands,
}

/// Market data files; each overrides the configuration file.
#[derive(Args, Debug, Clone, Default)]
pub struct DataArgs {
    /// Daily closes CSV (symbol,date,close)
    #[arg(long, global = true)]
    pub history: Option<PathBuf>,

    /// Benchmark closes CSV (date,close)
    #[arg(long, global = true)]
    pub benchmark: Option<PathBuf>,

    /// Current price overrides CSV (symbol,price)
    #[arg(long, global = true)]
    pub prices: Option<PathBuf>,
}

impl DataArgs {
    /// As configuration overrides.
    pub fn to_paths(&self) -> DataPaths {
        DataPaths {
            history: self.history.clone(),
            benchmark: self.benchmark.clone(),
            prices: self.prices.clone(),
        }
    }
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// Aggregate a family portfolio: members, holdings, overlaps, risk score
    Analyze(AnalyzeArgs),

    /// Optimize the family allocation and list rebalancing trades
    Optimize(OptimizeArgs),

    /// Trace the efficient frontier of the family's stocks
    Frontier(FrontierArgs),

    /// Correlation, VaR/CVaR, risk contribution and concentration
    Risk(RiskArgs),

    /// Apply what-if price shocks
    Scenarios(ScenariosArgs),

    /// Check a portfolio file without fetching market data
    Validate(ValidateArgs),

    /// Show configuration
    Config(ConfigArgs),
}

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table format
    #[default]
    Table,
    /// JSON format
    Json,
    /// CSV format (row-shaped results only)
    Csv,
}
