//! Kinfolio CLI - Command-line interface for family portfolio analytics.
//!
//! # Usage
//!
//! ```bash
//! # Aggregate a family portfolio
//! kinfolio --history closes.csv --benchmark nifty.csv analyze family.json
//!
//! # Optimize for minimum volatility
//! kinfolio optimize family.json --method min-volatility
//!
//! # Risk report as JSON
//! kinfolio --format json risk family.json
//!
//! # Run one standard scenario
//! kinfolio scenarios family.json --scenario market-crash
//! ```
//!
//! Data paths and analytics settings may also come from a TOML file given
//! with `--config` or found at the default location (`kinfolio config path`).

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod cli;
mod commands;
mod config;
mod error;
mod output;

use cli::{Cli, Commands};
use commands::Context;
use config::CliConfig;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so JSON output stays clean
    let default_filter = if cli.verbose {
        "kinfolio=debug,kinfolio_portfolio=debug,kinfolio_ext_file=debug"
    } else if cli.quiet {
        "error"
    } else {
        "info"
    };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = CliConfig::load(cli.config.as_deref())?.with_data_overrides(&cli.data.to_paths());
    let ctx = Context {
        format: cli.format,
        config,
        config_path: cli.config.clone(),
        quiet: cli.quiet,
    };

    // Execute command
    match cli.command {
        Commands::Analyze(args) => commands::analyze::execute(args, &ctx)?,
        Commands::Optimize(args) => commands::optimize::execute(args, &ctx)?,
        Commands::Frontier(args) => commands::frontier::execute(args, &ctx)?,
        Commands::Risk(args) => commands::risk::execute(args, &ctx)?,
        Commands::Scenarios(args) => commands::scenarios::execute(args, &ctx)?,
        Commands::Validate(args) => commands::validate::execute(args, &ctx)?,
        Commands::Config(args) => commands::config::execute(args, &ctx)?,
    }

    Ok(())
}
