//! Config command implementation.
//!
//! Shows the effective configuration and where it is read from.

use anyhow::Result;
use clap::{Args, Subcommand};

use crate::cli::OutputFormat;
use crate::commands::Context;
use crate::config::{default_path, CliConfig};
use crate::output::{print_header, print_info, print_json, print_output, KeyValue};

/// Arguments for the config command.
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

/// Config subcommands.
#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Show the effective configuration
    Show,

    /// Print a configuration file with every default filled in
    Init,

    /// Show configuration file location
    Path,
}

/// Execute the config command.
pub fn execute(args: ConfigArgs, ctx: &Context) -> Result<()> {
    match args.command {
        ConfigCommand::Show => show(&ctx.config, ctx),
        ConfigCommand::Init => {
            print!("{}", CliConfig::default().to_toml()?);
            Ok(())
        }
        ConfigCommand::Path => {
            match ctx.config_path.clone().or_else(default_path) {
                Some(path) => {
                    let state = if path.exists() { "" } else { " (not present)" };
                    println!("{}{state}", path.display());
                }
                None => print_info("No configuration directory on this platform."),
            }
            Ok(())
        }
    }
}

fn show(config: &CliConfig, ctx: &Context) -> Result<()> {
    if ctx.format == OutputFormat::Json {
        return print_json(config);
    }

    let a = &config.analytics;
    let path = |p: &Option<std::path::PathBuf>| {
        p.as_ref()
            .map_or_else(|| "(not set)".to_string(), |p| p.display().to_string())
    };
    let rows = vec![
        KeyValue::new("risk_free_rate", a.risk_free_rate.to_string()),
        KeyValue::new("trading_days", a.trading_days.to_string()),
        KeyValue::new("lookback_days", a.lookback_days.to_string()),
        KeyValue::new("confidence_level", a.confidence_level.to_string()),
        KeyValue::new("rebalance_threshold", a.rebalance_threshold.to_string()),
        KeyValue::new("frontier_points", a.frontier_points.to_string()),
        KeyValue::new("parallel", a.parallel.to_string()),
        KeyValue::new("parallel_threshold", a.parallel_threshold.to_string()),
        KeyValue::new("solver.tolerance", a.solver.tolerance.to_string()),
        KeyValue::new("solver.max_iterations", a.solver.max_iterations.to_string()),
        KeyValue::new("data.history", path(&config.data.history)),
        KeyValue::new("data.benchmark", path(&config.data.benchmark)),
        KeyValue::new("data.prices", path(&config.data.prices)),
    ];

    if ctx.is_table() {
        print_header("Configuration");
    }
    print_output(&rows, ctx.format)
}
