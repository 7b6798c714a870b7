//! Validate command implementation.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use serde::Serialize;

use crate::cli::OutputFormat;
use crate::commands::{load_input, Context};
use crate::output::{print_error, print_json, print_success};

/// Arguments for the validate command.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Portfolio JSON file
    pub portfolio: PathBuf,
}

#[derive(Serialize)]
struct Report {
    valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    investors: usize,
    lots: usize,
    symbols: Vec<String>,
}

/// Execute the validate command.
///
/// An invalid file is reported and makes the process exit non-zero.
pub fn execute(args: ValidateArgs, ctx: &Context) -> Result<()> {
    let report = match load_input(&args.portfolio) {
        Ok(input) => Report {
            valid: true,
            error: None,
            investors: input.investors.len(),
            lots: input.investors.iter().map(|i| i.stocks.len()).sum(),
            symbols: input.symbols(),
        },
        Err(e) => Report {
            valid: false,
            error: Some(e.to_string()),
            investors: 0,
            lots: 0,
            symbols: Vec::new(),
        },
    };

    if ctx.format == OutputFormat::Json {
        print_json(&report)?;
    } else if report.valid {
        print_success(&format!(
            "{}: {} investors, {} lots, {} distinct stocks",
            args.portfolio.display(),
            report.investors,
            report.lots,
            report.symbols.len()
        ));
    } else {
        print_error(report.error.as_deref().unwrap_or("invalid portfolio"));
    }

    if report.valid {
        Ok(())
    } else {
        Err(anyhow::anyhow!("{} is not a valid portfolio", args.portfolio.display()))
    }
}
