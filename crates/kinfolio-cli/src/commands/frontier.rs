//! Frontier command implementation.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use serde::Serialize;
use tabled::Tabled;

use crate::cli::OutputFormat;
use crate::commands::{open_session, Context};
use crate::output::{format_fraction, print_header, print_json, print_output, ready_or_warn};

/// Arguments for the frontier command.
#[derive(Args, Debug)]
pub struct FrontierArgs {
    /// Portfolio JSON file
    pub portfolio: PathBuf,

    /// Number of points (defaults to the configured count)
    #[arg(short = 'n', long)]
    pub points: Option<usize>,
}

#[derive(Tabled, Serialize)]
struct PointRow {
    #[tabled(rename = "Target Return")]
    target_return: String,
    #[tabled(rename = "Volatility")]
    volatility: String,
    #[tabled(rename = "Sharpe")]
    sharpe: String,
}

/// Execute the frontier command.
pub fn execute(args: FrontierArgs, ctx: &Context) -> Result<()> {
    let session = open_session(&args.portfolio, ctx)?;
    let outcome = session.efficient_frontier(args.points);

    if ctx.format == OutputFormat::Json {
        return print_json(&outcome);
    }
    let Some(frontier) = ready_or_warn(&outcome, "Efficient frontier") else {
        return Ok(());
    };

    let rows: Vec<PointRow> = frontier
        .points
        .iter()
        .map(|p| {
            if p.feasible {
                PointRow {
                    target_return: format_fraction(p.target_return),
                    volatility: format_fraction(p.volatility),
                    sharpe: format!("{:.3}", p.sharpe_ratio),
                }
            } else {
                PointRow {
                    target_return: format_fraction(p.target_return),
                    volatility: "infeasible".to_string(),
                    sharpe: "-".to_string(),
                }
            }
        })
        .collect();

    if ctx.is_table() {
        print_header(&format!(
            "Efficient Frontier ({} stocks, {} of {} points feasible)",
            frontier.symbols.len(),
            frontier.feasible_points().count(),
            frontier.points.len()
        ));
    }
    print_output(&rows, ctx.format)?;

    if let Some(min) = frontier.minimum_volatility().filter(|_| ctx.is_table()) {
        println!(
            "\nMinimum volatility {} at return {}",
            format_fraction(min.volatility),
            format_fraction(min.expected_return)
        );
    }
    Ok(())
}
