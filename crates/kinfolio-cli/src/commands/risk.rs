//! Risk command implementation.
//!
//! Prints tail risk, concentration, risk contributions and the correlation
//! matrix of the family's stocks.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use serde::Serialize;
use tabled::{builder::Builder, settings::Style, Tabled};

use kinfolio_portfolio::{CorrelationMatrix, Outcome, TailRisk};

use crate::cli::OutputFormat;
use crate::commands::{open_session, Context};
use crate::output::{format_fraction, format_pct, print_header, print_json, print_output, KeyValue};

/// Arguments for the risk command.
#[derive(Args, Debug)]
pub struct RiskArgs {
    /// Portfolio JSON file
    pub portfolio: PathBuf,

    /// Also print the correlation matrix
    #[arg(long)]
    pub correlation: bool,
}

#[derive(Tabled, Serialize)]
struct ContributionRow {
    #[tabled(rename = "Symbol")]
    symbol: String,
    #[tabled(rename = "Weight")]
    weight: String,
    #[tabled(rename = "Risk Contribution")]
    contribution: String,
    #[tabled(rename = "Marginal Risk")]
    marginal: String,
}

/// Execute the risk command.
pub fn execute(args: RiskArgs, ctx: &Context) -> Result<()> {
    let session = open_session(&args.portfolio, ctx)?;
    let report = session.analyze_risk();

    let contributions: Vec<ContributionRow> = report
        .risk_contributions
        .iter()
        .map(|c| ContributionRow {
            symbol: c.symbol.clone(),
            weight: format_pct(c.weight),
            contribution: format_pct(c.risk_contribution),
            marginal: format!("{:.6}", c.marginal_risk),
        })
        .collect();

    match ctx.format {
        OutputFormat::Json => return print_json(&report),
        OutputFormat::Csv => return print_output(&contributions, ctx.format),
        OutputFormat::Table => {}
    }

    print_header("Tail Risk");
    let level = session.config().confidence_level;
    let mut tail = Vec::new();
    tail.extend(tail_rows(&format!("VaR {:.0}%", level * 100.0), &report.var));
    tail.extend(tail_rows(&format!("CVaR {:.0}%", level * 100.0), &report.cvar));
    print_output(&tail, ctx.format)?;

    print_header("Concentration");
    let c = &report.concentration_risk;
    let concentration = vec![
        KeyValue::new("HHI", format!("{:.0}", c.hhi)),
        KeyValue::new("Top 1", format_pct(c.top_1_concentration)),
        KeyValue::new("Top 3", format_pct(c.top_3_concentration)),
        KeyValue::new("Top 5", format_pct(c.top_5_concentration)),
        KeyValue::new("Effective Holdings", format!("{:.1}", c.effective_holdings)),
        KeyValue::new(
            "Level",
            format!("{} ({})", c.concentration_level, c.risk_rating),
        ),
    ];
    print_output(&concentration, ctx.format)?;

    print_header("Risk Contribution");
    print_output(&contributions, ctx.format)?;

    if args.correlation {
        print_header("Correlation");
        print_correlation(&report.correlation_matrix);
    }
    Ok(())
}

fn tail_rows(label: &str, outcome: &Outcome<TailRisk>) -> Vec<KeyValue> {
    match outcome.as_ready() {
        Some(risk) => vec![
            KeyValue::new(format!("{label} (daily)"), format_fraction(risk.daily)),
            KeyValue::new(format!("{label} (annual)"), format_fraction(risk.annual)),
        ],
        None => vec![KeyValue::new(
            label,
            format!("unavailable: {}", outcome.reason().unwrap_or("unknown")),
        )],
    }
}

fn print_correlation(matrix: &CorrelationMatrix) {
    if matrix.is_empty() {
        println!("No return history.");
        return;
    }

    let mut builder = Builder::default();
    let mut header = vec![String::new()];
    header.extend(matrix.symbols.iter().cloned());
    builder.push_record(header);

    for (symbol, row) in matrix.symbols.iter().zip(&matrix.values) {
        let mut record = vec![symbol.clone()];
        record.extend(
            row.iter()
                .map(|v| v.map_or_else(|| "n/a".to_string(), |r| format!("{r:.2}"))),
        );
        builder.push_record(record);
    }

    let mut table = builder.build();
    table.with(Style::rounded());
    println!("{table}");
}
