//! Scenarios command implementation.
//!
//! Runs the standard scenarios, selected ones, or custom ones from a JSON
//! file against the family portfolio.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use serde::Serialize;
use tabled::Tabled;

use kinfolio_portfolio::{stress_scenarios, summarize_results, Scenario};

use crate::cli::OutputFormat;
use crate::commands::{open_session, Context};
use crate::error::{read_file, CliError, CliResult};
use crate::output::{format_change, format_pct, print_header, print_json, print_output};

/// Arguments for the scenarios command.
#[derive(Args, Debug)]
pub struct ScenariosArgs {
    /// Portfolio JSON file
    pub portfolio: PathBuf,

    /// Standard scenario to run (repeatable); all of them when omitted
    #[arg(short, long = "scenario")]
    pub scenarios: Vec<String>,

    /// JSON file with custom scenarios: [{"name": ..., "shocks": {...}, "default_shock": ...}]
    #[arg(long)]
    pub file: Option<PathBuf>,

    /// Shock (%) for stocks a sector scenario does not name
    #[arg(long, default_value = "0", allow_hyphen_values = true)]
    pub default_shock: f64,
}

#[derive(Tabled, Serialize)]
struct ResultRow {
    #[tabled(rename = "Scenario")]
    scenario: String,
    #[tabled(rename = "Current Value")]
    current_value: String,
    #[tabled(rename = "Scenario Value")]
    scenario_value: String,
    #[tabled(rename = "Change")]
    change: String,
    #[tabled(rename = "Change %")]
    pct_change: String,
}

/// Resolves the scenarios to run.
pub fn select_scenarios(args: &ScenariosArgs) -> CliResult<Vec<Scenario>> {
    let mut selected = Vec::new();
    for name in &args.scenarios {
        let scenario = stress_scenarios::by_name(name, args.default_shock)
            .ok_or_else(|| CliError::UnknownScenario(name.clone()))?;
        selected.push(scenario);
    }
    if let Some(path) = &args.file {
        let custom: Vec<Scenario> = serde_json::from_str(&read_file(path)?)?;
        selected.extend(custom);
    }
    if selected.is_empty() {
        selected = stress_scenarios::all(args.default_shock);
    }
    Ok(selected)
}

/// Execute the scenarios command.
pub fn execute(args: ScenariosArgs, ctx: &Context) -> Result<()> {
    let scenarios = select_scenarios(&args)?;
    let session = open_session(&args.portfolio, ctx)?;
    let results = session.run_scenarios(&scenarios);

    if ctx.format == OutputFormat::Json {
        return print_json(&results);
    }

    let rows: Vec<ResultRow> = results
        .iter()
        .map(|r| ResultRow {
            scenario: r.scenario.clone(),
            current_value: format!("{:.2}", r.current_value),
            scenario_value: format!("{:.2}", r.scenario_value),
            change: if ctx.is_table() {
                format_change(r.value_change, format!("{:+.2}", r.value_change))
            } else {
                format!("{:.2}", r.value_change)
            },
            pct_change: format_pct(r.pct_change),
        })
        .collect();

    if ctx.is_table() {
        print_header("Scenario Analysis");
    }
    print_output(&rows, ctx.format)?;

    if let Some(summary) = summarize_results(&results).filter(|_| ctx.is_table() && !ctx.quiet) {
        println!(
            "\nWorst: {} ({}), best: {} ({}), average {}",
            summary.worst_scenario,
            format_pct(summary.worst_pct_change),
            summary.best_scenario,
            format_pct(summary.best_pct_change),
            format_pct(summary.avg_pct_change)
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(scenarios: &[&str]) -> ScenariosArgs {
        ScenariosArgs {
            portfolio: PathBuf::from("family.json"),
            scenarios: scenarios.iter().map(ToString::to_string).collect(),
            file: None,
            default_shock: -5.0,
        }
    }

    #[test]
    fn test_defaults_to_all() {
        assert_eq!(select_scenarios(&args(&[])).unwrap().len(), 4);
    }

    #[test]
    fn test_named_scenarios() {
        let selected = select_scenarios(&args(&["tech-selloff"])).unwrap();
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].shock_for("TCS"), -15.0);
        assert_eq!(selected[0].shock_for("RELIANCE"), -5.0);
    }

    #[test]
    fn test_unknown_scenario() {
        assert!(matches!(
            select_scenarios(&args(&["meteor"])),
            Err(CliError::UnknownScenario(_))
        ));
    }
}
