//! Optimize command implementation.
//!
//! Compares the current family allocation with an optimized one and lists
//! the trades between them.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use serde::Serialize;
use tabled::Tabled;

use kinfolio_portfolio::{Allocation, OptimizationMethod};

use crate::cli::OutputFormat;
use crate::commands::{open_session, Context};
use crate::output::{
    format_change, format_fraction, format_pct, print_header, print_info, print_json,
    print_output, print_warning, ready_or_warn,
};

/// Arguments for the optimize command.
#[derive(Args, Debug)]
pub struct OptimizeArgs {
    /// Portfolio JSON file
    pub portfolio: PathBuf,

    /// Method: max-sharpe, min-volatility, equal-weight, target-return
    #[arg(short, long, default_value = "max-sharpe", value_parser = parse_method)]
    pub method: OptimizationMethod,

    /// Target annual return as a fraction (e.g. 0.15)
    #[arg(short, long)]
    pub target_return: Option<f64>,
}

fn parse_method(s: &str) -> Result<OptimizationMethod, String> {
    s.parse().map_err(|e: kinfolio_portfolio::PortfolioError| e.to_string())
}

#[derive(Tabled, Serialize)]
struct AllocationRow {
    #[tabled(rename = "Symbol")]
    symbol: String,
    #[tabled(rename = "Current")]
    current: String,
    #[tabled(rename = "Optimized")]
    optimized: String,
}

#[derive(Tabled, Serialize)]
struct StatRow {
    #[tabled(rename = "Metric")]
    metric: String,
    #[tabled(rename = "Current")]
    current: String,
    #[tabled(rename = "Optimized")]
    optimized: String,
    #[tabled(rename = "Change")]
    change: String,
}

#[derive(Tabled, Serialize)]
struct TradeRow {
    #[tabled(rename = "Action")]
    action: String,
    #[tabled(rename = "Symbol")]
    symbol: String,
    #[tabled(rename = "Quantity")]
    quantity: String,
    #[tabled(rename = "Value")]
    value: String,
    #[tabled(rename = "Weight")]
    weight: String,
}

/// Execute the optimize command.
pub fn execute(args: OptimizeArgs, ctx: &Context) -> Result<()> {
    let session = open_session(&args.portfolio, ctx)?;
    let outcome = session.optimize(args.method, args.target_return);

    if ctx.format == OutputFormat::Json {
        return print_json(&outcome);
    }
    let Some(result) = ready_or_warn(&outcome, "Optimization") else {
        return Ok(());
    };

    let trades: Vec<TradeRow> = result
        .trades
        .iter()
        .map(|t| TradeRow {
            action: t.action.to_string(),
            symbol: t.symbol.clone(),
            quantity: if t.price_unresolved {
                "-".to_string()
            } else {
                format!("{:.0}", t.quantity)
            },
            value: format!("{:.2}", t.value),
            weight: format!(
                "{} -> {}",
                format_pct(t.current_weight),
                format_pct(t.target_weight)
            ),
        })
        .collect();
    if ctx.format == OutputFormat::Csv {
        return print_output(&trades, ctx.format);
    }

    print_header(&format!("Optimization ({})", result.method));
    print_output(&stat_rows(&result.current, &result.optimized), ctx.format)?;

    print_header("Weights");
    let weights: Vec<AllocationRow> = result
        .optimized
        .weights
        .iter()
        .map(|(symbol, w)| AllocationRow {
            symbol: symbol.clone(),
            current: format_fraction(result.current.weight(symbol)),
            optimized: format_fraction(*w),
        })
        .collect();
    print_output(&weights, ctx.format)?;

    print_header("Rebalancing Trades");
    if trades.is_empty() {
        print_info("Current allocation is within the rebalancing threshold.");
    } else {
        print_output(&trades, ctx.format)?;
    }

    if !result.excluded_symbols.is_empty() {
        print_warning(&format!(
            "No history for {}; left out of the optimization",
            result.excluded_symbols.join(", ")
        ));
    }
    Ok(())
}

fn stat_rows(current: &Allocation, optimized: &Allocation) -> Vec<StatRow> {
    let row = |metric: &str, now: f64, then: f64, fmt: fn(f64) -> String| StatRow {
        metric: metric.to_string(),
        current: fmt(now),
        optimized: fmt(then),
        change: format_change(then - now, fmt(then - now)),
    };
    vec![
        row(
            "Expected Return",
            current.expected_return,
            optimized.expected_return,
            format_fraction,
        ),
        row("Volatility", current.volatility, optimized.volatility, format_fraction),
        row("Sharpe Ratio", current.sharpe_ratio, optimized.sharpe_ratio, |v| {
            format!("{v:.3}")
        }),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_method() {
        assert_eq!(
            parse_method("min-volatility").unwrap(),
            OptimizationMethod::MinVolatility
        );
        assert_eq!(
            parse_method("max_sharpe").unwrap(),
            OptimizationMethod::MaxSharpe
        );
        assert!(parse_method("risk-parity").is_err());
    }
}
