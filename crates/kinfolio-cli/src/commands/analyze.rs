//! Analyze command implementation.
//!
//! Aggregates a family portfolio and prints the family summary, members,
//! combined holdings and overlaps.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use serde::Serialize;
use tabled::Tabled;

use kinfolio_portfolio::FamilyPortfolio;

use crate::cli::OutputFormat;
use crate::commands::{open_session, Context};
use crate::output::{
    format_amount, format_fraction, format_pct, print_header, print_json, print_output, KeyValue,
};

/// Arguments for the analyze command.
#[derive(Args, Debug)]
pub struct AnalyzeArgs {
    /// Portfolio JSON file
    pub portfolio: PathBuf,

    /// Also list every member's lots
    #[arg(long)]
    pub lots: bool,
}

#[derive(Tabled, Serialize)]
struct MemberRow {
    #[tabled(rename = "Member")]
    name: String,
    #[tabled(rename = "Value")]
    value: String,
    #[tabled(rename = "Gain")]
    gain: String,
    #[tabled(rename = "Gain %")]
    gain_pct: String,
    #[tabled(rename = "Lots")]
    lots: usize,
    #[tabled(rename = "Volatility")]
    volatility: String,
    #[tabled(rename = "Sharpe")]
    sharpe: String,
    #[tabled(rename = "Diversification")]
    diversification: String,
}

#[derive(Tabled, Serialize)]
struct HoldingRow {
    #[tabled(rename = "Symbol")]
    symbol: String,
    #[tabled(rename = "Quantity")]
    quantity: String,
    #[tabled(rename = "Price")]
    price: String,
    #[tabled(rename = "Value")]
    value: String,
    #[tabled(rename = "Weight")]
    weight: String,
    #[tabled(rename = "Owners")]
    owners: String,
}

#[derive(Tabled, Serialize)]
struct LotRow {
    #[tabled(rename = "Member")]
    member: String,
    #[tabled(rename = "Symbol")]
    symbol: String,
    #[tabled(rename = "Quantity")]
    quantity: String,
    #[tabled(rename = "Cost Basis")]
    cost_basis: String,
    #[tabled(rename = "Value")]
    value: String,
    #[tabled(rename = "Gain %")]
    gain_pct: String,
    #[tabled(rename = "Volatility")]
    volatility: String,
    #[tabled(rename = "Beta")]
    beta: String,
}

/// Execute the analyze command.
pub fn execute(args: AnalyzeArgs, ctx: &Context) -> Result<()> {
    let session = open_session(&args.portfolio, ctx)?;
    let portfolio = session.portfolio();

    match ctx.format {
        OutputFormat::Json => return print_json(portfolio),
        OutputFormat::Csv => return print_output(&holding_rows(portfolio), ctx.format),
        OutputFormat::Table => {}
    }

    let family = &portfolio.family;
    print_header(&format!("Family Portfolio ({})", family.email));
    let summary = vec![
        KeyValue::new("Total Value", format_amount(family.total_value)),
        KeyValue::new("Total Cost", format_amount(family.total_cost)),
        KeyValue::new("Total Gain", format_amount(family.total_gain)),
        KeyValue::new("Gain %", format_pct(family.total_gain_pct)),
        KeyValue::new("Members", family.member_count.to_string()),
        KeyValue::new("Unique Stocks", family.unique_stocks.to_string()),
        KeyValue::new("Overlapping Stocks", family.overlapping_stocks.to_string()),
        KeyValue::from_fraction("Expected Return", family.metrics.expected_return),
        KeyValue::from_fraction("Volatility", family.metrics.volatility),
        KeyValue::from_ratio("Sharpe Ratio", family.metrics.sharpe_ratio),
        KeyValue::from_ratio("Beta", family.metrics.beta),
        KeyValue::new(
            "Diversification",
            format!("{:.1} / 10", family.metrics.diversification_score),
        ),
        KeyValue::new("Risk Score", format!("{:.1} / 10", family.risk_score)),
    ];
    print_output(&summary, ctx.format)?;

    print_header("Members");
    let members: Vec<MemberRow> = portfolio
        .members
        .iter()
        .map(|m| MemberRow {
            name: m.name.clone(),
            value: format_amount(m.value),
            gain: format_amount(m.gain),
            gain_pct: format_pct(m.gain_pct),
            lots: m.holdings_count,
            volatility: format_fraction(m.metrics.volatility),
            sharpe: format!("{:.3}", m.metrics.sharpe_ratio),
            diversification: format!("{:.1}", m.metrics.diversification_score),
        })
        .collect();
    print_output(&members, ctx.format)?;

    print_header("Family Holdings");
    print_output(&holding_rows(portfolio), ctx.format)?;

    if args.lots {
        print_header("Lots");
        let lots: Vec<LotRow> = portfolio
            .members
            .iter()
            .flat_map(|m| {
                m.holdings.iter().map(move |h| LotRow {
                    member: m.name.clone(),
                    symbol: h.symbol.clone(),
                    quantity: h.quantity.to_string(),
                    cost_basis: format_amount(h.cost_basis),
                    value: if h.price_resolved {
                        format_amount(h.value)
                    } else {
                        "no price".to_string()
                    },
                    gain_pct: format_pct(h.gain_pct),
                    volatility: format_fraction(h.metrics.volatility),
                    beta: format!("{:.2}", h.metrics.beta),
                })
            })
            .collect();
        print_output(&lots, ctx.format)?;
    }

    if !portfolio.overlaps.is_empty() && !ctx.quiet {
        print_header("Overlaps");
        for (symbol, owners) in &portfolio.overlaps {
            println!("  {symbol}: {}", owners.join(", "));
        }
    }

    Ok(())
}

fn holding_rows(portfolio: &FamilyPortfolio) -> Vec<HoldingRow> {
    let mut holdings: Vec<_> = portfolio.family_holdings.values().collect();
    holdings.sort_by(|a, b| b.weight.total_cmp(&a.weight));
    holdings
        .into_iter()
        .map(|h| HoldingRow {
            symbol: h.symbol.clone(),
            quantity: h.quantity.to_string(),
            price: format_amount(h.current_price),
            value: format_amount(h.value),
            weight: format_fraction(h.weight),
            owners: h.owners.join(", "),
        })
        .collect()
}
