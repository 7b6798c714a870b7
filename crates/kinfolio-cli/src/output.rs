//! Output formatting utilities.

use colored::Colorize;
use kinfolio_portfolio::Outcome;
use rust_decimal::Decimal;
use serde::Serialize;
use tabled::{
    settings::{object::Columns, Alignment, Modify, Style},
    Table, Tabled,
};

use crate::cli::OutputFormat;

/// Formats and prints rows based on the specified format.
pub fn print_output<T: Serialize + Tabled>(data: &[T], format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Table => print_table(data),
        OutputFormat::Json => print_json(data),
        OutputFormat::Csv => print_csv(data),
    }
}

/// Prints any serializable value as pretty JSON.
pub fn print_json<T: Serialize + ?Sized>(data: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(data)?);
    Ok(())
}

/// Prints data as a formatted table.
fn print_table<T: Tabled>(data: &[T]) -> anyhow::Result<()> {
    if data.is_empty() {
        println!("No results.");
        return Ok(());
    }

    let table = Table::new(data)
        .with(Style::rounded())
        .with(Modify::new(Columns::first()).with(Alignment::left()))
        .to_string();

    println!("{}", table);
    Ok(())
}

/// Prints data as CSV.
fn print_csv<T: Serialize>(data: &[T]) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_writer(std::io::stdout());
    for item in data {
        wtr.serialize(item)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Returns the ready value, or prints why there is none.
pub fn ready_or_warn<'a, T>(outcome: &'a Outcome<T>, what: &str) -> Option<&'a T> {
    match outcome {
        Outcome::Ready { value } => Some(value),
        Outcome::Unavailable { reason } => {
            print_warning(&format!("{what} unavailable: {reason}"));
            None
        }
        Outcome::Failed { reason } => {
            print_error(&format!("{what} failed: {reason}"));
            None
        }
    }
}

/// Formats a fraction as a percentage.
pub fn format_fraction(value: f64) -> String {
    format!("{:.2}%", value * 100.0)
}

/// Formats a value already in percent.
pub fn format_pct(value: f64) -> String {
    format!("{value:.2}%")
}

/// Formats an amount with two decimals.
pub fn format_amount(value: Decimal) -> String {
    format!("{:.2}", value.round_dp(2))
}

/// Colors a signed change green or red.
pub fn format_change(value: f64, text: String) -> String {
    if value > 0.0 {
        text.green().to_string()
    } else if value < 0.0 {
        text.red().to_string()
    } else {
        text
    }
}

/// Prints a success message.
pub fn print_success(message: &str) {
    println!("{} {}", "✓".green(), message);
}

/// Prints an error message.
pub fn print_error(message: &str) {
    eprintln!("{} {}", "✗".red(), message);
}

/// Prints a warning message.
pub fn print_warning(message: &str) {
    eprintln!("{} {}", "⚠".yellow(), message);
}

/// Prints an info message.
pub fn print_info(message: &str) {
    println!("{} {}", "ℹ".blue(), message);
}

/// A key-value pair for display.
#[derive(Debug, Clone, Serialize, Tabled)]
pub struct KeyValue {
    #[tabled(rename = "Metric")]
    pub key: String,
    #[tabled(rename = "Value")]
    pub value: String,
}

impl KeyValue {
    /// Creates a new key-value pair.
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    /// A ratio with four decimals.
    pub fn from_ratio(key: impl Into<String>, value: f64) -> Self {
        Self::new(key, format!("{value:.4}"))
    }

    /// A fraction shown as a percentage.
    pub fn from_fraction(key: impl Into<String>, value: f64) -> Self {
        Self::new(key, format_fraction(value))
    }
}

/// Prints a header for a section.
pub fn print_header(title: &str) {
    println!("\n{}", title.bold().underline());
}
