//! Daily return series and the symbol × date return table.
//!
//! Closes arrive as long-form rows; they are grouped per symbol, sorted,
//! deduplicated by date and turned into simple daily returns. The table keeps
//! missing cells explicit so each consumer can pick its own convention:
//! zero-filled for portfolio returns and covariance, pairwise-complete for
//! correlation.

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use kinfolio_traits::{BenchmarkClose, DailyClose};

/// A dated daily return.
pub type DatedReturn = (NaiveDate, f64);

/// Simple returns `p[t] / p[t-1] − 1` of a close series.
///
/// Pairs with a non-positive previous close are skipped.
#[must_use]
pub fn daily_returns(closes: &[f64]) -> Vec<f64> {
    closes
        .windows(2)
        .filter(|w| w[0] > 0.0)
        .map(|w| w[1] / w[0] - 1.0)
        .collect()
}

fn dated_returns(mut closes: Vec<(NaiveDate, f64)>) -> Vec<DatedReturn> {
    closes.sort_by_key(|(date, _)| *date);
    // keep the last close seen for a date
    let mut deduped: Vec<(NaiveDate, f64)> = Vec::with_capacity(closes.len());
    for (date, close) in closes {
        match deduped.last_mut() {
            Some(last) if last.0 == date => last.1 = close,
            _ => deduped.push((date, close)),
        }
    }

    deduped
        .windows(2)
        .filter(|w| w[0].1 > 0.0)
        .map(|w| (w[1].0, w[1].1 / w[0].1 - 1.0))
        .collect()
}

/// Daily returns of the market benchmark.
#[must_use]
pub fn benchmark_returns(closes: &[BenchmarkClose]) -> Vec<DatedReturn> {
    dated_returns(closes.iter().map(|c| (c.date, c.close)).collect())
}

/// Daily returns pivoted into a symbol × date table.
///
/// Rows are the union of every symbol's return dates; a cell is `None` when
/// that symbol has no return on that date.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReturnTable {
    symbols: Vec<String>,
    dates: Vec<NaiveDate>,
    // cells[symbol][date]
    cells: Vec<Vec<Option<f64>>>,
}

impl ReturnTable {
    /// Builds the table from long-form close rows.
    ///
    /// Symbols with fewer than two distinct closes contribute no column.
    #[must_use]
    pub fn from_closes(rows: &[DailyClose]) -> Self {
        let mut grouped: BTreeMap<&str, Vec<(NaiveDate, f64)>> = BTreeMap::new();
        for row in rows {
            grouped
                .entry(row.symbol.as_str())
                .or_default()
                .push((row.date, row.close));
        }

        let series: BTreeMap<String, Vec<DatedReturn>> = grouped
            .into_iter()
            .map(|(symbol, closes)| (symbol.to_string(), dated_returns(closes)))
            .filter(|(_, returns)| !returns.is_empty())
            .collect();

        Self::from_series(series)
    }

    fn from_series(series: BTreeMap<String, Vec<DatedReturn>>) -> Self {
        let dates: Vec<NaiveDate> = series
            .values()
            .flat_map(|returns| returns.iter().map(|(date, _)| *date))
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let index: BTreeMap<NaiveDate, usize> =
            dates.iter().enumerate().map(|(i, d)| (*d, i)).collect();

        let mut symbols = Vec::with_capacity(series.len());
        let mut cells = Vec::with_capacity(series.len());
        for (symbol, returns) in series {
            let mut column = vec![None; dates.len()];
            for (date, r) in returns {
                column[index[&date]] = Some(r);
            }
            symbols.push(symbol);
            cells.push(column);
        }

        Self {
            symbols,
            dates,
            cells,
        }
    }

    /// Symbols with at least one return, sorted.
    #[must_use]
    pub fn symbols(&self) -> &[String] {
        &self.symbols
    }

    /// Union of return dates, ascending.
    #[must_use]
    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    /// True when no symbol has any return.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// True when `symbol` has a column.
    #[must_use]
    pub fn contains(&self, symbol: &str) -> bool {
        self.position(symbol).is_some()
    }

    fn position(&self, symbol: &str) -> Option<usize> {
        self.symbols.binary_search_by(|s| s.as_str().cmp(symbol)).ok()
    }

    /// Non-missing returns of one symbol, by date. Empty when unknown.
    #[must_use]
    pub fn column(&self, symbol: &str) -> Vec<DatedReturn> {
        self.position(symbol)
            .map(|i| {
                self.dates
                    .iter()
                    .zip(&self.cells[i])
                    .filter_map(|(date, cell)| cell.map(|r| (*date, r)))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// One symbol's column over every table date, missing cells as 0.
    #[must_use]
    pub fn filled_column(&self, symbol: &str) -> Option<Vec<f64>> {
        self.position(symbol)
            .map(|i| self.cells[i].iter().map(|c| c.unwrap_or(0.0)).collect())
    }

    /// Returns on dates where both symbols have a value.
    #[must_use]
    pub fn pairwise(&self, a: &str, b: &str) -> (Vec<f64>, Vec<f64>) {
        match (self.position(a), self.position(b)) {
            (Some(i), Some(j)) => self.cells[i]
                .iter()
                .zip(&self.cells[j])
                .filter_map(|(x, y)| Some(((*x)?, (*y)?)))
                .unzip(),
            _ => (Vec::new(), Vec::new()),
        }
    }

    /// Sub-table of the requested symbols that have data; dates are re-unioned.
    #[must_use]
    pub fn restrict(&self, symbols: &[String]) -> Self {
        let series = symbols
            .iter()
            .filter(|s| self.contains(s))
            .map(|s| (s.clone(), self.column(s)))
            .collect();
        Self::from_series(series)
    }

    /// Weighted portfolio return per table date, missing cells as 0.
    ///
    /// Symbols without a column are ignored; weights are used as given.
    #[must_use]
    pub fn weighted_returns(&self, weights: &[(String, f64)]) -> Vec<DatedReturn> {
        let resolved: Vec<(usize, f64)> = weights
            .iter()
            .filter_map(|(symbol, w)| self.position(symbol).map(|i| (i, *w)))
            .collect();

        self.dates
            .iter()
            .enumerate()
            .map(|(t, date)| {
                let r = resolved
                    .iter()
                    .map(|(i, w)| w * self.cells[*i][t].unwrap_or(0.0))
                    .sum();
                (*date, r)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    fn close(symbol: &str, d: u32, close: f64) -> DailyClose {
        DailyClose::new(symbol, day(d), close)
    }

    #[test]
    fn test_daily_returns() {
        let r = daily_returns(&[100.0, 110.0, 99.0]);
        assert_eq!(r.len(), 2);
        assert_relative_eq!(r[0], 0.1, epsilon = 1e-12);
        assert_relative_eq!(r[1], -0.1, epsilon = 1e-12);
        assert!(daily_returns(&[100.0]).is_empty());
    }

    #[test]
    fn test_table_unions_dates_and_keeps_gaps() {
        let rows = vec![
            close("A", 3, 110.0),
            close("A", 1, 100.0),
            close("A", 2, 100.0),
            close("B", 2, 50.0),
            close("B", 3, 55.0),
            close("C", 1, 10.0),
        ];
        let table = ReturnTable::from_closes(&rows);

        assert_eq!(table.symbols(), &["A".to_string(), "B".to_string()]);
        assert_eq!(table.dates(), &[day(2), day(3)]);
        assert!(!table.contains("C"));

        let b = table.column("B");
        assert_eq!(b.len(), 1);
        assert_relative_eq!(b[0].1, 0.1, epsilon = 1e-12);
        assert_eq!(table.filled_column("B").unwrap()[0], 0.0);
    }

    #[test]
    fn test_duplicate_dates_keep_last_close() {
        let rows = vec![
            close("A", 1, 100.0),
            close("A", 1, 200.0),
            close("A", 2, 220.0),
        ];
        let table = ReturnTable::from_closes(&rows);
        let a = table.column("A");
        assert_eq!(a.len(), 1);
        assert_relative_eq!(a[0].1, 0.1, epsilon = 1e-12);
    }

    #[test]
    fn test_weighted_returns_and_pairwise() {
        let rows = vec![
            close("A", 1, 100.0),
            close("A", 2, 110.0),
            close("A", 3, 121.0),
            close("B", 2, 100.0),
            close("B", 3, 90.0),
        ];
        let table = ReturnTable::from_closes(&rows);

        let weighted = table.weighted_returns(&[("A".into(), 0.5), ("B".into(), 0.5)]);
        assert_eq!(weighted.len(), 2);
        assert_relative_eq!(weighted[0].1, 0.05, epsilon = 1e-12);
        assert_relative_eq!(weighted[1].1, 0.0, epsilon = 1e-12);

        let (a, b) = table.pairwise("A", "B");
        assert_eq!(a.len(), 1);
        assert_eq!(b.len(), 1);

        let restricted = table.restrict(&["B".into(), "Z".into()]);
        assert_eq!(restricted.symbols(), &["B".to_string()]);
        assert_eq!(restricted.dates(), &[day(3)]);
    }
}
