//! Core data types for portfolio construction.

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// One ticker's adjusted-close price history, indexed by calendar date.
///
/// Dates are kept sorted ascending and unique. A `None` cell means the price
/// is missing on that date, which is distinct from a price of zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceSeries {
    /// Ticker symbol this series belongs to
    symbol: String,
    /// Calendar dates, ascending
    dates: Vec<NaiveDate>,
    /// Adjusted-close price per date, `None` when missing
    values: Vec<Option<f64>>,
}

impl PriceSeries {
    /// Create a series from (date, price) points, sorting ascending by date.
    pub fn new(symbol: &str, points: Vec<(NaiveDate, Option<f64>)>) -> Self {
        let mut points = points;
        points.sort_by_key(|(date, _)| *date);

        let (dates, values) = points.into_iter().unzip();
        Self {
            symbol: symbol.to_string(),
            dates,
            values,
        }
    }

    /// The ticker symbol this series is named after.
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// Number of dates in the series.
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    /// Whether the series has no dates at all.
    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// The date index, ascending.
    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    /// Whether `date` is part of the index (even if its price is missing).
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.dates.binary_search(&date).is_ok()
    }

    /// Price on `date`, `None` when the date is absent or the price missing.
    pub fn value_on(&self, date: NaiveDate) -> Option<f64> {
        self.dates
            .binary_search(&date)
            .ok()
            .and_then(|i| self.values[i])
    }

    /// Iterate over (date, price) pairs in ascending date order.
    pub fn iter(&self) -> impl Iterator<Item = (NaiveDate, Option<f64>)> + '_ {
        self.dates.iter().copied().zip(self.values.iter().copied())
    }
}

/// A date-indexed wide table with one column per ticker.
///
/// Rows follow the date index (ascending), columns follow the ticker order
/// the table was built with. Cells are `Option<f64>` so missing prices and
/// undefined returns stay distinguishable from zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioTable {
    /// Row index: calendar dates, ascending
    dates: Vec<NaiveDate>,
    /// Column labels in input ticker order
    symbols: Vec<String>,
    /// Cell data, one inner vector per column, aligned with `dates`
    columns: Vec<Vec<Option<f64>>>,
}

impl PortfolioTable {
    /// Create a table with a date index and no columns yet.
    pub fn empty(dates: Vec<NaiveDate>) -> Self {
        Self {
            dates,
            symbols: Vec::new(),
            columns: Vec::new(),
        }
    }

    /// Create a table from a date index and per-symbol columns.
    pub fn from_columns(
        dates: Vec<NaiveDate>,
        symbols: Vec<String>,
        columns: Vec<Vec<Option<f64>>>,
    ) -> Self {
        debug_assert_eq!(symbols.len(), columns.len());
        debug_assert!(columns.iter().all(|c| c.len() == dates.len()));
        Self {
            dates,
            symbols,
            columns,
        }
    }

    /// (rows, columns) shape of the table.
    pub fn shape(&self) -> (usize, usize) {
        (self.dates.len(), self.columns.len())
    }

    /// The row index, ascending.
    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    /// Column labels in input ticker order.
    pub fn symbols(&self) -> &[String] {
        &self.symbols
    }

    /// All columns in label order.
    pub fn columns(&self) -> &[Vec<Option<f64>>] {
        &self.columns
    }

    /// Column cells by position.
    pub fn column_at(&self, index: usize) -> &[Option<f64>] {
        &self.columns[index]
    }

    /// Column cells by ticker symbol.
    pub fn column(&self, symbol: &str) -> Option<&[Option<f64>]> {
        self.symbols
            .iter()
            .position(|s| s == symbol)
            .map(|i| self.columns[i].as_slice())
    }

    /// Row position of `date` in the index, if present.
    pub fn date_index(&self, date: NaiveDate) -> Option<usize> {
        self.dates.binary_search(&date).ok()
    }

    /// Cell value for (date, symbol), `None` when absent or missing.
    pub fn value(&self, date: NaiveDate, symbol: &str) -> Option<f64> {
        let row = self.date_index(date)?;
        self.column(symbol)?[row]
    }

    /// One row of cells in column order.
    pub fn row(&self, index: usize) -> Vec<Option<f64>> {
        self.columns.iter().map(|c| c[index]).collect()
    }
}

/// Build an inclusive range of consecutive calendar days.
///
/// Returns an empty range when `start > end`.
///
/// # Example
///
/// ```rust
/// use chrono::NaiveDate;
/// use folio_core::types::date_range;
///
/// let start = NaiveDate::from_ymd_opt(2020, 3, 31).unwrap();
/// let end = NaiveDate::from_ymd_opt(2020, 4, 3).unwrap();
/// assert_eq!(date_range(start, end).len(), 4);
/// ```
pub fn date_range(start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
    if start > end {
        return Vec::new();
    }

    let days = (end - start).num_days() as usize;
    let mut dates = Vec::with_capacity(days + 1);
    let mut current = start;
    while current <= end {
        dates.push(current);
        current += Duration::days(1);
    }
    dates
}

/// Parse a `YYYY-MM-DD` calendar date.
pub fn parse_date(input: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .map_err(|_| Error::InvalidArgument(format!("cannot parse date: {input:?}")))
}
