//! Price series loading from local CSV files, and flat tabular export.
//!
//! One file per ticker, located by convention at `<data_dir>/<ticker>.csv`.
//! Files carry a header row with at least a `Date` and an `Adj Close` column;
//! any other columns are ignored. The `nan` token marks a missing price.

use std::env;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::types::{PortfolioTable, PriceSeries};
use crate::{Error, Result};

/// Environment variable overriding the default data directory.
pub const DATA_DIR_ENV: &str = "FOLIO_DATA_DIR";

/// Missing-value token recognized in price cells.
const NA_TOKEN: &str = "nan";

/// Source of per-ticker price series.
///
/// The seam between loading and table combination: combiners only see this
/// trait, so tests and callers can substitute in-memory series.
pub trait PriceSource {
    /// Load one ticker's price series.
    ///
    /// Fails with [`Error::TickerNotFound`] when the ticker has no backing
    /// data; the error propagates to the caller unmodified.
    fn load(&self, symbol: &str) -> Result<PriceSeries>;
}

/// Return `<base_dir>/<symbol>.csv` (no existence check).
pub fn symbol_to_path(symbol: &str, base_dir: &Path) -> PathBuf {
    base_dir.join(format!("{symbol}.csv"))
}

/// Raw CSV row as it appears in the backing files.
#[derive(Debug, Deserialize)]
struct RawPriceRow {
    #[serde(rename = "Date")]
    date: String,
    #[serde(rename = "Adj Close")]
    adj_close: String,
}

impl RawPriceRow {
    /// Convert to a (date, price) point, mapping the NA token to `None`.
    fn to_point(&self) -> Result<(chrono::NaiveDate, Option<f64>)> {
        let date = chrono::NaiveDate::parse_from_str(&self.date, "%Y-%m-%d")
            .map_err(|_| Error::InvalidData(format!("bad date cell: {:?}", self.date)))?;

        let cell = self.adj_close.trim();
        let price = if cell.is_empty() || cell.eq_ignore_ascii_case(NA_TOKEN) {
            None
        } else {
            Some(
                cell.parse::<f64>()
                    .map_err(|_| Error::InvalidData(format!("bad price cell: {cell:?}")))?,
            )
        };

        Ok((date, price))
    }
}

/// File-backed price source reading `<data_dir>/<ticker>.csv`.
///
/// Performs one blocking read per load call with no cache; repeated loads of
/// the same ticker re-read the file.
#[derive(Debug, Clone)]
pub struct CsvPriceSource {
    /// Directory holding one CSV file per ticker
    data_dir: PathBuf,
}

impl CsvPriceSource {
    /// Create a source reading from the given data directory.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Create a source reading from [`default_data_dir`].
    pub fn with_default_dir() -> Self {
        Self::new(default_data_dir())
    }

    /// The directory this source reads from.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}

impl PriceSource for CsvPriceSource {
    fn load(&self, symbol: &str) -> Result<PriceSeries> {
        let path = symbol_to_path(symbol, &self.data_dir);
        if !path.exists() {
            return Err(Error::TickerNotFound(symbol.to_string()));
        }

        let mut reader = csv::Reader::from_path(&path)?;
        let mut points = Vec::new();
        for row in reader.deserialize() {
            let raw: RawPriceRow = row?;
            points.push(raw.to_point()?);
        }

        // Files may be stored ascending or descending; the series sorts by value
        Ok(PriceSeries::new(symbol, points))
    }
}

/// Get the default data directory.
///
/// Default: `~/.folio/data`. Can be overridden with the `FOLIO_DATA_DIR`
/// environment variable; falls back to a relative `data` directory when no
/// home directory is available.
pub fn default_data_dir() -> PathBuf {
    if let Ok(dir) = env::var(DATA_DIR_ENV) {
        return PathBuf::from(dir);
    }

    directories::BaseDirs::new()
        .map(|dirs| dirs.home_dir().join(".folio/data"))
        .unwrap_or_else(|| PathBuf::from("data"))
}

/// Write a portfolio table as a flat delimited file.
///
/// Layout mirrors the backing files: a `Date` column followed by one column
/// per ticker, with missing cells written as the `nan` token so exported
/// tables round-trip through the same NA convention.
pub fn write_portfolio_csv(table: &PortfolioTable, path: &Path) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;

    let mut header = Vec::with_capacity(table.symbols().len() + 1);
    header.push("Date".to_string());
    header.extend(table.symbols().iter().cloned());
    writer.write_record(&header)?;

    for (row, date) in table.dates().iter().enumerate() {
        let mut record = Vec::with_capacity(header.len());
        record.push(date.format("%Y-%m-%d").to_string());
        for cell in table.row(row) {
            record.push(match cell {
                Some(value) => value.to_string(),
                None => NA_TOKEN.to_string(),
            });
        }
        writer.write_record(&record)?;
    }

    writer.flush()?;
    Ok(())
}
