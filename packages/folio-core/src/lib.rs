//! Folio Core - Portfolio construction and return analytics.
//!
//! This crate builds small stock portfolios from local CSV price histories:
//!
//! - **Series loading**: one date-indexed adjusted-close series per ticker
//! - **Table combination**: three equivalent strategies (ordered join,
//!   key merge, column concat) under relational null policies
//! - **Return analytics**: daily returns, compounded cumulative returns,
//!   rolling volatility
//! - **Ranking and sampling**: top/bottom performers, seeded ticker subsets
//!
//! # Example
//!
//! ```rust,no_run
//! use chrono::NaiveDate;
//! use folio_core::combine::{portfolio_join, JoinPolicy};
//! use folio_core::data::CsvPriceSource;
//! use folio_core::ranking::top_bottom_tickers;
//! use folio_core::returns::cumulative_returns;
//! use folio_core::types::date_range;
//!
//! let source = CsvPriceSource::new("data");
//! let dates = date_range(
//!     NaiveDate::from_ymd_opt(2020, 3, 31).unwrap(),
//!     NaiveDate::from_ymd_opt(2020, 7, 29).unwrap(),
//! );
//!
//! let table = portfolio_join(&source, &["GOOG", "AAPL"], &dates, JoinPolicy::Left).unwrap();
//! let cum = cumulative_returns(&table);
//! let (top, bottom) = top_bottom_tickers(&cum, 3);
//! println!("top: {top:?}, bottom: {bottom:?}");
//! ```

pub mod combine;
pub mod data;
pub mod ranking;
pub mod returns;
pub mod sampling;
pub mod types;

// Re-export commonly used types
pub use types::{date_range, parse_date, PortfolioTable, PriceSeries};

// Re-export main functionality
pub use combine::{
    get_strategy, portfolio_concat, portfolio_join, portfolio_merge, ColumnConcat,
    CombineStrategy, JoinPolicy, KeyMerge, OrderedJoin,
};
pub use data::{symbol_to_path, write_portfolio_csv, CsvPriceSource, PriceSource};
pub use ranking::top_bottom_tickers;
pub use returns::{cumulative_returns, daily_returns, rolling_volatility};
pub use sampling::{random_end_date, random_subset, DEFAULT_MAX_DAYS, DEFAULT_MIN_DAYS};

/// Error types for folio-core operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Ticker not found: {0}")]
    TickerNotFound(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Invalid data: {0}")]
    InvalidData(String),
}

/// Result type for folio-core operations.
pub type Result<T> = std::result::Result<T, Error>;
