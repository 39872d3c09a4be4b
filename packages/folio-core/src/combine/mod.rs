//! Portfolio table combination.
//!
//! Three interchangeable strategies build the same date-by-ticker table from
//! per-ticker price series:
//!
//! - [`OrderedJoin`]: successive positional alignment onto the accumulating table
//! - [`KeyMerge`]: explicit relational join on the date key
//! - [`ColumnConcat`]: side-by-side concatenation followed by a reindex
//!
//! On clean, fully-populated data the three produce identical tables under
//! equivalent null policies; that equivalence is a contract, not a
//! coincidence.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::data::PriceSource;
use crate::types::PortfolioTable;
use crate::{Error, Result};

mod concat;
mod join;
mod merge;

pub use concat::ColumnConcat;
pub use join::OrderedJoin;
pub use merge::KeyMerge;

/// Null-handling policy: the relational join discipline governing which
/// dates survive when combining two date-indexed series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JoinPolicy {
    /// Keep all dates of the accumulating table; unmatched rows become missing
    Left,
    /// Mirror of `Left`: adopt the incoming series' dates
    Right,
    /// Keep only dates present on both sides
    Inner,
    /// Keep the union of both sides' dates
    Outer,
}

impl JoinPolicy {
    /// The lowercase policy token.
    pub fn as_str(&self) -> &'static str {
        match self {
            JoinPolicy::Left => "left",
            JoinPolicy::Right => "right",
            JoinPolicy::Inner => "inner",
            JoinPolicy::Outer => "outer",
        }
    }
}

impl fmt::Display for JoinPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for JoinPolicy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "left" => Ok(JoinPolicy::Left),
            "right" => Ok(JoinPolicy::Right),
            "inner" => Ok(JoinPolicy::Inner),
            "outer" => Ok(JoinPolicy::Outer),
            other => Err(Error::InvalidArgument(format!(
                "null policy must be one of left, right, inner, outer; got {other:?}"
            ))),
        }
    }
}

/// A way of combining per-ticker series into one portfolio table.
///
/// All implementations share one contract: given the same source, tickers,
/// dates, and policy, clean data yields the same table regardless of which
/// strategy built it. Column order always follows ticker input order, and a
/// missing ticker propagates [`Error::TickerNotFound`] without retry.
pub trait CombineStrategy {
    /// Short identifier for the strategy.
    fn name(&self) -> &'static str;

    /// Build a portfolio table for `symbols` aligned to `dates` under `policy`.
    fn combine(
        &self,
        source: &dyn PriceSource,
        symbols: &[&str],
        dates: &[NaiveDate],
        policy: JoinPolicy,
    ) -> Result<PortfolioTable>;
}

/// Get a combination strategy by name (`join`, `merge`, or `concat`).
pub fn get_strategy(name: &str) -> Option<Box<dyn CombineStrategy>> {
    match name.to_lowercase().as_str() {
        "join" => Some(Box::new(OrderedJoin)),
        "merge" => Some(Box::new(KeyMerge)),
        "concat" => Some(Box::new(ColumnConcat)),
        _ => None,
    }
}

/// Build a portfolio table with the ordered-join strategy.
pub fn portfolio_join(
    source: &dyn PriceSource,
    symbols: &[&str],
    dates: &[NaiveDate],
    policy: JoinPolicy,
) -> Result<PortfolioTable> {
    OrderedJoin.combine(source, symbols, dates, policy)
}

/// Build a portfolio table with the key-merge strategy.
pub fn portfolio_merge(
    source: &dyn PriceSource,
    symbols: &[&str],
    dates: &[NaiveDate],
    policy: JoinPolicy,
) -> Result<PortfolioTable> {
    KeyMerge.combine(source, symbols, dates, policy)
}

/// Build a portfolio table with the concatenation strategy.
pub fn portfolio_concat(
    source: &dyn PriceSource,
    symbols: &[&str],
    dates: &[NaiveDate],
    policy: JoinPolicy,
) -> Result<PortfolioTable> {
    ColumnConcat.combine(source, symbols, dates, policy)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{CsvPriceSource, PriceSource};
    use crate::types::{date_range, PriceSeries};
    use std::collections::HashMap;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    /// In-memory price source for combiner tests.
    struct MemorySource {
        series: HashMap<String, PriceSeries>,
    }

    impl MemorySource {
        fn new(series: Vec<PriceSeries>) -> Self {
            Self {
                series: series
                    .into_iter()
                    .map(|s| (s.symbol().to_string(), s))
                    .collect(),
            }
        }
    }

    impl PriceSource for MemorySource {
        fn load(&self, symbol: &str) -> Result<PriceSeries> {
            self.series
                .get(symbol)
                .cloned()
                .ok_or_else(|| Error::TickerNotFound(symbol.to_string()))
        }
    }

    fn series(symbol: &str, points: &[(NaiveDate, Option<f64>)]) -> PriceSeries {
        PriceSeries::new(symbol, points.to_vec())
    }

    /// Two tickers fully covering 2020-03-31..=2020-04-03, no gaps.
    fn clean_source() -> MemorySource {
        MemorySource::new(vec![
            series(
                "GOOG",
                &[
                    (d(2020, 3, 31), Some(58.074413)),
                    (d(2020, 4, 1), Some(55.218162)),
                    (d(2020, 4, 2), Some(56.034893)),
                    (d(2020, 4, 3), Some(54.737843)),
                ],
            ),
            series(
                "AAPL",
                &[
                    (d(2020, 3, 31), Some(62.511108)),
                    (d(2020, 4, 1), Some(59.181484),),
                    (d(2020, 4, 2), Some(60.346416)),
                    (d(2020, 4, 3), Some(59.458611)),
                ],
            ),
        ])
    }

    fn clean_dates() -> Vec<NaiveDate> {
        date_range(d(2020, 3, 31), d(2020, 4, 3))
    }

    #[test]
    fn test_policy_tokens_round_trip() {
        for token in ["left", "right", "inner", "outer"] {
            let policy: JoinPolicy = token.parse().unwrap();
            assert_eq!(policy.as_str(), token);
        }
    }

    #[test]
    fn test_policy_rejects_unknown_token() {
        let result = "cross".parse::<JoinPolicy>();
        assert!(matches!(result, Err(Error::InvalidArgument(_))));
    }

    #[test]
    fn test_get_strategy() {
        assert_eq!(get_strategy("join").unwrap().name(), "join");
        assert_eq!(get_strategy("MERGE").unwrap().name(), "merge");
        assert_eq!(get_strategy("concat").unwrap().name(), "concat");
        assert!(get_strategy("zip").is_none());
    }

    #[test]
    fn test_strategies_equivalent_on_clean_data() {
        let source = clean_source();
        let dates = clean_dates();
        let symbols = ["GOOG", "AAPL"];

        // With series exactly covering the requested range every policy
        // resolves to the same index, so all strategy/policy combinations
        // must agree cell for cell
        let reference = portfolio_join(&source, &symbols, &dates, JoinPolicy::Left).unwrap();
        assert_eq!(reference.shape(), (4, 2));

        for policy in [
            JoinPolicy::Left,
            JoinPolicy::Right,
            JoinPolicy::Inner,
            JoinPolicy::Outer,
        ] {
            assert_eq!(
                portfolio_join(&source, &symbols, &dates, policy).unwrap(),
                reference
            );
            assert_eq!(
                portfolio_merge(&source, &symbols, &dates, policy).unwrap(),
                reference
            );
        }
        for policy in [JoinPolicy::Inner, JoinPolicy::Outer] {
            assert_eq!(
                portfolio_concat(&source, &symbols, &dates, policy).unwrap(),
                reference
            );
        }
    }

    #[test]
    fn test_column_order_follows_input_order() {
        let source = clean_source();
        let dates = clean_dates();

        let table = portfolio_join(&source, &["AAPL", "GOOG"], &dates, JoinPolicy::Left).unwrap();
        assert_eq!(table.symbols(), &["AAPL".to_string(), "GOOG".to_string()]);
    }

    #[test]
    fn test_left_policy_keeps_requested_index() {
        // GOOG has no quote on 2020-04-02
        let source = MemorySource::new(vec![series(
            "GOOG",
            &[
                (d(2020, 3, 31), Some(58.0)),
                (d(2020, 4, 1), Some(55.0)),
                (d(2020, 4, 3), Some(54.0)),
            ],
        )]);
        let dates = clean_dates();

        for builder in [portfolio_join, portfolio_merge] {
            let table = builder(&source, &["GOOG"], &dates, JoinPolicy::Left).unwrap();
            assert_eq!(table.dates(), dates.as_slice());
            assert_eq!(table.value(d(2020, 4, 2), "GOOG"), None);
            assert_eq!(table.value(d(2020, 4, 3), "GOOG"), Some(54.0));
        }
    }

    #[test]
    fn test_inner_policy_intersects() {
        let source = MemorySource::new(vec![
            series(
                "GOOG",
                &[(d(2020, 3, 31), Some(58.0)), (d(2020, 4, 1), Some(55.0))],
            ),
            series(
                "AAPL",
                &[(d(2020, 4, 1), Some(59.0)), (d(2020, 4, 2), Some(60.0))],
            ),
        ]);
        let dates = clean_dates();

        for builder in [portfolio_join, portfolio_merge] {
            let table = builder(&source, &["GOOG", "AAPL"], &dates, JoinPolicy::Inner).unwrap();
            // Only 2020-04-01 is present in the requested range and both series
            assert_eq!(table.dates(), &[d(2020, 4, 1)]);
            assert_eq!(table.value(d(2020, 4, 1), "GOOG"), Some(55.0));
            assert_eq!(table.value(d(2020, 4, 1), "AAPL"), Some(59.0));
        }
    }

    #[test]
    fn test_inner_policy_keeps_dates_with_missing_prices() {
        // Index membership decides alignment even when the cell is missing
        let source = MemorySource::new(vec![series(
            "W",
            &[
                (d(2020, 3, 31), Some(10.0)),
                (d(2020, 4, 1), None),
                (d(2020, 4, 2), Some(12.0)),
                (d(2020, 4, 3), Some(12.5)),
            ],
        )]);
        let dates = clean_dates();

        for builder in [portfolio_join, portfolio_merge] {
            let table = builder(&source, &["W"], &dates, JoinPolicy::Inner).unwrap();
            assert_eq!(table.dates(), dates.as_slice());
            assert_eq!(table.value(d(2020, 4, 1), "W"), None);
        }
    }

    #[test]
    fn test_right_policy_adopts_series_index() {
        let source = MemorySource::new(vec![series(
            "GOOG",
            &[
                (d(2020, 3, 30), Some(57.0)),
                (d(2020, 3, 31), Some(58.0)),
                (d(2020, 4, 1), Some(55.0)),
            ],
        )]);
        let dates = clean_dates();

        let joined = portfolio_join(&source, &["GOOG"], &dates, JoinPolicy::Right).unwrap();
        let merged = portfolio_merge(&source, &["GOOG"], &dates, JoinPolicy::Right).unwrap();

        assert_eq!(joined, merged);
        assert_eq!(
            joined.dates(),
            &[d(2020, 3, 30), d(2020, 3, 31), d(2020, 4, 1)]
        );
    }

    #[test]
    fn test_outer_policy_unions() {
        let source = MemorySource::new(vec![series(
            "GOOG",
            &[(d(2020, 3, 30), Some(57.0)), (d(2020, 4, 1), Some(55.0))],
        )]);
        let dates = vec![d(2020, 3, 31), d(2020, 4, 1)];

        let joined = portfolio_join(&source, &["GOOG"], &dates, JoinPolicy::Outer).unwrap();
        let merged = portfolio_merge(&source, &["GOOG"], &dates, JoinPolicy::Outer).unwrap();

        assert_eq!(joined, merged);
        assert_eq!(
            joined.dates(),
            &[d(2020, 3, 30), d(2020, 3, 31), d(2020, 4, 1)]
        );
        assert_eq!(joined.value(d(2020, 3, 31), "GOOG"), None);
    }

    #[test]
    fn test_concat_reindexes_to_requested_dates() {
        // Series extends past the requested range and skips a date inside it
        let source = MemorySource::new(vec![series(
            "GOOG",
            &[
                (d(2020, 3, 31), Some(58.0)),
                (d(2020, 4, 1), Some(55.0)),
                (d(2020, 4, 3), Some(54.0)),
                (d(2020, 4, 6), Some(53.0)),
            ],
        )]);
        let dates = clean_dates();

        let table = portfolio_concat(&source, &["GOOG"], &dates, JoinPolicy::Outer).unwrap();
        assert_eq!(table.dates(), dates.as_slice());
        assert_eq!(table.value(d(2020, 4, 2), "GOOG"), None);
        assert_eq!(table.value(d(2020, 4, 3), "GOOG"), Some(54.0));
        // 2020-04-06 is outside the requested range and must not appear
        assert_eq!(table.shape(), (4, 1));
    }

    #[test]
    fn test_concat_inner_drops_uncommon_dates_before_reindex() {
        let source = MemorySource::new(vec![
            series(
                "GOOG",
                &[(d(2020, 3, 31), Some(58.0)), (d(2020, 4, 1), Some(55.0))],
            ),
            series(
                "AAPL",
                &[(d(2020, 4, 1), Some(59.0)), (d(2020, 4, 2), Some(60.0))],
            ),
        ]);
        let dates = clean_dates();

        let table =
            portfolio_concat(&source, &["GOOG", "AAPL"], &dates, JoinPolicy::Inner).unwrap();
        assert_eq!(table.dates(), dates.as_slice());
        // 2020-03-31 is in GOOG only: the inner concat dropped its row, so
        // even the GOOG cell is missing after the reindex
        assert_eq!(table.value(d(2020, 3, 31), "GOOG"), None);
        assert_eq!(table.value(d(2020, 4, 1), "GOOG"), Some(55.0));
        assert_eq!(table.value(d(2020, 4, 1), "AAPL"), Some(59.0));
    }

    #[test]
    fn test_concat_rejects_left_and_right() {
        let source = clean_source();
        let dates = clean_dates();

        for policy in [JoinPolicy::Left, JoinPolicy::Right] {
            let result = portfolio_concat(&source, &["GOOG"], &dates, policy);
            assert!(matches!(result, Err(Error::InvalidArgument(_))));
        }
    }

    #[test]
    fn test_concat_rejects_empty_symbol_list() {
        let source = clean_source();
        let dates = clean_dates();

        let result = portfolio_concat(&source, &[], &dates, JoinPolicy::Outer);
        assert!(matches!(result, Err(Error::InvalidArgument(_))));
    }

    #[test]
    fn test_join_with_no_symbols_keeps_index() {
        let source = clean_source();
        let dates = clean_dates();

        let table = portfolio_join(&source, &[], &dates, JoinPolicy::Left).unwrap();
        assert_eq!(table.shape(), (4, 0));
        assert_eq!(table.dates(), dates.as_slice());
    }

    #[test]
    fn test_missing_ticker_propagates() {
        let source = clean_source();
        let dates = clean_dates();

        for name in ["join", "merge", "concat"] {
            let strategy = get_strategy(name).unwrap();
            let result = strategy.combine(&source, &["GOOG", "NOPE"], &dates, JoinPolicy::Outer);
            assert!(matches!(result, Err(Error::TickerNotFound(ref s)) if s == "NOPE"));
        }
    }

    #[test]
    fn test_end_to_end_from_csv_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("GOOG.csv"),
            "Date,Adj Close\n\
             2020-03-31,58.074413\n\
             2020-04-01,55.218162\n\
             2020-04-02,56.034893\n\
             2020-04-03,54.737843\n",
        )
        .unwrap();
        std::fs::write(
            dir.path().join("AAPL.csv"),
            "Date,Adj Close\n\
             2020-03-31,62.511108\n\
             2020-04-01,59.181484\n\
             2020-04-02,60.346416\n\
             2020-04-03,59.458611\n",
        )
        .unwrap();

        let source = CsvPriceSource::new(dir.path());
        let dates = clean_dates();

        for name in ["join", "merge", "concat"] {
            let strategy = get_strategy(name).unwrap();
            let policy = if name == "concat" {
                JoinPolicy::Outer
            } else {
                JoinPolicy::Left
            };
            let table = strategy
                .combine(&source, &["GOOG", "AAPL"], &dates, policy)
                .unwrap();

            assert_eq!(table.shape(), (4, 2));
            let goog_0331 = table.value(d(2020, 3, 31), "GOOG").unwrap();
            let goog_0401 = table.value(d(2020, 4, 1), "GOOG").unwrap();
            assert!((goog_0331 - 58.074413).abs() < 1e-6);
            assert!((goog_0401 - 55.218162).abs() < 1e-6);
        }
    }
}
