//! Column-concatenation combination strategy.

use std::collections::BTreeSet;

use chrono::NaiveDate;

use crate::data::PriceSource;
use crate::types::{PortfolioTable, PriceSeries};
use crate::{Error, Result};

use super::{CombineStrategy, JoinPolicy};

/// Axis-wise concatenation: load every series up front, combine them
/// side-by-side over the union (`outer`) or intersection (`inner`) of their
/// indexes, then reindex rows to exactly the requested dates. Dates outside
/// the combined index come back as missing rows.
///
/// `left` and `right` have no meaning for a symmetric concatenation and are
/// rejected as invalid arguments.
#[derive(Debug, Clone, Copy, Default)]
pub struct ColumnConcat;

impl CombineStrategy for ColumnConcat {
    fn name(&self) -> &'static str {
        "concat"
    }

    fn combine(
        &self,
        source: &dyn PriceSource,
        symbols: &[&str],
        dates: &[NaiveDate],
        policy: JoinPolicy,
    ) -> Result<PortfolioTable> {
        match policy {
            JoinPolicy::Inner | JoinPolicy::Outer => {}
            other => {
                return Err(Error::InvalidArgument(format!(
                    "concatenation accepts inner or outer, got {other}"
                )))
            }
        }
        if symbols.is_empty() {
            return Err(Error::InvalidArgument(
                "no series to concatenate".to_string(),
            ));
        }

        let series: Vec<PriceSeries> = symbols
            .iter()
            .map(|symbol| source.load(symbol))
            .collect::<Result<_>>()?;

        let combined: Vec<NaiveDate> = match policy {
            JoinPolicy::Outer => {
                let union: BTreeSet<NaiveDate> = series
                    .iter()
                    .flat_map(|s| s.dates().iter().copied())
                    .collect();
                union.into_iter().collect()
            }
            _ => series[0]
                .dates()
                .iter()
                .copied()
                .filter(|date| series[1..].iter().all(|s| s.contains(*date)))
                .collect(),
        };

        // Reindex the combined table to the requested dates: rows outside the
        // combined index become missing
        let columns = series
            .iter()
            .map(|s| {
                dates
                    .iter()
                    .map(|date| {
                        if combined.binary_search(date).is_ok() {
                            s.value_on(*date)
                        } else {
                            None
                        }
                    })
                    .collect()
            })
            .collect();

        Ok(PortfolioTable::from_columns(
            dates.to_vec(),
            symbols.iter().map(|s| s.to_string()).collect(),
            columns,
        ))
    }
}
