//! Ordered-join combination strategy.

use chrono::NaiveDate;

use crate::data::PriceSource;
use crate::types::{PortfolioTable, PriceSeries};
use crate::Result;

use super::{CombineStrategy, JoinPolicy};

/// Positional join: start from an empty table indexed by the requested
/// dates, then align each ticker's series onto the accumulating table in
/// input order, adding one column per ticker.
#[derive(Debug, Clone, Copy, Default)]
pub struct OrderedJoin;

impl CombineStrategy for OrderedJoin {
    fn name(&self) -> &'static str {
        "join"
    }

    fn combine(
        &self,
        source: &dyn PriceSource,
        symbols: &[&str],
        dates: &[NaiveDate],
        policy: JoinPolicy,
    ) -> Result<PortfolioTable> {
        let mut table = PortfolioTable::empty(dates.to_vec());
        for symbol in symbols {
            let series = source.load(symbol)?;
            table = join_one(&table, &series, policy);
        }
        Ok(table)
    }
}

/// Align one series onto the accumulating table under `policy`.
///
/// Alignment is decided by index membership, not value presence: a date
/// whose price is missing still participates in inner and outer joins.
fn join_one(left: &PortfolioTable, series: &PriceSeries, policy: JoinPolicy) -> PortfolioTable {
    let index: Vec<NaiveDate> = match policy {
        JoinPolicy::Left => left.dates().to_vec(),
        JoinPolicy::Right => series.dates().to_vec(),
        JoinPolicy::Inner => left
            .dates()
            .iter()
            .copied()
            .filter(|date| series.contains(*date))
            .collect(),
        JoinPolicy::Outer => sorted_union(left.dates(), series.dates()),
    };

    let (_, width) = left.shape();
    let mut columns = Vec::with_capacity(width + 1);
    for col in 0..width {
        let cells = index
            .iter()
            .map(|date| left.date_index(*date).and_then(|row| left.column_at(col)[row]))
            .collect();
        columns.push(cells);
    }
    columns.push(index.iter().map(|date| series.value_on(*date)).collect());

    let mut symbols = left.symbols().to_vec();
    symbols.push(series.symbol().to_string());

    PortfolioTable::from_columns(index, symbols, columns)
}

/// Merge two ascending date slices into their sorted, deduplicated union.
fn sorted_union(a: &[NaiveDate], b: &[NaiveDate]) -> Vec<NaiveDate> {
    let mut union = Vec::with_capacity(a.len() + b.len());
    let (mut i, mut j) = (0, 0);

    while i < a.len() && j < b.len() {
        if a[i] < b[j] {
            union.push(a[i]);
            i += 1;
        } else if b[j] < a[i] {
            union.push(b[j]);
            j += 1;
        } else {
            union.push(a[i]);
            i += 1;
            j += 1;
        }
    }
    union.extend_from_slice(&a[i..]);
    union.extend_from_slice(&b[j..]);
    union
}
