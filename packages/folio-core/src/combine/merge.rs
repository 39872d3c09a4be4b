//! Key-merge combination strategy.

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;

use crate::data::PriceSource;
use crate::types::PortfolioTable;
use crate::Result;

use super::{CombineStrategy, JoinPolicy};

/// Relational join: the accumulating table is kept as rows keyed by date,
/// and each ticker is merged in by explicit key lookups rather than
/// positional alignment. Must produce the same output as [`super::OrderedJoin`]
/// for the same inputs and policy.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeyMerge;

impl CombineStrategy for KeyMerge {
    fn name(&self) -> &'static str {
        "merge"
    }

    fn combine(
        &self,
        source: &dyn PriceSource,
        symbols: &[&str],
        dates: &[NaiveDate],
        policy: JoinPolicy,
    ) -> Result<PortfolioTable> {
        let mut keys: Vec<NaiveDate> = dates.to_vec();
        let mut rows: BTreeMap<NaiveDate, Vec<Option<f64>>> =
            keys.iter().map(|date| (*date, Vec::new())).collect();

        for (width, symbol) in symbols.iter().enumerate() {
            let series = source.load(symbol)?;
            let right: BTreeMap<NaiveDate, Option<f64>> = series.iter().collect();

            let merged_keys: Vec<NaiveDate> = match policy {
                JoinPolicy::Left => keys.clone(),
                JoinPolicy::Right => right.keys().copied().collect(),
                JoinPolicy::Inner => keys
                    .iter()
                    .copied()
                    .filter(|key| right.contains_key(key))
                    .collect(),
                JoinPolicy::Outer => {
                    let union: BTreeSet<NaiveDate> =
                        keys.iter().copied().chain(right.keys().copied()).collect();
                    union.into_iter().collect()
                }
            };

            let mut merged_rows = BTreeMap::new();
            for key in &merged_keys {
                let mut row = rows
                    .get(key)
                    .cloned()
                    .unwrap_or_else(|| vec![None; width]);
                row.push(right.get(key).copied().flatten());
                merged_rows.insert(*key, row);
            }

            keys = merged_keys;
            rows = merged_rows;
        }

        let mut columns: Vec<Vec<Option<f64>>> = symbols
            .iter()
            .map(|_| Vec::with_capacity(keys.len()))
            .collect();
        for key in &keys {
            for (col, cell) in rows[key].iter().enumerate() {
                columns[col].push(*cell);
            }
        }

        Ok(PortfolioTable::from_columns(
            keys,
            symbols.iter().map(|s| s.to_string()).collect(),
            columns,
        ))
    }
}
