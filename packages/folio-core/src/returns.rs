//! Return derivation: daily returns, cumulative returns, rolling volatility.
//!
//! All operations here are pure functions of their table input. Undefined
//! values (the first period, pre-window rolling cells, divisions by a missing
//! or zero prior value) stay missing; zero is a valid return and is never
//! used as a stand-in.

use crate::types::PortfolioTable;
use crate::{Error, Result};

/// Compute period-over-period fractional returns for each column.
///
/// The first row of the input has no prior value, so the result has exactly
/// one fewer row than the input. A cell is missing when the current value,
/// the previous value, or a nonzero divisor is not available.
pub fn daily_returns(table: &PortfolioTable) -> PortfolioTable {
    let dates = table.dates().iter().skip(1).copied().collect();

    let columns = table
        .columns()
        .iter()
        .map(|col| {
            col.windows(2)
                .map(|pair| match (pair[0], pair[1]) {
                    (Some(prev), Some(cur)) if prev != 0.0 => Some(cur / prev - 1.0),
                    _ => None,
                })
                .collect()
        })
        .collect();

    PortfolioTable::from_columns(dates, table.symbols().to_vec(), columns)
}

/// Compute the compounded cumulative return of each column.
///
/// Daily returns are compounded as the product of `(1 + r)` minus one.
/// Missing return cells are skipped, i.e. excluded from the product; the
/// policy is uniform across columns, and a column with no defined returns
/// compounds to `0.0`.
pub fn cumulative_returns(table: &PortfolioTable) -> Vec<(String, f64)> {
    let daily = daily_returns(table);

    daily
        .symbols()
        .iter()
        .zip(daily.columns())
        .map(|(symbol, col)| {
            let growth: f64 = col.iter().flatten().map(|r| 1.0 + r).product();
            (symbol.clone(), growth - 1.0)
        })
        .collect()
}

/// Compute the trailing sample standard deviation of daily returns.
///
/// Each result cell covers the `window` return observations ending at that
/// row. The first `window - 1` rows have insufficient history and stay
/// missing, as does any window containing a missing return. A window of one
/// observation has no sample deviation, so `window == 1` yields an
/// all-missing table; `window == 0` is an invalid argument.
pub fn rolling_volatility(table: &PortfolioTable, window: usize) -> Result<PortfolioTable> {
    if window == 0 {
        return Err(Error::InvalidArgument(
            "rolling window must be at least 1".to_string(),
        ));
    }

    let daily = daily_returns(table);
    let (rows, _) = daily.shape();

    let columns = daily
        .columns()
        .iter()
        .map(|col| {
            let mut cells = vec![None; rows];
            if window >= 2 {
                for i in (window - 1)..rows {
                    let trailing = &col[i + 1 - window..=i];
                    if trailing.iter().all(|c| c.is_some()) {
                        let obs: Vec<f64> = trailing.iter().flatten().copied().collect();
                        cells[i] = Some(sample_std(&obs));
                    }
                }
            }
            cells
        })
        .collect();

    Ok(PortfolioTable::from_columns(
        daily.dates().to_vec(),
        daily.symbols().to_vec(),
        columns,
    ))
}

/// Sample standard deviation (ddof = 1) of a slice with at least two values.
fn sample_std(values: &[f64]) -> f64 {
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1.0);
    variance.sqrt()
}
