//! Seeded sampling helpers for tickers and date ranges.
//!
//! Every draw uses an explicitly seeded, caller-owned generator constructed
//! per call, so the same seed reproduces the same result regardless of call
//! order. No global generator state is involved.

use chrono::{Duration, NaiveDate};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::types::parse_date;
use crate::{Error, Result};

/// Default lower bound for [`random_end_date`] deltas, in calendar days.
pub const DEFAULT_MIN_DAYS: i64 = 3;

/// Default upper bound for [`random_end_date`] deltas, in calendar days.
pub const DEFAULT_MAX_DAYS: i64 = 14;

/// Select `k` distinct symbols without replacement, in sampling order.
///
/// Deterministic for a given seed, input list, and `k`. A `k` larger than
/// the list clamps to the list length rather than failing.
///
/// # Example
///
/// ```rust
/// use folio_core::sampling::random_subset;
///
/// let symbols = ["AAPL", "MSFT", "GOOG", "AMZN", "TSLA"];
/// let picked = random_subset(&symbols, 3, 42);
///
/// assert_eq!(picked.len(), 3);
/// assert_eq!(picked, random_subset(&symbols, 3, 42));
/// ```
pub fn random_subset(symbols: &[&str], k: usize, seed: u64) -> Vec<String> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let k = k.min(symbols.len());

    rand::seq::index::sample(&mut rng, symbols.len(), k)
        .iter()
        .map(|i| symbols[i].to_string())
        .collect()
}

/// Draw a random end date `min_days..=max_days` calendar days after `start_date`.
///
/// Returns the end date together with the drawn delta. `start_date` is a
/// `YYYY-MM-DD` string; an unparsable date or an empty/negative bound range
/// fails with [`Error::InvalidArgument`]. Deterministic for a given seed.
pub fn random_end_date(
    start_date: &str,
    min_days: i64,
    max_days: i64,
    seed: u64,
) -> Result<(NaiveDate, i64)> {
    let start = parse_date(start_date)?;
    if min_days < 0 || min_days > max_days {
        return Err(Error::InvalidArgument(format!(
            "day bounds [{min_days}, {max_days}] are not a valid range"
        )));
    }

    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let delta_days = rng.random_range(min_days..=max_days);

    Ok((start + Duration::days(delta_days), delta_days))
}
