//! Ranking tickers by cumulative return.

use std::cmp::Ordering;

/// Extract the top and bottom `n` tickers by cumulative return.
///
/// Tickers are sorted descending by return with a stable sort, so ties keep
/// their input order. The top list is the first `min(n, total)` tickers of
/// that order, the bottom list the last `min(n, total)`. When `n` reaches
/// half the ticker count the two lists overlap; that is expected, not an
/// error.
pub fn top_bottom_tickers(
    cum_returns: &[(String, f64)],
    n: usize,
) -> (Vec<String>, Vec<String>) {
    let mut ranked: Vec<&(String, f64)> = cum_returns.iter().collect();
    ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));

    let take = n.min(ranked.len());
    let top = ranked[..take].iter().map(|(s, _)| s.clone()).collect();
    let bottom = ranked[ranked.len() - take..]
        .iter()
        .map(|(s, _)| s.clone())
        .collect();

    (top, bottom)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn returns(pairs: &[(&str, f64)]) -> Vec<(String, f64)> {
        pairs.iter().map(|(s, r)| (s.to_string(), *r)).collect()
    }

    #[test]
    fn test_top_bottom_basic() {
        let cum = returns(&[
            ("GOOG", 0.05),
            ("AAPL", 0.12),
            ("XOM", -0.30),
            ("AMZN", 0.25),
            ("GLD", 0.01),
        ]);

        let (top, bottom) = top_bottom_tickers(&cum, 2);
        assert_eq!(top, vec!["AMZN", "AAPL"]);
        // Bottom keeps the descending order's tail
        assert_eq!(bottom, vec!["GLD", "XOM"]);
    }

    #[test]
    fn test_top_bottom_clamps_n() {
        let cum = returns(&[("GOOG", 0.05), ("AAPL", 0.12)]);

        let (top, bottom) = top_bottom_tickers(&cum, 10);
        assert_eq!(top.len(), 2);
        assert_eq!(bottom.len(), 2);
        assert_eq!(top, bottom);
    }

    #[test]
    fn test_top_bottom_overlap_is_expected() {
        let cum = returns(&[("A", 0.3), ("B", 0.2), ("C", 0.1)]);

        let (top, bottom) = top_bottom_tickers(&cum, 2);
        // Both lists contain B
        assert_eq!(top, vec!["A", "B"]);
        assert_eq!(bottom, vec!["B", "C"]);
    }

    #[test]
    fn test_top_bottom_ties_keep_input_order() {
        let cum = returns(&[("FIRST", 0.1), ("SECOND", 0.1), ("THIRD", 0.1)]);

        let (top, _) = top_bottom_tickers(&cum, 3);
        assert_eq!(top, vec!["FIRST", "SECOND", "THIRD"]);
    }

    #[test]
    fn test_top_bottom_empty_input() {
        let (top, bottom) = top_bottom_tickers(&[], 3);
        assert!(top.is_empty());
        assert!(bottom.is_empty());
    }
}
