//! Shared helper functions for indicator calculations.

/// Arithmetic mean; `None` for an empty slice.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Population standard deviation (divides by N, not N-1).
pub fn population_stddev(values: &[f64]) -> Option<f64> {
    let m = mean(values)?;
    let variance = values
        .iter()
        .map(|v| {
            let diff = v - m;
            diff * diff
        })
        .sum::<f64>()
        / values.len() as f64;
    Some(variance.sqrt())
}

/// Percentage (0-100) of `history` values that are <= `current`.
///
/// `history` is expected to include `current` itself, so the result for a
/// non-empty history is always > 0.
pub fn percentile_rank(history: &[f64], current: f64) -> Option<f64> {
    if history.is_empty() {
        return None;
    }
    let at_or_below = history.iter().filter(|&&v| v <= current).count();
    Some(at_or_below as f64 / history.len() as f64 * 100.0)
}

/// One-period simple returns: r[i] = c[i+1] / c[i] - 1.
///
/// A zero previous close yields a NaN-free 0.0 return.
pub fn simple_returns(closes: &[f64]) -> Vec<f64> {
    closes
        .windows(2)
        .map(|w| if w[0] == 0.0 { 0.0 } else { w[1] / w[0] - 1.0 })
        .collect()
}
