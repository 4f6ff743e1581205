//! Statistical helpers shared by the z-score and performance calculations.

/// Arithmetic mean. `None` for an empty slice or a non-finite result.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let sum: f64 = values.iter().sum();
    let avg = sum / values.len() as f64;
    avg.is_finite().then_some(avg)
}

/// Sample standard deviation (n - 1 denominator).
///
/// `None` with fewer than two values. A constant slice returns exactly
/// `Some(0.0)` so callers can detect degenerate variance without
/// floating-point residue from the mean.
pub fn std_dev(values: &[f64]) -> Option<f64> {
    let (first, rest) = values.split_first()?;
    if rest.is_empty() {
        return None;
    }
    if rest.iter().all(|v| v == first) {
        return Some(0.0);
    }

    let avg = mean(values)?;
    let variance_sum: f64 = values.iter().map(|v| (v - avg) * (v - avg)).sum();
    let variance = variance_sum / (values.len() - 1) as f64;

    let std = variance.sqrt();
    std.is_finite().then_some(std)
}

/// Divide, treating a zero or non-finite outcome of the denominator as
/// undefined rather than producing infinity or NaN.
pub fn checked_ratio(numerator: f64, denominator: f64) -> Option<f64> {
    if denominator == 0.0 {
        return None;
    }
    let ratio = numerator / denominator;
    ratio.is_finite().then_some(ratio)
}
