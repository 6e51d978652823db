//! Mean and population standard deviation.
//!
//! Every fitness dimension in this crate is reported as `mean - stddev`
//! rather than mean alone, so a schedule that hits its coverage target for
//! most students but leaves a few far behind scores worse than one with the
//! same average but tighter spread.

/// Arithmetic mean of `values`. Returns `0.0` for an empty slice.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population standard deviation of `values` (divides by `n`, not `n - 1`).
/// Returns `0.0` for an empty slice or a single value.
pub fn population_stddev(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let m = mean(values);
    let variance = values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / values.len() as f64;
    variance.sqrt()
}

/// `mean(values) - population_stddev(values)`, the shared shape of every
/// fitness dimension in this crate.
pub fn mean_minus_stddev(values: &[f64]) -> f64 {
    mean(values) - population_stddev(values)
}
