//! Population moments and standardized scores.

/// Arithmetic mean. Empty input returns NaN.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population variance (divides by n, not n-1). Empty input returns NaN.
pub fn population_variance(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    let m = mean(values);
    values.iter().map(|v| (v - m) * (v - m)).sum::<f64>() / values.len() as f64
}

/// Population standard deviation. Empty input returns NaN.
pub fn population_std(values: &[f64]) -> f64 {
    population_variance(values).sqrt()
}

/// Standardized score of `value` against a center and spread.
///
/// The caller is responsible for guarding `std == 0`.
pub fn z_score(value: f64, center: f64, std: f64) -> f64 {
    (value - center) / std
}

/// Linear-interpolation quantile, `q` in [0, 1] (clamped).
///
/// Matches the numpy `percentile` convention used when deriving the
/// contamination offset. Empty input returns NaN; NaN values sort last.
pub fn quantile(values: &[f64], q: f64) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let q = q.clamp(0.0, 1.0);
    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    if lo == hi {
        return sorted[lo];
    }
    let frac = pos - lo as f64;
    sorted[lo] + (sorted[hi] - sorted[lo]) * frac
}
