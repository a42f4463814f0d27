//! Exponential smoothing and z-score anomaly detection.

use super::stats;

/// Smoothing factor used by the location summary.
pub const DEFAULT_ALPHA: f64 = 0.5;

/// Absolute z-score above which a point is anomalous.
pub const Z_THRESHOLD: f64 = 2.5;

/// Fewest points for which anomalies are considered.
pub const MIN_ANOMALY_POINTS: usize = 5;

// ---

/// Exponentially smoothed final value, seeded with the first element.
pub fn exponential_smoothing(series: &[f64], alpha: f64) -> Option<f64> {
    // ---
    let (first, rest) = series.split_first()?;
    Some(
        rest.iter()
            .fold(*first, |s, x| alpha * x + (1.0 - alpha) * s),
    )
}

/// Indices of points whose population z-score exceeds [`Z_THRESHOLD`].
///
/// Constant series have no definable outliers and yield nothing.
pub fn detect_anomalies(series: &[f64]) -> Vec<usize> {
    // ---
    if series.len() < MIN_ANOMALY_POINTS {
        return Vec::new();
    }
    let (Some(mean), Some(std)) = (stats::mean(series), stats::population_std(series)) else {
        return Vec::new();
    };
    if std == 0.0 || !std.is_finite() {
        return Vec::new();
    }

    series
        .iter()
        .enumerate()
        .filter(|(_, x)| ((*x - mean) / std).abs() > Z_THRESHOLD)
        .map(|(i, _)| i)
        .collect()
}
