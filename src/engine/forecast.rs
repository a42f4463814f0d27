//! Linear trend extrapolation over the tail of a series.

use super::stats::{self, LinearFit};

/// Number of most recent points the trend is fitted on.
pub const TAIL_WINDOW: usize = 20;

// ---

/// Forecast `horizon` future values from a time-ordered series.
///
/// Fits a least-squares line over the last [`TAIL_WINDOW`] points and
/// evaluates it at `last_ts + i * step`, where `step` is the median spacing
/// of the tail timestamps. Forecasts are clamped at zero.
///
/// With fewer than two points the last value (or `0.0`) is repeated; if the
/// fit itself fails the tail mean is repeated instead.
pub fn predict_with_lr(timestamps: &[f64], values: &[f64], horizon: usize) -> Vec<f64> {
    // ---
    if values.len() < 2 {
        let last = values.last().copied().unwrap_or(0.0);
        return vec![last; horizon];
    }

    let (ts_tail, y_tail) = tail(timestamps, values);
    let last_ts = ts_tail.last().copied();

    match (LinearFit::fit(ts_tail, y_tail), last_ts) {
        (Some(fit), Some(last_ts)) => {
            let step = median_step(ts_tail);
            (1..=horizon)
                .map(|i| fit.predict(last_ts + i as f64 * step).max(0.0))
                .collect()
        }
        _ => {
            let fallback = stats::mean(y_tail).filter(|m| m.is_finite()).unwrap_or(0.0);
            tracing::debug!(
                points = y_tail.len(),
                fallback,
                "Trend fit failed, repeating tail mean"
            );
            vec![fallback; horizon]
        }
    }
}

/// Slope of the tail trend in count units per second; `0.0` when no fit exists.
pub fn trend_slope(timestamps: &[f64], values: &[f64]) -> f64 {
    // ---
    let (ts_tail, y_tail) = tail(timestamps, values);
    LinearFit::fit(ts_tail, y_tail).map_or(0.0, |fit| fit.slope)
}

/// The aligned last [`TAIL_WINDOW`] points of both series.
fn tail<'a>(timestamps: &'a [f64], values: &'a [f64]) -> (&'a [f64], &'a [f64]) {
    let n = timestamps.len().min(values.len());
    let start = n.saturating_sub(TAIL_WINDOW);
    (&timestamps[start..n], &values[start..n])
}

fn median_step(timestamps: &[f64]) -> f64 {
    // ---
    let diffs: Vec<f64> = timestamps.windows(2).map(|w| w[1] - w[0]).collect();
    stats::median(&diffs).unwrap_or(1.0)
}
