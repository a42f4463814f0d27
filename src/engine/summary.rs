//! Per-location occupancy report.

use serde::Serialize;

use super::analytics::{correlation, growth_rate, peak_hour};
use super::forecast::{predict_with_lr, trend_slope};
use super::frame::LocationFrame;
use super::smoothing::{detect_anomalies, exponential_smoothing, DEFAULT_ALPHA};
use super::stats;
use crate::Reading;

/// Forecast horizons, in steps of the location's median sampling interval.
pub const SHORT_HORIZON: usize = 5;
pub const MEDIUM_HORIZON: usize = 30;
pub const LONG_HORIZON: usize = 120;

/// How many medium/long forecast steps are reported.
pub const SAMPLE_LEN: usize = 5;

/// Number of most recent totals fed to the smoother.
pub const SMOOTHING_POINTS: usize = 10;

/// Percentile of historical totals at or above which a location is busy.
pub const BUSY_PERCENTILE: f64 = 90.0;

// ---

/// Forecasts and signals for one location.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LocationSummary {
    // ---
    pub location: String,
    /// Most recent total count.
    pub current: i64,
    pub smoothed: Option<f64>,
    /// Tail trend in counts per second.
    pub slope: f64,
    pub short_pred: Vec<i64>,
    pub medium_pred_sample: Vec<i64>,
    pub long_pred_sample: Vec<i64>,
    /// Original timestamps of anomalous readings.
    pub anomalies: Vec<i64>,
    pub busy: bool,
    pub p90: i64,
    pub peak_hour: Option<u32>,
    pub growth_rate: f64,
    pub wifi_ble_corr: Option<f64>,
}

/// Summarize one location over `readings`; `None` when it has no usable data.
pub fn summarize_location(readings: &[Reading], location: &str) -> Option<LocationSummary> {
    // ---
    let frame = LocationFrame::build(readings, location);
    if frame.is_empty() {
        tracing::debug!(location, "No frame data for location");
        return None;
    }

    let ts = frame.timestamps();
    let wifi = frame.wifi();
    let ble = frame.ble();
    let total = frame.totals();

    let short_pred = predict_with_lr(&ts, &total, SHORT_HORIZON);
    let medium_pred = predict_with_lr(&ts, &total, MEDIUM_HORIZON);
    let long_pred = predict_with_lr(&ts, &total, LONG_HORIZON);

    let slope = trend_slope(&ts, &total);

    let recent = &total[total.len().saturating_sub(SMOOTHING_POINTS)..];
    let smoothed = exponential_smoothing(recent, DEFAULT_ALPHA);

    let anomalies: Vec<i64> = detect_anomalies(&total)
        .into_iter()
        .filter_map(|i| frame.rows().get(i))
        .map(|row| row.original_epoch())
        .collect();

    let p90 = stats::percentile(&total, BUSY_PERCENTILE).unwrap_or(0.0);
    let current = total.last().map_or(0, |v| v.trunc() as i64);
    let busy = current as f64 >= p90;

    tracing::debug!(
        location,
        points = frame.len(),
        current,
        p90,
        anomalies = anomalies.len(),
        "Summarized location"
    );

    Some(LocationSummary {
        location: location.to_string(),
        current,
        smoothed,
        slope,
        short_pred: round_counts(&short_pred),
        medium_pred_sample: round_counts(&medium_pred[..SAMPLE_LEN.min(medium_pred.len())]),
        long_pred_sample: round_counts(&long_pred[..SAMPLE_LEN.min(long_pred.len())]),
        anomalies,
        busy,
        p90: p90.round_ties_even() as i64,
        peak_hour: peak_hour(&frame),
        growth_rate: growth_rate(&total),
        wifi_ble_corr: correlation(&wifi, &ble),
    })
}

/// Round forecasts half-to-even to whole counts.
fn round_counts(values: &[f64]) -> Vec<i64> {
    values.iter().map(|v| v.round_ties_even() as i64).collect()
}
