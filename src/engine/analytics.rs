//! Peak hour, growth rate and wifi/BLE correlation.

use chrono::{DateTime, Local, Timelike};

use super::frame::LocationFrame;
use super::stats;

// ---

/// Local hour of day (0–23) with the highest mean `total_count`.
///
/// Ties go to the earliest hour. `None` for an empty frame.
pub fn peak_hour(frame: &LocationFrame) -> Option<u32> {
    // ---
    let mut sums = [0.0f64; 24];
    let mut counts = [0usize; 24];

    for row in frame.rows() {
        let Some(hour) = local_hour(row.ts) else {
            continue;
        };
        sums[hour as usize] += row.total_count;
        counts[hour as usize] += 1;
    }

    let mut best: Option<(u32, f64)> = None;
    for hour in 0..24u32 {
        let n = counts[hour as usize];
        if n == 0 {
            continue;
        }
        let avg = sums[hour as usize] / n as f64;
        if best.map_or(true, |(_, best_avg)| avg > best_avg) {
            best = Some((hour, avg));
        }
    }
    best.map(|(hour, _)| hour)
}

/// Hour of day in the server's local time zone.
pub fn local_hour(ts: f64) -> Option<u32> {
    // ---
    let secs = ts.floor();
    let nanos = ((ts - secs) * 1e9) as u32;
    DateTime::from_timestamp(secs as i64, nanos.min(999_999_999))
        .map(|utc| utc.with_timezone(&Local).hour())
}

/// Percent change between the last two values, rounded to 2 decimals.
///
/// The denominator is floored at 1 so a zero baseline cannot divide by zero.
pub fn growth_rate(series: &[f64]) -> f64 {
    // ---
    let [.., prev, last] = series else {
        return 0.0;
    };
    let growth = (last - prev) / prev.max(1.0) * 100.0;
    if growth.is_finite() {
        stats::round_to(growth, 2)
    } else {
        0.0
    }
}

/// Pearson correlation rounded to 3 decimals; `None` when undefined.
pub fn correlation(x: &[f64], y: &[f64]) -> Option<f64> {
    stats::pearson(x, y).map(|r| stats::round_to(r, 3))
}
