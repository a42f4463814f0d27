//! Recency windows over the reading history.

use super::timestamp::normalize_timestamp;
use crate::Reading;

// ---

/// Query window selecting how far back readings are considered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimeWindow {
    /// Everything, including readings without a usable timestamp.
    #[default]
    Current,
    Hour,
    Day,
    Week,
}

impl TimeWindow {
    // ---
    /// Parse a window key; unknown keys fall back to [`TimeWindow::Current`].
    pub fn from_key(key: &str) -> Self {
        match key {
            "hour" => TimeWindow::Hour,
            "day" => TimeWindow::Day,
            "week" => TimeWindow::Week,
            _ => TimeWindow::Current,
        }
    }

    /// Length of the window in seconds; `None` means unbounded.
    pub fn span_secs(self) -> Option<f64> {
        match self {
            TimeWindow::Current => None,
            TimeWindow::Hour => Some(3_600.0),
            TimeWindow::Day => Some(86_400.0),
            TimeWindow::Week => Some(604_800.0),
        }
    }

    /// Earliest canonical timestamp admitted at `now`.
    pub fn cutoff(self, now: f64) -> f64 {
        self.span_secs()
            .map_or(f64::NEG_INFINITY, |span| now - span)
    }
}

/// Keep the readings that fall inside `window` relative to `now`, in order.
///
/// Readings whose timestamp cannot be normalized are assumed recent, but
/// only the unbounded `Current` window admits them.
pub fn filter_by_time(readings: &[Reading], window: TimeWindow, now: f64) -> Vec<Reading> {
    // ---
    let cutoff = window.cutoff(now);
    readings
        .iter()
        .filter(|r| match normalize_timestamp(r.timestamp.as_ref()) {
            Some(ts) => ts >= cutoff,
            None => window == TimeWindow::Current,
        })
        .cloned()
        .collect()
}
