//! Per-location, time-ordered numeric view of the readings.

use serde_json::Value;

use super::timestamp::normalize_timestamp;
use crate::Reading;

// ---

/// One cleaned reading inside a [`LocationFrame`].
#[derive(Debug, Clone, PartialEq)]
pub struct FrameRow {
    // ---
    /// Canonical timestamp (seconds since epoch).
    pub ts: f64,
    /// Timestamp exactly as stored.
    pub raw_timestamp: Option<Value>,
    pub wifi_count: f64,
    pub ble_count: f64,
    pub total_count: f64,
}

impl FrameRow {
    // ---
    /// The reading's original timestamp as an integer.
    ///
    /// Numeric timestamps are truncated as stored (milliseconds stay
    /// milliseconds); text that is not an integer literal falls back to the
    /// canonical seconds.
    pub fn original_epoch(&self) -> i64 {
        let raw = match &self.raw_timestamp {
            Some(Value::Number(n)) => n
                .as_i64()
                .or_else(|| n.as_f64().map(|f| f.trunc() as i64)),
            Some(Value::String(s)) => s.trim().parse::<i64>().ok(),
            _ => None,
        };
        raw.unwrap_or(self.ts.trunc() as i64)
    }
}

/// Readings for one location sorted ascending by canonical timestamp.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LocationFrame {
    rows: Vec<FrameRow>,
}

impl LocationFrame {
    // ---
    /// Select the readings for `location`, drop those without a usable
    /// timestamp, sort by time, and coerce absent counts to zero.
    pub fn build(readings: &[Reading], location: &str) -> Self {
        // ---
        let mut rows: Vec<FrameRow> = readings
            .iter()
            .filter(|r| r.location == location)
            .filter_map(|r| {
                let ts = normalize_timestamp(r.timestamp.as_ref())?;
                Some(FrameRow {
                    ts,
                    raw_timestamp: r.timestamp.clone(),
                    wifi_count: r.wifi_count.unwrap_or(0) as f64,
                    ble_count: r.ble_count.unwrap_or(0) as f64,
                    total_count: r.total_count.unwrap_or(0) as f64,
                })
            })
            .collect();

        rows.sort_by(|a, b| a.ts.total_cmp(&b.ts));
        LocationFrame { rows }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn rows(&self) -> &[FrameRow] {
        &self.rows
    }

    pub fn timestamps(&self) -> Vec<f64> {
        self.rows.iter().map(|r| r.ts).collect()
    }

    pub fn wifi(&self) -> Vec<f64> {
        self.rows.iter().map(|r| r.wifi_count).collect()
    }

    pub fn ble(&self) -> Vec<f64> {
        self.rows.iter().map(|r| r.ble_count).collect()
    }

    pub fn totals(&self) -> Vec<f64> {
        self.rows.iter().map(|r| r.total_count).collect()
    }
}
