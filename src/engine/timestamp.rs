//! Canonical timestamp normalization.
//!
//! Readings arrive with whatever timestamp the sensor firmware produced:
//! epoch seconds, epoch milliseconds, numeric strings, or ISO-8601 text.
//! Everything is reduced to `f64` seconds since the Unix epoch, or `None`.

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde_json::Value;

/// Numeric values above this are epoch milliseconds.
pub const MILLIS_THRESHOLD: f64 = 1e12;

const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

const OFFSET_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f%:z",
    "%Y-%m-%dT%H:%M:%S%.f%z",
    "%Y-%m-%d %H:%M:%S%.f%z",
];

/// Normalize a raw timestamp value to seconds since the epoch.
pub fn normalize_timestamp(value: Option<&Value>) -> Option<f64> {
    // ---
    let numeric = match value? {
        Value::Null => return None,
        Value::Number(n) => n.as_f64(),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        Value::String(s) => match s.trim().parse::<f64>() {
            Ok(v) => Some(v),
            Err(_) => return parse_iso(s.trim()),
        },
        Value::Array(_) | Value::Object(_) => return None,
    }?;

    if !numeric.is_finite() {
        return None;
    }
    if numeric > MILLIS_THRESHOLD {
        Some(numeric / 1000.0)
    } else {
        Some(numeric)
    }
}

/// Parse ISO-8601 text; naive values are taken as local time.
pub fn parse_iso(text: &str) -> Option<f64> {
    // ---
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(epoch_seconds(&dt.with_timezone(&Utc)));
    }
    for fmt in OFFSET_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(text, fmt) {
            return Some(epoch_seconds(&dt.with_timezone(&Utc)));
        }
    }

    let naive = NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(text, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })?;

    Local
        .from_local_datetime(&naive)
        .earliest()
        .map(|dt| epoch_seconds(&dt.with_timezone(&Utc)))
}

/// Current wall-clock time in canonical form.
pub fn now_secs() -> f64 {
    epoch_seconds(&Utc::now())
}

fn epoch_seconds(dt: &DateTime<Utc>) -> f64 {
    dt.timestamp() as f64 + f64::from(dt.timestamp_subsec_micros()) / 1e6
}
