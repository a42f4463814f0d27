//! Data models for occupancy readings.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

// ---

/// One stored occupancy sample for a location.
///
/// `timestamp` is kept exactly as it arrived (epoch seconds, epoch
/// milliseconds, ISO-8601 text, or null); the engine normalizes it on read.
/// Counts that are missing or non-numeric in the store load as `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    // ---
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub timestamp: Option<Value>,
    #[serde(default, deserialize_with = "lenient_count")]
    pub wifi_count: Option<i64>,
    #[serde(default, deserialize_with = "lenient_count")]
    pub ble_count: Option<i64>,
    #[serde(default, deserialize_with = "lenient_count")]
    pub total_count: Option<i64>,
}

/// Reasons an ingestion payload is rejected.
#[derive(Debug, Error, PartialEq)]
pub enum PayloadError {
    #[error("no json body")]
    MissingBody,

    #[error("invalid {field}: {value}")]
    InvalidCount { field: &'static str, value: String },
}

impl Reading {
    // ---
    /// Build a reading from a raw ingestion body, applying the defaulting
    /// rules: location falls back to `"Unknown"`, `ts` is accepted when
    /// `timestamp` is absent, counts default to 0 and `total_count` to
    /// `wifi_count + ble_count`.
    pub fn from_payload(body: &[u8]) -> Result<Self, PayloadError> {
        // ---
        let payload: Map<String, Value> = match serde_json::from_slice(body) {
            Ok(Value::Object(map)) if !map.is_empty() => map,
            _ => return Err(PayloadError::MissingBody),
        };

        let location = match payload.get("location") {
            None => "Unknown".to_string(),
            Some(Value::Null) => String::new(),
            Some(Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
        };

        let timestamp_key = if payload.contains_key("timestamp") {
            "timestamp"
        } else {
            "ts"
        };
        let timestamp = payload.get(timestamp_key).filter(|v| !v.is_null()).cloned();

        let wifi_count = required_count(&payload, "wifi_count")?;
        let ble_count = required_count(&payload, "ble_count")?;
        let total_count = match payload.get("total_count") {
            Some(v) => parse_count(v).ok_or_else(|| invalid("total_count", v))?,
            None => wifi_count + ble_count,
        };

        Ok(Reading {
            location,
            timestamp,
            wifi_count: Some(wifi_count),
            ble_count: Some(ble_count),
            total_count: Some(total_count),
        })
    }
}

fn required_count(payload: &Map<String, Value>, field: &'static str) -> Result<i64, PayloadError> {
    // ---
    match payload.get(field) {
        None => Ok(0),
        Some(v) => parse_count(v).ok_or_else(|| invalid(field, v)),
    }
}

fn invalid(field: &'static str, value: &Value) -> PayloadError {
    PayloadError::InvalidCount {
        field,
        value: value.to_string(),
    }
}

/// Interpret a JSON value as an integer count.
///
/// Integers pass through, finite floats truncate toward zero, booleans map to
/// 1/0 and strings must hold an integer literal.
pub(crate) fn parse_count(value: &Value) -> Option<i64> {
    // ---
    match value {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.is_finite())
                .map(|f| f.trunc() as i64)
        }),
        Value::Bool(b) => Some(i64::from(*b)),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }
}

/// Accept any JSON value for a stored count, keeping only numeric ones.
fn lenient_count<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    // ---
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(|v| match v {
        Value::String(s) => s
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|f| f.is_finite())
            .map(|f| f.trunc() as i64),
        other => parse_count(other),
    }))
}
