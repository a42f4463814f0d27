//! Cross-location aggregation.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use super::summary::{summarize_location, LocationSummary};
use crate::Reading;

// ---

/// Summary of every location in a batch of readings.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GlobalSummary {
    // ---
    /// Distinct non-empty location names, sorted.
    pub locations: Vec<String>,
    /// Summaries of the locations that have usable data, in `locations` order.
    pub summaries: Vec<LocationSummary>,
    /// Location with the highest mean short-horizon forecast.
    pub predicted_busiest: Option<String>,
    /// Per-location intensity for comparative display.
    pub heatmap_data: BTreeMap<String, f64>,
}

/// Summarize all locations present in `readings`.
pub fn global_summary(readings: &[Reading]) -> GlobalSummary {
    // ---
    let locations: Vec<String> = readings
        .iter()
        .filter(|r| !r.location.is_empty())
        .map(|r| r.location.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    let per_location: Vec<(&String, Option<LocationSummary>)> = locations
        .iter()
        .map(|loc| (loc, summarize_location(readings, loc)))
        .collect();

    let mut predicted_busiest: Option<(&String, f64)> = None;
    let mut heatmap_data = BTreeMap::new();

    for (loc, summary) in &per_location {
        let forecast_mean = summary.as_ref().and_then(|s| short_mean(&s.short_pred));

        // Strictly greater keeps the first location on ties.
        let score = forecast_mean.unwrap_or(0.0);
        if predicted_busiest.map_or(true, |(_, best)| score > best) {
            predicted_busiest = Some((*loc, score));
        }

        let heat = match (forecast_mean, summary) {
            (Some(mean), _) => mean,
            (None, Some(s)) => s.current as f64,
            (None, None) => 0.0,
        };
        heatmap_data.insert((*loc).clone(), heat);
    }

    let predicted_busiest = predicted_busiest.map(|(loc, _)| loc.clone());
    tracing::debug!(
        locations = locations.len(),
        busiest = ?predicted_busiest,
        "Computed global summary"
    );

    GlobalSummary {
        summaries: per_location.into_iter().filter_map(|(_, s)| s).collect(),
        locations,
        predicted_busiest,
        heatmap_data,
    }
}

fn short_mean(short_pred: &[i64]) -> Option<f64> {
    if short_pred.is_empty() {
        return None;
    }
    Some(short_pred.iter().sum::<i64>() as f64 / short_pred.len() as f64)
}
