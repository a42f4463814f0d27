//! Ingestion endpoint: `POST /post_data`.
//!
//! Normalizes the raw payload into a [`Reading`], appends it to the store,
//! and answers with a fresh summary of the reading's location so sensors get
//! immediate feedback.

use axum::{
    body::Bytes, extract::State, http::StatusCode, response::IntoResponse, routing::post, Json,
    Router,
};
use serde_json::json;
use tracing::{debug, error, info, warn};

use super::{error_response, AppState};
use crate::{engine::summarize_location, Reading};

// ---

pub fn router() -> Router<AppState> {
    // ---
    Router::new().route("/post_data", post(handler))
}

async fn handler(State((store, _config)): State<AppState>, body: Bytes) -> impl IntoResponse {
    // ---
    info!("POST /post_data - Receiving reading");

    let reading = match Reading::from_payload(&body) {
        Ok(reading) => reading,
        Err(e) => {
            warn!("Rejected payload: {}", e);
            return error_response(StatusCode::BAD_REQUEST, e.to_string());
        }
    };

    debug!("POST /post_data - Appending {:?}", reading);
    if let Err(e) = store.append(&reading).await {
        error!("Failed to store reading: {:#}", e);
        return error_response(StatusCode::INTERNAL_SERVER_ERROR, "failed to store reading");
    }

    let all = store.read_all().await;
    let location = reading.location.clone();
    let summary = tokio::task::spawn_blocking(move || summarize_location(&all, &location))
        .await
        .unwrap_or_else(|e| {
            error!("Summary task failed: {}", e);
            None
        });

    let summary = match summary {
        Some(s) => serde_json::to_value(s).unwrap_or_else(|_| json!({})),
        None => json!({}),
    };

    debug!("POST /post_data - Returning OK");
    (
        StatusCode::OK,
        Json(json!({
            "status": "success",
            "received": reading,
            "summary": summary,
        })),
    )
        .into_response()
}
