use axum::{
    extract::Query, extract::State, http::StatusCode, response::IntoResponse, routing::get, Json,
    Router,
};
use tracing::{debug, error, info};

use super::{error_response, AppState, RangeQuery};
use crate::engine::{filter_by_time, global_summary, now_secs};

// ---

pub fn router() -> Router<AppState> {
    // ---
    Router::new().route("/predictions", get(handler))
}

async fn handler(
    Query(params): Query<RangeQuery>,
    State((store, _config)): State<AppState>,
) -> impl IntoResponse {
    // ---
    info!("GET /predictions - range={}", params.key());

    // Step 1: Load and window the history
    let all = store.read_all().await;
    let filtered = filter_by_time(&all, params.window(), now_secs());
    debug!(
        "GET /predictions - {} of {} readings in window",
        filtered.len(),
        all.len()
    );

    // Step 2: Summarize off the async workers
    match tokio::task::spawn_blocking(move || global_summary(&filtered)).await {
        Ok(summary) => {
            debug!("GET /predictions - Returning OK");
            (StatusCode::OK, Json(summary)).into_response()
        }
        Err(e) => {
            error!("Global summary task failed: {}", e);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "failed to compute predictions")
        }
    }
}
