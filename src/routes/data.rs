use axum::{
    extract::Query, extract::State, http::StatusCode, response::IntoResponse, routing::get, Json,
    Router,
};
use serde::Serialize;
use tracing::{debug, info};

use super::{AppState, RangeQuery};
use crate::{
    engine::{filter_by_time, now_secs},
    Reading,
};

// ---

pub fn router() -> Router<AppState> {
    // ---
    Router::new().route("/data", get(handler))
}

/// Raw readings inside the requested window.
#[derive(Serialize)]
struct DataResponse {
    range: String,
    data: Vec<Reading>,
}

async fn handler(
    Query(params): Query<RangeQuery>,
    State((store, _config)): State<AppState>,
) -> impl IntoResponse {
    // ---
    info!("GET /data - range={}", params.key());

    let all = store.read_all().await;
    let data = filter_by_time(&all, params.window(), now_secs());
    debug!("GET /data - {} of {} readings in window", data.len(), all.len());

    (
        StatusCode::OK,
        Json(DataResponse {
            range: params.key().to_string(),
            data,
        }),
    )
}
