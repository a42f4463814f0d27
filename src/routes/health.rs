// src/routes/health.rs
//! Liveness endpoint for the crowdcast service.
//!
//! The `/health` route lets container orchestrators and the dashboard check
//! that the service is up. It follows the Explicit Module Boundary Pattern
//! (EMBP): the handler stays private and only a subrouter is exported to the
//! gateway (`mod.rs`).

use axum::{routing::get, Json, Router};
use serde::Serialize;

/// JSON response body for the `/health` endpoint.
#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
}

/// Handle `GET /health`. Does not touch the readings store.
async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

/// Create a subrouter containing the `/health` route.
///
/// Generic over the application state so it merges with the gateway router
/// whatever the state type is.
pub fn router<S>() -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    Router::new().route("/health", get(health))
}
