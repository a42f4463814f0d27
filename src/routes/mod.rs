use std::sync::Arc;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{engine::TimeWindow, Config, ReadingStore};

mod data;
mod health;
mod post_data;
mod predictions;

/// Shared state handed to every handler.
pub type AppState = (Arc<ReadingStore>, Config);

// ---

pub fn router(store: Arc<ReadingStore>, config: Config) -> Router {
    // ---
    Router::new()
        .merge(post_data::router())
        .merge(data::router())
        .merge(predictions::router())
        .merge(health::router())
        .with_state((store, config))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

/// `?range=` query accepted by the read endpoints.
#[derive(Debug, Deserialize)]
struct RangeQuery {
    range: Option<String>,
}

impl RangeQuery {
    /// The key as given, defaulting to `current`.
    fn key(&self) -> &str {
        self.range.as_deref().unwrap_or("current")
    }

    fn window(&self) -> TimeWindow {
        TimeWindow::from_key(self.key())
    }
}

/// `{"status": "error", "msg": ...}` body shared by every failing handler.
fn error_response(status: StatusCode, msg: impl Into<String>) -> Response {
    (status, Json(json!({ "status": "error", "msg": msg.into() }))).into_response()
}

#[cfg(test)]
mod tests {
    // ---
    use super::*;
    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
    };
    use serde_json::{json, Value};
    use std::path::PathBuf;
    use chrono::Timelike;
    use tower::ServiceExt;

    fn test_app(dir: &tempfile::TempDir) -> Router {
        let config = Config {
            data_file: dir.path().join("data.jsonl"),
            bind_addr: [127, 0, 0, 1].into(),
            port: 0,
        };
        let store = Arc::new(ReadingStore::new(PathBuf::from(&config.data_file)));
        router(store, config)
    }

    async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
        let resp = app.clone().oneshot(req).await.unwrap();
        let status = resp.status();
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    fn post(body: Value) -> Request<Body> {
        Request::post("/post_data")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::get(uri).body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        // ---
        let dir = tempfile::tempdir().unwrap();
        let (status, body) = send(&test_app(&dir), get("/health")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"status": "ok"}));
    }

    #[tokio::test]
    async fn test_lobby_scenario() {
        // ---
        let dir = tempfile::tempdir().unwrap();
        let app = test_app(&dir);
        let now = chrono::Utc::now().timestamp();
        // Keep all five readings inside the current local hour.
        let start = now - now.rem_euclid(3600).min(240);

        for i in 0..5 {
            let (status, body) = send(
                &app,
                post(json!({
                    "location": "Lobby",
                    "timestamp": start + 60 * i,
                    "wifi_count": 3,
                    "ble_count": 2
                })),
            )
            .await;
            assert_eq!(status, StatusCode::OK);
            assert_eq!(body["status"], "success");
            assert_eq!(body["received"]["total_count"], 5);
            assert_eq!(body["summary"]["current"], 5);
        }

        let (status, body) = send(&app, get("/predictions?range=current")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["locations"], json!(["Lobby"]));
        assert_eq!(body["predicted_busiest"], "Lobby");

        let lobby = &body["summaries"][0];
        assert_eq!(lobby["current"], 5);
        assert!(lobby["busy"].is_boolean());
        let short = lobby["short_pred"].as_array().unwrap();
        assert_eq!(short.len(), 5);
        assert!(short.iter().all(|v| v.as_i64().is_some_and(|n| n >= 0)));

        let expected_hour = chrono::DateTime::from_timestamp(start, 0)
            .map(|t| t.with_timezone(&chrono::Local).hour())
            .unwrap();
        assert_eq!(lobby["peak_hour"], json!(expected_hour));
    }

    #[tokio::test]
    async fn test_error_response_shape() {
        // ---
        let resp = error_response(StatusCode::INTERNAL_SERVER_ERROR, "failed to compute predictions");
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(
            body,
            json!({"status": "error", "msg": "failed to compute predictions"})
        );
    }

    #[tokio::test]
    async fn test_null_location_stays_unlisted() {
        // ---
        let dir = tempfile::tempdir().unwrap();
        let app = test_app(&dir);
        let now = chrono::Utc::now().timestamp();

        let (status, body) = send(
            &app,
            post(json!({"location": null, "timestamp": now, "wifi_count": 2})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["received"]["location"], "");

        let (_, body) = send(&app, get("/predictions")).await;
        assert_eq!(body["locations"], json!([]));
        assert_eq!(body["predicted_busiest"], Value::Null);
    }

    #[tokio::test]
    async fn test_data_window_filtering() {
        // ---
        let dir = tempfile::tempdir().unwrap();
        let app = test_app(&dir);
        let now = chrono::Utc::now().timestamp();

        send(&app, post(json!({"location": "A", "timestamp": now, "wifi_count": 1}))).await;
        send(&app, post(json!({"location": "B", "timestamp": now - 7_200, "wifi_count": 1}))).await;
        send(&app, post(json!({"location": "C", "wifi_count": 1}))).await;

        let (_, body) = send(&app, get("/data")).await;
        assert_eq!(body["range"], "current");
        assert_eq!(body["data"].as_array().unwrap().len(), 3);

        let (_, body) = send(&app, get("/data?range=hour")).await;
        assert_eq!(body["range"], "hour");
        let data = body["data"].as_array().unwrap();
        assert_eq!(data.len(), 1);
        assert_eq!(data[0]["location"], "A");

        let (_, body) = send(&app, get("/data?range=day")).await;
        assert_eq!(body["data"].as_array().unwrap().len(), 2);

        let (_, body) = send(&app, get("/predictions?range=hour")).await;
        assert_eq!(body["locations"], json!(["A"]));
    }

    #[tokio::test]
    async fn test_post_rejects_missing_body() {
        // ---
        let dir = tempfile::tempdir().unwrap();
        let app = test_app(&dir);

        let req = Request::post("/post_data").body(Body::empty()).unwrap();
        let (status, body) = send(&app, req).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({"status": "error", "msg": "no json body"}));

        let (status, body) = send(&app, post(json!({"location": "A", "wifi_count": "lots"}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["status"], "error");

        let (_, body) = send(&app, get("/predictions")).await;
        assert_eq!(body["locations"], json!([]));
        assert_eq!(body["predicted_busiest"], Value::Null);
    }

    #[tokio::test]
    async fn test_post_without_timestamp_returns_empty_summary() {
        // ---
        let dir = tempfile::tempdir().unwrap();
        let app = test_app(&dir);

        let (status, body) = send(&app, post(json!({"location": "Roof", "wifi_count": 2}))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["summary"], json!({}));
        assert_eq!(body["received"]["timestamp"], Value::Null);
    }
}
