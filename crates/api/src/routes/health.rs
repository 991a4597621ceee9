use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::handlers::webhook;
use crate::state::AppState;

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// `GET /health` only. Other methods on the path fall through to the
/// webhook handler like any unmatched request.
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check).fallback(webhook::receive))
}
