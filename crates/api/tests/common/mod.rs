#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use tokio::sync::mpsc;
use tower::ServiceExt;

use geozone_api::config::{GeofenceConfig, ServerConfig};
use geozone_api::router::build_app_router;
use geozone_api::state::AppState;
use geozone_db::MemoryStore;
use geozone_events::MessageInbox;

/// Build a test `ServerConfig` around the given geofence settings.
pub fn test_config(geofence: GeofenceConfig) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        request_timeout_secs: 30,
        shutdown_timeout_secs: 5,
        geofence,
    }
}

/// Geofence settings with auth disabled and `Home` as the home location.
pub fn open_geofence() -> GeofenceConfig {
    GeofenceConfig {
        at_home: "Home".into(),
        ..GeofenceConfig::default()
    }
}

pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    pub store: Arc<MemoryStore>,
    /// Sender side of the inbox; the app state does not hold one.
    pub inbox: MessageInbox,
    pub inbox_rx: mpsc::Receiver<serde_json::Value>,
}

impl TestApp {
    /// Wait until every accepted event has been written to the store.
    pub async fn settle(&self) {
        self.state.processor.wait_idle().await;
    }
}

/// Build the full application router over a fresh in-memory store.
///
/// Uses the same [`build_app_router`] as `main.rs` so tests exercise the
/// production middleware stack.
pub fn build_test_app(geofence: GeofenceConfig) -> TestApp {
    let store = Arc::new(MemoryStore::new());
    let (inbox, inbox_rx) = MessageInbox::new(16);
    let state = AppState::new(test_config(geofence), store.clone());
    let router = build_app_router(state.clone());

    TestApp {
        router,
        state,
        store,
        inbox,
        inbox_rx,
    }
}

pub async fn send(app: Router, request: Request<Body>) -> Response<Body> {
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    send(app, request).await
}

pub async fn get_with_auth(app: Router, uri: &str, authorization: &str) -> Response<Body> {
    let request = Request::builder()
        .uri(uri)
        .header("Authorization", authorization)
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub async fn body_text(response: Response<Body>) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
