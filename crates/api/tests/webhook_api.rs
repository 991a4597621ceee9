//! HTTP-level tests for the geofence webhook.

mod common;

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use common::{body_text, build_test_app, get, open_geofence, send};
use geozone_api::config::GeofenceConfig;
use geozone_events::{InboxListener, AT_HOME, AT_HOME_COUNT};
use serde_json::json;

const ALICE_ENTER: &str =
    "/alice?name=Home&latitude=1.0&longitude=2.0&entry=1&date=2024-01-01T00:00:00Z";
const ALICE_LEAVE: &str =
    "/alice?name=Home&latitude=5.0&longitude=6.0&entry=0&date=2024-01-01T08:30:00Z";

// ---------------------------------------------------------------------------
// Happy path
// ---------------------------------------------------------------------------

#[tokio::test]
async fn enter_home_creates_user_and_roster() {
    let app = build_test_app(open_geofence());

    let response = get(app.router.clone(), ALICE_ENTER).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, "OK");

    app.settle().await;

    assert!(app.store.has_object("alice").await);
    assert_eq!(app.store.peek("alice.changed").await, Some(json!("2024-01-01 00:00:00")));
    assert_eq!(app.store.peek("alice.location").await, Some(json!("Home")));
    assert_eq!(app.store.peek("alice.lastLatitude").await, Some(json!("1.0")));
    assert_eq!(app.store.peek("alice.lastLongitude").await, Some(json!("2.0")));
    assert_eq!(app.store.peek(AT_HOME).await, Some(json!("[\"alice\"]")));
    assert_eq!(app.store.peek(AT_HOME_COUNT).await, Some(json!(1)));
}

#[tokio::test]
async fn leave_clears_location_keeps_coordinates() {
    let app = build_test_app(open_geofence());

    get(app.router.clone(), ALICE_ENTER).await;
    app.settle().await;
    let response = get(app.router.clone(), ALICE_LEAVE).await;
    assert_eq!(response.status(), StatusCode::OK);
    app.settle().await;

    assert_eq!(app.store.peek("alice.location").await, Some(json!("")));
    assert_eq!(app.store.peek("alice.lastLatitude").await, Some(json!("1.0")));
    assert_eq!(app.store.peek("alice.lastLongitude").await, Some(json!("2.0")));
    assert_eq!(app.store.peek("alice.changed").await, Some(json!("2024-01-01 08:30:00")));
    assert_eq!(app.store.peek(AT_HOME).await, Some(json!("[]")));
    assert_eq!(app.store.peek(AT_HOME_COUNT).await, Some(json!(0)));
}

#[tokio::test]
async fn repeated_enter_leaves_roster_unchanged() {
    let app = build_test_app(open_geofence());

    get(app.router.clone(), ALICE_ENTER).await;
    app.settle().await;
    get(app.router.clone(), ALICE_ENTER).await;
    app.settle().await;

    assert_eq!(app.store.peek(AT_HOME).await, Some(json!("[\"alice\"]")));
    assert_eq!(app.store.peek(AT_HOME_COUNT).await, Some(json!(1)));
}

#[tokio::test]
async fn home_location_matched_case_insensitively() {
    let app = build_test_app(GeofenceConfig {
        at_home: " home ".into(),
        ..open_geofence()
    });

    get(app.router.clone(), ALICE_ENTER).await;
    app.settle().await;

    assert_eq!(app.store.peek(AT_HOME_COUNT).await, Some(json!(1)));
}

#[tokio::test]
async fn other_location_does_not_touch_roster() {
    let app = build_test_app(open_geofence());

    let response = get(
        app.router.clone(),
        "/bob?name=Office%202.OG&latitude=3&longitude=4&entry=1",
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    app.settle().await;

    assert_eq!(app.store.peek("bob.location").await, Some(json!("Office 2.OG")));
    assert_eq!(app.store.peek(AT_HOME).await, None);
    assert_eq!(app.store.peek(AT_HOME_COUNT).await, None);
}

#[tokio::test]
async fn stale_count_is_repaired_by_next_home_event() {
    let app = build_test_app(open_geofence());
    {
        use geozone_db::StateStore;
        app.store
            .set_state(AT_HOME, json!("[\"x\",\"y\",\"z\"]"), true)
            .await
            .unwrap();
        app.store.set_state(AT_HOME_COUNT, json!(5), true).await.unwrap();
    }

    get(app.router.clone(), ALICE_ENTER).await;
    app.settle().await;

    assert_eq!(app.store.peek(AT_HOME_COUNT).await, Some(json!(4)));
}

// ---------------------------------------------------------------------------
// ignoreLeaving
// ---------------------------------------------------------------------------

#[tokio::test]
async fn ignored_leave_answers_ok_without_changes() {
    let app = build_test_app(GeofenceConfig {
        ignore_leaving: true,
        ..open_geofence()
    });

    get(app.router.clone(), ALICE_ENTER).await;
    app.settle().await;
    let before = app.store.stats();

    let response = get(app.router.clone(), ALICE_LEAVE).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, "OK");
    app.settle().await;

    assert_eq!(app.store.stats(), before);
    assert_eq!(app.store.peek("alice.location").await, Some(json!("Home")));
    assert_eq!(app.store.peek(AT_HOME).await, Some(json!("[\"alice\"]")));
}

#[tokio::test]
async fn leave_without_entry_flag_still_recorded_when_ignoring() {
    let app = build_test_app(GeofenceConfig {
        ignore_leaving: true,
        ..open_geofence()
    });

    get(app.router.clone(), ALICE_ENTER).await;
    app.settle().await;

    let response = get(app.router.clone(), "/alice?name=Home&latitude=5.0&longitude=6.0").await;
    assert_eq!(response.status(), StatusCode::OK);
    app.settle().await;

    assert_eq!(app.store.peek("alice.location").await, Some(json!("")));
    assert_eq!(app.store.peek(AT_HOME).await, Some(json!("[]")));
    assert_eq!(app.store.peek(AT_HOME_COUNT).await, Some(json!(0)));
}

// ---------------------------------------------------------------------------
// Rejections
// ---------------------------------------------------------------------------

#[tokio::test]
async fn missing_required_substring_returns_500_without_store_access() {
    let app = build_test_app(open_geofence());

    for uri in [
        "/alice?latitude=1&longitude=2&entry=1",
        "/alice?name=Home&longitude=2&entry=1",
        "/alice?name=Home&latitude=1&entry=1",
        "/alice",
    ] {
        let response = get(app.router.clone(), uri).await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR, "{uri}");
        assert_eq!(body_text(response).await, "Request error");
    }
    app.settle().await;

    assert_eq!(app.store.stats().total(), 0);
}

#[tokio::test]
async fn non_get_method_returns_500() {
    let app = build_test_app(open_geofence());

    let request = Request::builder()
        .method(Method::POST)
        .uri(ALICE_ENTER)
        .body(Body::empty())
        .unwrap();
    let response = send(app.router.clone(), request).await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body_text(response).await, "Request error");
    app.settle().await;
    assert_eq!(app.store.stats().total(), 0);
}

#[tokio::test]
async fn misspelled_field_passes_lenient_check() {
    let app = build_test_app(open_geofence());

    let response = get(app.router.clone(), "/alice?name=Home&latitude=1&longitude2=2&entry=1").await;
    assert_eq!(response.status(), StatusCode::OK);
    app.settle().await;

    assert_eq!(app.store.peek("alice.lastLongitude").await, Some(json!("")));
}

#[tokio::test]
async fn strict_validation_rejects_misspelled_field() {
    let app = build_test_app(GeofenceConfig {
        strict_validation: true,
        ..open_geofence()
    });

    let response = get(app.router.clone(), "/alice?name=Home&latitude=1&longitude2=2&entry=1").await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let response = get(app.router.clone(), ALICE_ENTER).await;
    assert_eq!(response.status(), StatusCode::OK);
}

// ---------------------------------------------------------------------------
// Inbox
// ---------------------------------------------------------------------------

#[tokio::test]
async fn inbox_message_uses_same_pipeline() {
    let mut app = build_test_app(GeofenceConfig {
        user: "geo".into(),
        pass: "pw".into(),
        ..open_geofence()
    });
    let (_, placeholder) = tokio::sync::mpsc::channel(1);
    let receiver = std::mem::replace(&mut app.inbox_rx, placeholder);
    let listener = tokio::spawn(InboxListener::run(app.state.processor.clone(), receiver));

    assert!(
        app.inbox
            .send(json!({
                "message": {
                    "user": "carol",
                    "data": {"name": "Home", "latitude": "7", "longitude": "8", "entry": "1"}
                }
            }))
            .await
    );
    drop(app.inbox);

    listener.await.unwrap();
    app.state.processor.wait_idle().await;

    assert_eq!(app.store.peek("carol.location").await, Some(json!("Home")));
    assert_eq!(app.store.peek(AT_HOME_COUNT).await, Some(json!(1)));
}

#[tokio::test]
async fn running_router_does_not_keep_inbox_open() {
    let mut app = build_test_app(open_geofence());
    let (_, placeholder) = tokio::sync::mpsc::channel(1);
    let receiver = std::mem::replace(&mut app.inbox_rx, placeholder);
    let listener = tokio::spawn(InboxListener::run(app.state.processor.clone(), receiver));

    drop(app.inbox);

    let finished = tokio::time::timeout(std::time::Duration::from_secs(5), listener).await;
    assert!(finished.is_ok(), "listener must exit once the last sender is gone");

    let response = get(app.router.clone(), ALICE_ENTER).await;
    assert_eq!(response.status(), StatusCode::OK);
}
