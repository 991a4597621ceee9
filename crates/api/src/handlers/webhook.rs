//! Geofence webhook handler.
//!
//! `GET /<user>?name=..&latitude=..&longitude=..&entry=0|1&date=..&device=..`
//!
//! The response only means the event was accepted: state is written by a
//! background task after the client already has its `200 OK`.

use axum::extract::State;
use axum::http::{Method, Uri};
use geozone_core::parse::parse_request;

use crate::error::AppResult;
use crate::middleware::auth::BasicAuth;
use crate::state::AppState;

pub const ACCEPTED_BODY: &str = "OK";

/// Fallback handler: every path that is not another route is a user id.
pub async fn receive(
    _auth: BasicAuth,
    State(state): State<AppState>,
    method: Method,
    uri: Uri,
) -> AppResult<&'static str> {
    let event = parse_request(
        method.as_str(),
        uri.path(),
        uri.query(),
        state.parse_options(),
    )?;

    tracing::debug!(
        user_id = %event.user_id,
        location = %event.location_name,
        entry = event.is_entry(),
        "Received geofence event"
    );

    state.processor.dispatch(event);
    Ok(ACCEPTED_BODY)
}
