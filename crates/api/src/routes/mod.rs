pub mod health;

use axum::Router;

use crate::handlers;
use crate::state::AppState;

/// Build the route tree.
///
/// ```text
/// /health        service health (JSON)
/// /<anything>    geofence webhook, any method; the handler rejects non-GET
/// ```
pub fn app_routes() -> Router<AppState> {
    Router::new()
        .merge(health::router())
        .fallback(handlers::webhook::receive)
}
