use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use geozone_core::error::CoreError;

/// Body sent with every rejected webhook request that got past the gate.
pub const REQUEST_ERROR_BODY: &str = "Request error";

/// Application-level error type for HTTP handlers.
///
/// The webhook client only ever sees three outcomes: 200, 403 with an empty
/// body, and 500 with [`REQUEST_ERROR_BODY`]. Details stay in the logs.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `geozone_core`.
    #[error(transparent)]
    Core(#[from] CoreError),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::Core(CoreError::Forbidden(reason)) => {
                tracing::warn!(%reason, "Rejected webhook request");
                StatusCode::FORBIDDEN.into_response()
            }
            AppError::Core(CoreError::Validation(reason)) => {
                tracing::warn!(%reason, "Invalid webhook request");
                (StatusCode::INTERNAL_SERVER_ERROR, REQUEST_ERROR_BODY).into_response()
            }
        }
    }
}
