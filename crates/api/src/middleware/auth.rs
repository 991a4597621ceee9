//! Basic auth extractor for the webhook handler.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;

use crate::error::AppError;
use crate::state::AppState;

/// Proof that the request passed the credential gate.
///
/// Put it first in a handler's argument list so rejected requests never
/// reach parsing:
///
/// ```ignore
/// async fn handler(_auth: BasicAuth, State(state): State<AppState>) -> AppResult<&'static str> {
///     Ok("OK")
/// }
/// ```
#[derive(Debug, Clone, Copy)]
pub struct BasicAuth;

impl FromRequestParts<AppState> for BasicAuth {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok());

        state.gate.authorize(header)?;
        Ok(BasicAuth)
    }
}
