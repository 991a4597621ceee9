//! Request extractors guarding the webhook.
//!
//! - [`auth::BasicAuth`] -- enforces the configured Basic credentials.

pub mod auth;
