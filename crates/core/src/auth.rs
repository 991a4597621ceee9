//! HTTP Basic credential gate for the webhook endpoint.
//!
//! The gate is disabled when neither a username nor a password is
//! configured. Otherwise every request must carry
//! `Authorization: Basic <base64(user:pass)>` with an exact match.

use base64::prelude::*;

use crate::error::CoreError;

/// Username/password pair decoded from a Basic `Authorization` header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BasicCredentials {
    pub username: String,
    pub password: String,
}

impl BasicCredentials {
    /// Decode an `Authorization` header value.
    ///
    /// Returns `None` for any scheme other than `Basic`, for payloads that are
    /// not valid base64 or UTF-8, and for payloads without a `:` separator.
    /// Only the first `:` separates username from password.
    pub fn from_header(value: &str) -> Option<Self> {
        let (scheme, payload) = value.trim().split_once(' ')?;
        if !scheme.eq_ignore_ascii_case("basic") {
            return None;
        }

        let decoded = BASE64_STANDARD.decode(payload.trim()).ok()?;
        let plain = String::from_utf8(decoded).ok()?;
        let (username, password) = plain.split_once(':')?;

        Some(Self {
            username: username.to_string(),
            password: password.to_string(),
        })
    }

    /// Encode as an `Authorization` header value.
    pub fn to_header(&self) -> String {
        let plain = format!("{}:{}", self.username, self.password);
        format!("Basic {}", BASE64_STANDARD.encode(plain))
    }
}

/// Configured credentials checked against every webhook request.
#[derive(Debug, Clone, Default)]
pub struct CredentialGate {
    user: String,
    pass: String,
}

impl CredentialGate {
    pub fn new(user: impl Into<String>, pass: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            pass: pass.into(),
        }
    }

    /// Whether credentials are required at all.
    pub fn is_enabled(&self) -> bool {
        !self.user.is_empty() || !self.pass.is_empty()
    }

    /// Check the raw `Authorization` header value of a request.
    ///
    /// The error message never contains the submitted credentials.
    pub fn authorize(&self, header: Option<&str>) -> Result<(), CoreError> {
        if !self.is_enabled() {
            return Ok(());
        }

        let header = header.ok_or_else(|| {
            CoreError::Forbidden("Authorization header missing but user/pass defined".into())
        })?;

        let credentials = BasicCredentials::from_header(header)
            .ok_or_else(|| CoreError::Forbidden("Malformed Basic authorization header".into()))?;

        if credentials.username != self.user || credentials.password != self.pass {
            return Err(CoreError::Forbidden("User credentials invalid".into()));
        }

        Ok(())
    }

    /// Boolean form of [`authorize`](Self::authorize).
    pub fn is_allowed(&self, header: Option<&str>) -> bool {
        self.authorize(header).is_ok()
    }
}
