//! Webhook request validation.
//!
//! The presence check is a literal substring test on the raw query string:
//! `longitude2=1` satisfies the `longitude` requirement. Stricter decoding is
//! available through [`ParseOptions::strict`].

use crate::error::CoreError;
use crate::event::{GeofenceEvent, GeofenceParams};

/// Substrings every webhook query string must contain.
pub const REQUIRED_FIELDS: [&str; 3] = ["name", "latitude", "longitude"];

#[derive(Debug, Clone, Copy, Default)]
pub struct ParseOptions {
    /// Also require `name`, `latitude` and `longitude` as decoded keys.
    pub strict: bool,
}

/// Validate a webhook request and extract its event.
///
/// `path` is the URL path (`/alice`), `query` the raw query string without
/// the leading `?`. The user id is the path with its leading `/` removed and
/// may be empty.
pub fn parse_request(
    method: &str,
    path: &str,
    query: Option<&str>,
    options: ParseOptions,
) -> Result<GeofenceEvent, CoreError> {
    if method != "GET" {
        return Err(CoreError::Validation(format!(
            "unsupported method {method}"
        )));
    }

    let query = query.unwrap_or_default();
    if let Some(missing) = REQUIRED_FIELDS.iter().find(|f| !query.contains(*f)) {
        return Err(CoreError::Validation(format!(
            "query string does not mention {missing}"
        )));
    }

    // Undecodable input degrades to an empty parameter set; the substring
    // check above is the only hard requirement.
    let pairs: Vec<(String, String)> = serde_urlencoded::from_str(query).unwrap_or_default();
    let params = params_from_pairs(&pairs);

    if options.strict {
        let present = [&params.name, &params.latitude, &params.longitude];
        if let Some((field, _)) = REQUIRED_FIELDS
            .iter()
            .zip(present)
            .find(|(_, value)| value.is_none())
        {
            return Err(CoreError::Validation(format!("missing parameter {field}")));
        }
    }

    let user_id = path.strip_prefix('/').unwrap_or(path);
    Ok(GeofenceEvent::from_params(user_id, params))
}

/// Build parameters from decoded pairs. A repeated key keeps its first value.
fn params_from_pairs(pairs: &[(String, String)]) -> GeofenceParams {
    let first = |key: &str| {
        pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.clone())
    };
    GeofenceParams {
        name: first("name"),
        latitude: first("latitude"),
        longitude: first("longitude"),
        entry: first("entry"),
        date: first("date"),
        device: first("device"),
    }
}
