//! Normalized geofence events.
//!
//! A [`GeofenceEvent`] is built either from webhook query parameters or from
//! the `data` object of an internal inbox message. Both sources share the
//! [`GeofenceParams`] shape; missing fields become empty strings.

use serde::{Deserialize, Deserializer, Serialize};

use crate::naming::sanitize_location;
use crate::types::UserId;

/// Raw fields of a geofence notification, as sent by the mobile client.
///
/// Values are accepted as strings, numbers or booleans so the same type can
/// decode both a query string and a JSON payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GeofenceParams {
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub latitude: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub longitude: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub entry: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub date: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub device: Option<String>,
}

fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Str(String),
        Num(serde_json::Number),
        Bool(bool),
    }

    let raw = Option::<Raw>::deserialize(deserializer)?;
    Ok(raw.map(|r| match r {
        Raw::Str(s) => s,
        Raw::Num(n) => n.to_string(),
        Raw::Bool(b) => b.to_string(),
    }))
}

/// Direction of a geofence crossing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Transition {
    Enter,
    Leave,
}

impl Transition {
    /// Only the literal flag `"1"` means enter; anything else is a leave.
    pub fn from_flag(flag: Option<&str>) -> Self {
        match flag {
            Some("1") => Self::Enter,
            _ => Self::Leave,
        }
    }

    /// Whether the flag explicitly reports a leave (`"0"`), as opposed to
    /// being absent or unrecognized.
    pub fn is_explicit_leave_flag(flag: Option<&str>) -> bool {
        flag == Some("0")
    }

    /// Past-tense verb used in log lines.
    pub fn verb(self) -> &'static str {
        match self {
            Self::Enter => "entered",
            Self::Leave => "left",
        }
    }
}

/// One entry/exit notification for one user, ready for processing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeofenceEvent {
    pub user_id: UserId,
    pub location_name: String,
    pub latitude: String,
    pub longitude: String,
    pub transition: Transition,
    /// Source-provided date, unparsed.
    pub timestamp: String,
    pub device_id: Option<String>,
    /// `entry` flag as received; absent when the client sent none.
    pub entry_flag: Option<String>,
}

impl GeofenceEvent {
    pub fn from_params(user_id: impl Into<UserId>, params: GeofenceParams) -> Self {
        Self {
            user_id: user_id.into(),
            transition: Transition::from_flag(params.entry.as_deref()),
            location_name: params.name.unwrap_or_default(),
            latitude: params.latitude.unwrap_or_default(),
            longitude: params.longitude.unwrap_or_default(),
            timestamp: params.date.unwrap_or_default(),
            device_id: params.device.filter(|d| !d.is_empty()),
            entry_flag: params.entry,
        }
    }

    pub fn is_entry(&self) -> bool {
        self.transition == Transition::Enter
    }

    /// Only an explicit `entry=0` counts here; a missing or unknown flag is
    /// still processed as a leave but is not an explicit one.
    pub fn is_explicit_leave(&self) -> bool {
        Transition::is_explicit_leave_flag(self.entry_flag.as_deref())
    }

    /// Identifier-safe form of the location name.
    pub fn location_key(&self) -> String {
        sanitize_location(&self.location_name)
    }
}
