//! Stored state and object shapes.

use std::fmt;
use std::str::FromStr;

use geozone_core::types::Timestamp;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::error::StoreError;

/// Current value of a state id plus its acknowledgement flag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateValue {
    pub val: serde_json::Value,
    /// `true` when the value was written by this service rather than
    /// requested by a consumer.
    pub ack: bool,
    pub ts: Timestamp,
}

impl StateValue {
    pub fn new(val: serde_json::Value, ack: bool) -> Self {
        Self {
            val,
            ack,
            ts: chrono::Utc::now(),
        }
    }
}

/// Kind of a stored object definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ObjectKind {
    Device,
    State,
}

impl ObjectKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Device => "device",
            Self::State => "state",
        }
    }
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ObjectKind {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "device" => Ok(Self::Device),
            "state" => Ok(Self::State),
            other => Err(StoreError::UnknownKind(other.to_string())),
        }
    }
}

/// Object definition: the metadata entry that owns a state or groups states.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredObject {
    pub kind: ObjectKind,
    pub common: serde_json::Value,
    pub native: serde_json::Value,
}

impl StoredObject {
    /// Device object for a tracked user.
    pub fn device(user_id: &str, device_id: Option<&str>) -> Self {
        Self {
            kind: ObjectKind::Device,
            common: json!({ "id": user_id, "name": user_id }),
            native: json!({ "name": user_id, "device": device_id }),
        }
    }

    /// Read/write state object holding values of `value_type`.
    pub fn state(name: &str, value_type: &str) -> Self {
        Self {
            kind: ObjectKind::State,
            common: json!({
                "name": name,
                "read": true,
                "write": true,
                "type": value_type,
            }),
            native: json!({}),
        }
    }
}
