//! Per-user presence states.
//!
//! A user is represented by a device object `<user>` owning four string
//! states: `changed`, `location`, `lastLatitude` and `lastLongitude`. The
//! objects are created the first time a user reports; the values are written
//! on every processed event.

use std::sync::Arc;

use geozone_core::event::GeofenceEvent;
use geozone_core::naming::user_state_id;
use geozone_core::timestamp::format_display;
use geozone_db::{StateStore, StoredObject};
use serde_json::json;

pub const USER_FIELDS: [&str; 4] = ["changed", "location", "lastLatitude", "lastLongitude"];

/// What one [`UserStateWriter::record`] call did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UserWriteSummary {
    /// The device object did not exist and creation was attempted.
    pub created: bool,
    pub writes: usize,
    pub failed_writes: usize,
}

#[derive(Clone)]
pub struct UserStateWriter {
    store: Arc<dyn StateStore>,
}

impl UserStateWriter {
    pub fn new(store: Arc<dyn StateStore>) -> Self {
        Self { store }
    }

    /// Create the user's objects if needed, then write the event's values.
    ///
    /// Store failures never abort the call: a failed lookup is treated as an
    /// unknown user, and each failed write is logged and skipped.
    pub async fn record(&self, event: &GeofenceEvent) -> UserWriteSummary {
        let user_id = event.user_id.as_str();

        let known = match self.store.get_object(user_id).await {
            Ok(obj) => obj.is_some(),
            Err(e) => {
                tracing::warn!(error = %e, user_id, "User lookup failed, recreating objects");
                false
            }
        };

        let mut summary = UserWriteSummary::default();
        if !known {
            self.create_objects(event).await;
            summary.created = true;
        }

        let changed = format_display(&event.timestamp);
        let mut values = vec![("changed", json!(changed))];
        if event.is_entry() {
            values.push(("location", json!(event.location_name)));
            values.push(("lastLatitude", json!(event.latitude)));
            values.push(("lastLongitude", json!(event.longitude)));
        } else {
            values.push(("location", json!("")));
        }

        for (field, val) in values {
            let id = user_state_id(user_id, field);
            summary.writes += 1;
            if let Err(e) = self.store.set_state(&id, val, true).await {
                summary.failed_writes += 1;
                tracing::error!(error = %e, state = %id, "State write failed");
            }
        }

        summary
    }

    async fn create_objects(&self, event: &GeofenceEvent) {
        let user_id = event.user_id.as_str();
        tracing::debug!(user_id, "Creating device");

        let device = StoredObject::device(user_id, event.device_id.as_deref());
        if let Err(e) = self.store.set_object_if_absent(user_id, device).await {
            tracing::error!(error = %e, user_id, "Failed to create device object");
        }

        for field in USER_FIELDS {
            let id = user_state_id(user_id, field);
            let object = StoredObject::state(field, "string");
            if let Err(e) = self.store.set_object_if_absent(&id, object).await {
                tracing::error!(error = %e, state = %id, "Failed to create state object");
            }
        }
    }
}
