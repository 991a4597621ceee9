//! Roster of users currently at the home location.
//!
//! Stored as two independent states:
//!
//! - `atHome` -- JSON text of an ordered, duplicate-free array of user ids.
//! - `atHomeCount` -- number mirroring the array length.
//!
//! An update reads the count, then the list, then writes back. The store has
//! no transactions, so two events changing membership at the same moment can
//! lose one of the changes. The count is rewritten whenever it disagrees with
//! the list length seen by an update, which repairs any earlier drift.

use std::sync::Arc;

use geozone_core::event::Transition;
use geozone_core::naming::is_home_location;
use geozone_db::{StateStore, StoreError};
use serde_json::json;

pub const AT_HOME: &str = "atHome";
pub const AT_HOME_COUNT: &str = "atHomeCount";

#[derive(Debug, thiserror::Error)]
pub enum RosterError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("atHome does not hold a list of user ids: {0}")]
    Corrupt(String),
}

/// Result of one roster update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RosterUpdate {
    /// The event was for some other location.
    NotHome,
    Applied {
        members: Vec<String>,
        /// `atHome` was written.
        membership_changed: bool,
        /// `atHomeCount` was written.
        count_written: bool,
    },
}

#[derive(Clone)]
pub struct PresenceRoster {
    store: Arc<dyn StateStore>,
    home_name: String,
}

impl PresenceRoster {
    pub fn new(store: Arc<dyn StateStore>, home_name: impl Into<String>) -> Self {
        Self {
            store,
            home_name: home_name.into(),
        }
    }

    /// Apply one event to the roster.
    ///
    /// Read failures abort before anything is written. Write failures are
    /// logged and the remaining steps still run.
    pub async fn update(
        &self,
        location_name: &str,
        transition: Transition,
        user_id: &str,
    ) -> Result<RosterUpdate, RosterError> {
        if !is_home_location(location_name, &self.home_name) {
            return Ok(RosterUpdate::NotHome);
        }

        let previous_count = self
            .store
            .get_state(AT_HOME_COUNT)
            .await?
            .map(|s| s.val)
            .unwrap_or_else(|| json!(0));

        let mut members = self.members().await?;
        let position = members.iter().position(|m| m == user_id);

        let membership_changed = match (transition, position) {
            (Transition::Enter, None) => {
                members.push(user_id.to_string());
                true
            }
            (Transition::Leave, Some(idx)) => {
                members.remove(idx);
                true
            }
            _ => false,
        };

        if membership_changed {
            let encoded = serde_json::to_string(&members).map_err(StoreError::from)?;
            if let Err(e) = self.store.set_state(AT_HOME, json!(encoded), true).await {
                tracing::error!(error = %e, user_id, "Failed to write atHome");
            }
        }

        let count = members.len() as u64;
        let count_written = previous_count.as_u64() != Some(count);
        if count_written {
            if let Err(e) = self.store.set_state(AT_HOME_COUNT, json!(count), true).await {
                tracing::error!(error = %e, count, "Failed to write atHomeCount");
            }
        }

        tracing::debug!(
            user_id,
            transition = transition.verb(),
            at_home = members.len(),
            membership_changed,
            count_written,
            "Roster updated"
        );

        Ok(RosterUpdate::Applied {
            members,
            membership_changed,
            count_written,
        })
    }

    /// Current `atHome` list; an absent or empty value is an empty roster.
    pub async fn members(&self) -> Result<Vec<String>, RosterError> {
        let Some(state) = self.store.get_state(AT_HOME).await? else {
            return Ok(Vec::new());
        };
        decode_members(&state.val)
    }
}

fn decode_members(val: &serde_json::Value) -> Result<Vec<String>, RosterError> {
    match val {
        serde_json::Value::Null => Ok(Vec::new()),
        serde_json::Value::String(s) if s.is_empty() => Ok(Vec::new()),
        serde_json::Value::String(s) => {
            serde_json::from_str(s).map_err(|e| RosterError::Corrupt(e.to_string()))
        }
        serde_json::Value::Array(_) => serde_json::from_value(val.clone())
            .map_err(|e| RosterError::Corrupt(e.to_string())),
        other => Err(RosterError::Corrupt(other.to_string())),
    }
}
