//! Presence processing for geofence events.
//!
//! - [`UserStateWriter`] -- per-user `changed` / `location` / coordinate states.
//! - [`PresenceRoster`] -- the shared `atHome` list and `atHomeCount` mirror.
//! - [`EventProcessor`] -- runs both for one event, in the foreground or as a
//!   tracked background task.
//! - [`MessageInbox`] -- internal command channel feeding the processor
//!   without going through HTTP.

pub mod inbox;
pub mod processor;
pub mod roster;
pub mod user_state;

#[cfg(test)]
pub(crate) mod test_support;

pub use inbox::{forward_lines, InboxListener, MessageInbox};
pub use processor::{EventProcessor, PresenceConfig, ProcessOutcome};
pub use roster::{PresenceRoster, RosterError, RosterUpdate, AT_HOME, AT_HOME_COUNT};
pub use user_state::{UserStateWriter, UserWriteSummary, USER_FIELDS};
