//! Event processing pipeline shared by the webhook and the inbox.

use std::sync::Arc;

use geozone_core::event::GeofenceEvent;
use geozone_db::StateStore;
use tokio_util::task::TaskTracker;
use tracing::Instrument;

use crate::roster::{PresenceRoster, RosterUpdate};
use crate::user_state::{UserStateWriter, UserWriteSummary};

/// Settings that change how events are applied.
#[derive(Debug, Clone, Default)]
pub struct PresenceConfig {
    /// Location name whose enter/leave events drive the roster.
    pub home_name: String,
    /// Drop explicit leave events (`entry=0`) before any state is touched.
    pub ignore_leaving: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProcessOutcome {
    IgnoredLeave,
    Recorded {
        user: UserWriteSummary,
        /// `None` when the roster update failed; the failure is logged.
        roster: Option<RosterUpdate>,
    },
}

/// Applies geofence events to the store.
///
/// [`dispatch`](Self::dispatch) runs an event as a background task and
/// returns at once; callers only learn that the event was accepted.
/// Background tasks are tracked so shutdown can wait for them.
#[derive(Clone)]
pub struct EventProcessor {
    writer: UserStateWriter,
    roster: PresenceRoster,
    ignore_leaving: bool,
    tracker: TaskTracker,
}

impl EventProcessor {
    pub fn new(store: Arc<dyn StateStore>, config: PresenceConfig) -> Self {
        Self {
            writer: UserStateWriter::new(Arc::clone(&store)),
            roster: PresenceRoster::new(store, config.home_name),
            ignore_leaving: config.ignore_leaving,
            tracker: TaskTracker::new(),
        }
    }

    pub fn roster(&self) -> &PresenceRoster {
        &self.roster
    }

    /// Apply one event and wait for all of its store operations.
    pub async fn process(&self, event: GeofenceEvent) -> ProcessOutcome {
        if self.ignore_leaving && event.is_explicit_leave() {
            tracing::debug!(user_id = %event.user_id, "Ignoring leaving message (as configured)");
            return ProcessOutcome::IgnoredLeave;
        }

        tracing::info!(
            user_id = %event.user_id,
            transition = event.transition.verb(),
            location = %event.location_name,
            "Location changed"
        );

        let user = self.writer.record(&event).await;

        let roster = match self
            .roster
            .update(&event.location_name, event.transition, &event.user_id)
            .await
        {
            Ok(update) => Some(update),
            Err(e) => {
                tracing::error!(error = %e, user_id = %event.user_id, "Roster update failed");
                None
            }
        };

        ProcessOutcome::Recorded { user, roster }
    }

    /// Process an event in a tracked background task.
    pub fn dispatch(&self, event: GeofenceEvent) {
        let span = tracing::info_span!(
            "geofence_event",
            user_id = %event.user_id,
            location_key = %event.location_key(),
        );
        let processor = self.clone();
        self.tracker.spawn(
            async move {
                processor.process(event).await;
            }
            .instrument(span),
        );
    }

    /// Number of background tasks still running.
    pub fn in_flight(&self) -> usize {
        self.tracker.len()
    }

    /// Wait until every dispatched event has been applied.
    ///
    /// Events dispatched while waiting are waited for as well.
    pub async fn wait_idle(&self) {
        self.tracker.close();
        self.tracker.wait().await;
        self.tracker.reopen();
    }
}
