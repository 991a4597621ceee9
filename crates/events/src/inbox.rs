//! Internal command channel.
//!
//! The host side pushes JSON payloads shaped like
//! `{"message": {"user": "alice", "data": {"name": "Home", ...}}}` into a
//! [`MessageInbox`]. [`InboxListener::run`] turns each into a
//! [`GeofenceEvent`] and dispatches it, skipping credential and query-string
//! checks. Payloads without a `user` or `data` are dropped silently.

use geozone_core::event::{GeofenceEvent, GeofenceParams};
use serde::Deserialize;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::mpsc;

use crate::processor::EventProcessor;

/// Default buffer capacity for the inbox channel.
const DEFAULT_CAPACITY: usize = 256;

#[derive(Debug, Deserialize)]
struct HostMessage {
    message: Option<MessageBody>,
}

#[derive(Debug, Deserialize)]
struct MessageBody {
    user: Option<String>,
    data: Option<GeofenceParams>,
}

/// Sending half of the inbox. Cheap to clone.
#[derive(Debug, Clone)]
pub struct MessageInbox {
    sender: mpsc::Sender<serde_json::Value>,
}

impl MessageInbox {
    /// Create an inbox with a specific channel capacity.
    pub fn new(capacity: usize) -> (Self, mpsc::Receiver<serde_json::Value>) {
        let (sender, receiver) = mpsc::channel(capacity);
        (Self { sender }, receiver)
    }

    pub fn with_default_capacity() -> (Self, mpsc::Receiver<serde_json::Value>) {
        Self::new(DEFAULT_CAPACITY)
    }

    /// Queue a payload. Returns `false` once the listener has stopped.
    pub async fn send(&self, payload: serde_json::Value) -> bool {
        self.sender.send(payload).await.is_ok()
    }
}

/// Decode an inbox payload into an event, or `None` if it must be dropped.
pub fn decode_message(payload: serde_json::Value) -> Option<GeofenceEvent> {
    let msg: HostMessage = serde_json::from_value(payload).ok()?;
    let body = msg.message?;
    let user = body.user.filter(|u| !u.is_empty())?;
    let data = body.data?;
    Some(GeofenceEvent::from_params(user, data))
}

/// Forward newline-delimited JSON payloads from `reader` into the inbox.
///
/// Lines that are blank or not JSON are skipped. Returns the number of
/// payloads forwarded once the reader is exhausted or the inbox is closed.
pub async fn forward_lines<R>(reader: R, inbox: MessageInbox) -> usize
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = reader.lines();
    let mut forwarded = 0;
    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => {
                tracing::warn!(error = %e, "Inbox reader failed");
                break;
            }
        };
        if line.trim().is_empty() {
            continue;
        }
        let Ok(payload) = serde_json::from_str::<serde_json::Value>(&line) else {
            tracing::debug!("Skipping non-JSON inbox line");
            continue;
        };
        if !inbox.send(payload).await {
            break;
        }
        forwarded += 1;
    }
    forwarded
}

/// Background service feeding inbox payloads to an [`EventProcessor`].
pub struct InboxListener;

impl InboxListener {
    /// Run the listener loop.
    ///
    /// The loop exits when every [`MessageInbox`] handle has been dropped.
    pub async fn run(processor: EventProcessor, mut receiver: mpsc::Receiver<serde_json::Value>) {
        while let Some(payload) = receiver.recv().await {
            match decode_message(payload) {
                Some(event) => {
                    tracing::info!(user_id = %event.user_id, "Message received");
                    processor.dispatch(event);
                }
                None => tracing::debug!("Dropping malformed inbox message"),
            }
        }
        tracing::info!("Inbox closed, listener shutting down");
    }
}
