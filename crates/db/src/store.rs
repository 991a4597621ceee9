use async_trait::async_trait;

use crate::error::StoreError;
use crate::models::{StateValue, StoredObject};

/// Keyed state/object store.
///
/// Every call succeeds or fails on its own; there are no transactions across
/// ids. Callers that read a value and write a derived value back must accept
/// that a concurrent writer can interleave.
#[async_trait]
pub trait StateStore: Send + Sync {
    /// Current value of a state, or `None` if it was never written.
    async fn get_state(&self, id: &str) -> Result<Option<StateValue>, StoreError>;

    /// Overwrite a state value (last write wins).
    async fn set_state(
        &self,
        id: &str,
        val: serde_json::Value,
        ack: bool,
    ) -> Result<(), StoreError>;

    /// Object definition for `id`, or `None`.
    async fn get_object(&self, id: &str) -> Result<Option<StoredObject>, StoreError>;

    /// Create an object unless one already exists. Returns `true` when created.
    async fn set_object_if_absent(
        &self,
        id: &str,
        object: StoredObject,
    ) -> Result<bool, StoreError>;
}
