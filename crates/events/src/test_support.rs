//! Store doubles for failure-path tests.

use std::collections::HashSet;

use async_trait::async_trait;
use geozone_db::{MemoryStore, StateStore, StateValue, StoreError, StoredObject};

/// [`MemoryStore`] wrapper that fails selected operations.
#[derive(Default)]
pub struct FlakyStore {
    pub inner: MemoryStore,
    failing_writes: HashSet<String>,
    fail_object_reads: bool,
    fail_state_reads: bool,
}

impl FlakyStore {
    pub fn failing_writes_to<'a>(ids: impl IntoIterator<Item = &'a str>) -> Self {
        Self {
            failing_writes: ids.into_iter().map(str::to_string).collect(),
            ..Default::default()
        }
    }

    pub fn failing_object_reads() -> Self {
        Self {
            fail_object_reads: true,
            ..Default::default()
        }
    }

    pub fn failing_state_reads() -> Self {
        Self {
            fail_state_reads: true,
            ..Default::default()
        }
    }
}

fn unavailable(what: &str) -> StoreError {
    StoreError::Unavailable(format!("injected failure: {what}"))
}

#[async_trait]
impl StateStore for FlakyStore {
    async fn get_state(&self, id: &str) -> Result<Option<StateValue>, StoreError> {
        if self.fail_state_reads {
            return Err(unavailable(id));
        }
        self.inner.get_state(id).await
    }

    async fn set_state(
        &self,
        id: &str,
        val: serde_json::Value,
        ack: bool,
    ) -> Result<(), StoreError> {
        if self.failing_writes.contains(id) {
            return Err(unavailable(id));
        }
        self.inner.set_state(id, val, ack).await
    }

    async fn get_object(&self, id: &str) -> Result<Option<StoredObject>, StoreError> {
        if self.fail_object_reads {
            return Err(unavailable(id));
        }
        self.inner.get_object(id).await
    }

    async fn set_object_if_absent(
        &self,
        id: &str,
        object: StoredObject,
    ) -> Result<bool, StoreError> {
        self.inner.set_object_if_absent(id, object).await
    }
}
