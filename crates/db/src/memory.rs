//! In-process [`StateStore`] backed by `tokio::sync::RwLock`ed maps.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::StoreError;
use crate::models::{StateValue, StoredObject};
use crate::store::StateStore;

/// Operation counters, useful to assert that a code path touched nothing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StoreStats {
    pub state_reads: u64,
    pub state_writes: u64,
    pub object_reads: u64,
    pub object_writes: u64,
}

impl StoreStats {
    pub fn total(&self) -> u64 {
        self.state_reads + self.state_writes + self.object_reads + self.object_writes
    }
}

/// Volatile store; contents are lost when the process exits.
#[derive(Debug, Default)]
pub struct MemoryStore {
    states: RwLock<HashMap<String, StateValue>>,
    objects: RwLock<HashMap<String, StoredObject>>,
    state_reads: AtomicU64,
    state_writes: AtomicU64,
    object_reads: AtomicU64,
    object_writes: AtomicU64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stats(&self) -> StoreStats {
        StoreStats {
            state_reads: self.state_reads.load(Ordering::Relaxed),
            state_writes: self.state_writes.load(Ordering::Relaxed),
            object_reads: self.object_reads.load(Ordering::Relaxed),
            object_writes: self.object_writes.load(Ordering::Relaxed),
        }
    }

    /// Current value of a state without counting it as a read.
    pub async fn peek(&self, id: &str) -> Option<serde_json::Value> {
        self.states.read().await.get(id).map(|s| s.val.clone())
    }

    /// Whether an object exists, without counting it as a read.
    pub async fn has_object(&self, id: &str) -> bool {
        self.objects.read().await.contains_key(id)
    }
}

#[async_trait]
impl StateStore for MemoryStore {
    async fn get_state(&self, id: &str) -> Result<Option<StateValue>, StoreError> {
        self.state_reads.fetch_add(1, Ordering::Relaxed);
        Ok(self.states.read().await.get(id).cloned())
    }

    async fn set_state(
        &self,
        id: &str,
        val: serde_json::Value,
        ack: bool,
    ) -> Result<(), StoreError> {
        self.state_writes.fetch_add(1, Ordering::Relaxed);
        self.states
            .write()
            .await
            .insert(id.to_string(), StateValue::new(val, ack));
        Ok(())
    }

    async fn get_object(&self, id: &str) -> Result<Option<StoredObject>, StoreError> {
        self.object_reads.fetch_add(1, Ordering::Relaxed);
        Ok(self.objects.read().await.get(id).cloned())
    }

    async fn set_object_if_absent(
        &self,
        id: &str,
        object: StoredObject,
    ) -> Result<bool, StoreError> {
        self.object_writes.fetch_add(1, Ordering::Relaxed);
        let mut objects = self.objects.write().await;
        if objects.contains_key(id) {
            return Ok(false);
        }
        objects.insert(id.to_string(), object);
        Ok(true)
    }
}
