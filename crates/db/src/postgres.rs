//! PostgreSQL-backed [`StateStore`].

use async_trait::async_trait;

use crate::error::StoreError;
use crate::models::{StateValue, StoredObject};
use crate::repositories::{ObjectRepo, StateRepo};
use crate::store::StateStore;
use crate::DbPool;

/// Durable store over the `states` and `objects` tables.
#[derive(Debug, Clone)]
pub struct PgStateStore {
    pool: DbPool,
}

impl PgStateStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl StateStore for PgStateStore {
    async fn get_state(&self, id: &str) -> Result<Option<StateValue>, StoreError> {
        let row = StateRepo::find(&self.pool, id).await?;
        Ok(row.map(|r| StateValue {
            val: r.val,
            ack: r.ack,
            ts: r.updated_at,
        }))
    }

    async fn set_state(
        &self,
        id: &str,
        val: serde_json::Value,
        ack: bool,
    ) -> Result<(), StoreError> {
        StateRepo::upsert(&self.pool, id, &val, ack).await?;
        Ok(())
    }

    async fn get_object(&self, id: &str) -> Result<Option<StoredObject>, StoreError> {
        let Some(row) = ObjectRepo::find(&self.pool, id).await? else {
            return Ok(None);
        };
        Ok(Some(StoredObject {
            kind: row.kind.parse()?,
            common: row.common,
            native: row.native,
        }))
    }

    async fn set_object_if_absent(
        &self,
        id: &str,
        object: StoredObject,
    ) -> Result<bool, StoreError> {
        let created = ObjectRepo::insert_if_absent(
            &self.pool,
            id,
            object.kind.as_str(),
            &object.common,
            &object.native,
        )
        .await?;
        if created {
            tracing::debug!(id, kind = %object.kind, "Object created");
        }
        Ok(created)
    }
}
