//! Repository for the `states` table.

use sqlx::{FromRow, PgPool};

use geozone_core::types::Timestamp;

/// A row from the `states` table.
#[derive(Debug, Clone, FromRow)]
pub struct StateRow {
    pub id: String,
    pub val: serde_json::Value,
    pub ack: bool,
    pub updated_at: Timestamp,
}

const COLUMNS: &str = "id, val, ack, updated_at";

pub struct StateRepo;

impl StateRepo {
    /// Find a state by id.
    pub async fn find(pool: &PgPool, id: &str) -> Result<Option<StateRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM states WHERE id = $1");
        sqlx::query_as::<_, StateRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Insert or overwrite a state value.
    pub async fn upsert(
        pool: &PgPool,
        id: &str,
        val: &serde_json::Value,
        ack: bool,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO states (id, val, ack) VALUES ($1, $2, $3) \
             ON CONFLICT (id) DO UPDATE \
             SET val = EXCLUDED.val, ack = EXCLUDED.ack, updated_at = now()",
        )
        .bind(id)
        .bind(val)
        .bind(ack)
        .execute(pool)
        .await?;
        Ok(())
    }
}
