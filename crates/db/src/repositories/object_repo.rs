//! Repository for the `objects` table.

use sqlx::{FromRow, PgPool};

use geozone_core::types::Timestamp;

/// A row from the `objects` table.
#[derive(Debug, Clone, FromRow)]
pub struct ObjectRow {
    pub id: String,
    pub kind: String,
    pub common: serde_json::Value,
    pub native: serde_json::Value,
    pub created_at: Timestamp,
}

const COLUMNS: &str = "id, kind, common, native, created_at";

pub struct ObjectRepo;

impl ObjectRepo {
    /// Find an object by id.
    pub async fn find(pool: &PgPool, id: &str) -> Result<Option<ObjectRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM objects WHERE id = $1");
        sqlx::query_as::<_, ObjectRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Insert an object unless the id is taken. Returns `true` when inserted.
    pub async fn insert_if_absent(
        pool: &PgPool,
        id: &str,
        kind: &str,
        common: &serde_json::Value,
        native: &serde_json::Value,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "INSERT INTO objects (id, kind, common, native) VALUES ($1, $2, $3, $4) \
             ON CONFLICT (id) DO NOTHING",
        )
        .bind(id)
        .bind(kind)
        .bind(common)
        .bind(native)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
