//! State/object persistence for the geozone presence service.
//!
//! [`StateStore`] is the keyed, eventually-durable interface the presence
//! logic talks to. Two implementations ship with the crate:
//!
//! - [`MemoryStore`] -- process-local maps, the default backend and the one
//!   used throughout the tests.
//! - [`PgStateStore`] -- PostgreSQL tables `states` and `objects`.

use sqlx::postgres::PgPoolOptions;

pub mod error;
pub mod memory;
pub mod models;
pub mod postgres;
pub mod repositories;
pub mod store;

pub use error::StoreError;
pub use memory::MemoryStore;
pub use models::{ObjectKind, StateValue, StoredObject};
pub use postgres::PgStateStore;
pub use store::StateStore;

pub type DbPool = sqlx::PgPool;

/// Create a connection pool from a database URL.
pub async fn create_pool(database_url: &str) -> Result<DbPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(5)
        .connect(database_url)
        .await
}

/// Run a trivial query to make sure the database answers.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Apply all pending migrations from `crates/db/migrations`.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}
