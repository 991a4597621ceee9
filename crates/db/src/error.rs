/// Failure of a single store operation.
///
/// Callers in the presence pipeline log these and move on; nothing is
/// retried.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Unknown object kind: {0}")]
    UnknownKind(String),

    #[error("Store unavailable: {0}")]
    Unavailable(String),
}
