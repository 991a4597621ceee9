#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Validation failed: {0}")]
    Validation(String),
}
