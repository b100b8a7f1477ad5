use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    /// Create/update body is not a usable JSON object.
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("item {0} not found")]
    NotFound(i64),
    /// Reading or writing the backing document failed.
    #[error("storage error: {0}")]
    Storage(String),
}

impl ServiceError {
    pub fn storage(e: impl std::fmt::Display) -> Self { Self::Storage(e.to_string()) }
}

impl From<models::errors::ModelError> for ServiceError {
    fn from(e: models::errors::ModelError) -> Self {
        match e {
            models::errors::ModelError::Validation(msg) => Self::InvalidInput(msg),
        }
    }
}
