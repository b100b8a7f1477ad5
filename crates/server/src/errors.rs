use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use service::errors::ServiceError;
use thiserror::Error;
use tracing::{debug, error};

pub const ITEM_NOT_FOUND: &str = "Item not found";
pub const INVALID_ITEM_DATA: &str = "Invalid item data";
pub const STORAGE_ERROR: &str = "Storage error";

/// Error body of the form `{"message": ...}`.
#[derive(Debug)]
pub struct JsonApiError {
    pub status: StatusCode,
    pub message: String,
}

impl JsonApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self { status, message: message.into() }
    }

    pub fn not_found() -> Self {
        Self::new(StatusCode::NOT_FOUND, ITEM_NOT_FOUND)
    }
}

impl IntoResponse for JsonApiError {
    fn into_response(self) -> Response {
        (self.status, Json(serde_json::json!({ "message": self.message }))).into_response()
    }
}

impl From<ServiceError> for JsonApiError {
    fn from(e: ServiceError) -> Self {
        match e {
            ServiceError::InvalidInput(reason) => {
                debug!(%reason, "rejected item payload");
                Self::new(StatusCode::BAD_REQUEST, INVALID_ITEM_DATA)
            }
            ServiceError::NotFound(_) => Self::not_found(),
            ServiceError::Storage(msg) => {
                error!(error = %msg, "item store failure");
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, STORAGE_ERROR)
            }
        }
    }
}

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("storage initialization failed: {0}")]
    Storage(#[from] ServiceError),
    #[error(transparent)]
    Any(#[from] anyhow::Error),
}
