//! Service error types and their HTTP response mapping
//!
//! Every error a handler can surface is one variant here, so the status-code
//! policy lives in exactly one place. Client-input errors (bad identifier,
//! malformed batch, rejected upload) are reported before any persistence
//! side effect; not-found and duplicate-key are kept distinct from the
//! storage catch-all so clients can react to them.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Common result type for service operations
pub type Result<T> = std::result::Result<T, ServiceError>;

/// Errors surfaced by the user record service
#[derive(Error, Debug)]
pub enum ServiceError {
    /// Identifier did not parse as an integer
    #[error("Invalid identifier: {0:?}")]
    InvalidIdentifier(String),

    /// Bulk body was not a (non-empty) array of objects
    #[error("Invalid batch: {0}")]
    InvalidBatch(String),

    /// A bulk-update entry lacked its required id (`index` is zero-based)
    #[error("Missing id on batch entry at index {index}")]
    MissingIdentifier { index: usize },

    /// Uploaded attachment had a MIME type outside the allow-list
    #[error("Unsupported media type: {0}")]
    UnsupportedMediaType(String),

    /// Request body could not be assembled into a field map
    #[error("Invalid request body: {0}")]
    InvalidBody(String),

    /// No record with the given id
    #[error("User {0} not found")]
    RecordNotFound(i64),

    /// Uniqueness constraint violated (duplicate email)
    #[error("Duplicate value for unique field: {0}")]
    DuplicateKey(String),

    /// Unexpected repository failure
    #[error("Storage error: {0}")]
    Storage(#[source] sqlx::Error),

    /// Failure writing an accepted upload to the asset store
    #[error("Asset storage error: {0}")]
    AssetStorage(#[source] std::io::Error),
}

impl ServiceError {
    /// HTTP status for this error
    pub fn status(&self) -> StatusCode {
        match self {
            ServiceError::InvalidIdentifier(_)
            | ServiceError::InvalidBatch(_)
            | ServiceError::MissingIdentifier { .. }
            | ServiceError::InvalidBody(_) => StatusCode::BAD_REQUEST,
            ServiceError::UnsupportedMediaType(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            ServiceError::RecordNotFound(_) => StatusCode::NOT_FOUND,
            ServiceError::DuplicateKey(_) => StatusCode::CONFLICT,
            ServiceError::Storage(_) | ServiceError::AssetStorage(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("{}", self);
        }
        let body = Json(json!({
            "error": self.to_string(),
        }));
        (status, body).into_response()
    }
}

/// Map a repository failure, distinguishing uniqueness conflicts
///
/// Not-found is handled at the call sites via `fetch_optional`; everything
/// else funnels through here.
pub fn map_db_error(err: sqlx::Error) -> ServiceError {
    if let Some(db_err) = err.as_database_error() {
        if db_err.is_unique_violation() {
            return ServiceError::DuplicateKey("email".to_string());
        }
    }
    ServiceError::Storage(err)
}
