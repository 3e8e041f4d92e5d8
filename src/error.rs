use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::schemas::ErrorResponse;
use crate::storage::StorageError;

/// HTTP-facing error taxonomy. Handlers map storage failures into one of
/// these per endpoint; the default `From` impl covers the common cases.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    Unauthorized(String),
    #[error("{0}")]
    NotFound(String),
    #[error("internal error: {0}")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::Internal(msg) => {
                tracing::error!("request failed: {msg}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal server error".to_string(),
                )
            }
        };

        (status, Json(ErrorResponse { message })).into_response()
    }
}

impl From<StorageError> for ApiError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::NotFound(what) => ApiError::NotFound(format!("{what} not found")),
            StorageError::Conflict(msg) => ApiError::BadRequest(msg),
            StorageError::Database(db_err) => ApiError::Internal(db_err.to_string()),
        }
    }
}

impl ApiError {
    /// For endpoints where a missing reference arrived in the request body:
    /// a stale or bogus id is a bad payload, not a missing resource.
    pub fn bad_reference(err: StorageError) -> Self {
        match err {
            StorageError::NotFound(what) => {
                ApiError::BadRequest(format!("referenced {what} does not exist"))
            }
            other => other.into(),
        }
    }
}
