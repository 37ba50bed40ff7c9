use crate::models::ErrorBody;
use crate::schema::SchemaError;
use axum::{Json, http::StatusCode};
use thiserror::Error;
use tracing::error;

#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub message: String,
}

impl AppError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    /// Logs `err` and keeps only `message` for the response body.
    pub fn internal(message: impl Into<String>, err: impl std::error::Error) -> Self {
        let message = message.into();
        error!("{message}: {err}");
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message,
        }
    }
}

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        (self.status, Json(ErrorBody { error: self.message })).into_response()
    }
}

/// Failures of the document store. `Clone` so one failed connection attempt can
/// be reported to every caller that was waiting on it.
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    #[error("connection failed: {0}")]
    Connection(String),
    #[error("query failed: {0}")]
    Query(String),
    #[error("serialization failed: {0}")]
    Serialization(String),
    #[error("io error: {0}")]
    Io(String),
    #[error(transparent)]
    Schema(#[from] SchemaError),
}

impl From<std::io::Error> for StoreError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("unknown store backend `{0}` (expected `mongodb` or `file`)")]
    UnknownBackend(String),
}
