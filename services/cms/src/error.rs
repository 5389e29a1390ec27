//! services/cms/src/error.rs
//!
//! Defines the primary error type for the entire web service.

use crate::config::ConfigError;
use axum::{
    extract::multipart::MultipartError,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use cms_core::{DocumentError, PortError};
use tracing::error;

/// The primary error type for the `cms` service.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Represents an error that occurred during configuration loading.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Represents an error that propagated up from one of the core service ports.
    #[error("Service Port Error: {0}")]
    Port(#[from] PortError),

    /// Represents a document operation that failed for a reason the handler does not expect.
    #[error("Document Error: {0}")]
    Document(#[from] DocumentError),

    /// Represents a malformed multipart upload.
    #[error("Multipart Error: {0}")]
    Multipart(#[from] MultipartError),

    /// Represents a standard Input/Output error (e.g., binding to a network socket).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A catch-all for any other unexpected errors.
    #[error("An unexpected internal error occurred: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    /// Storage failures are not retried; the cause is logged and the client
    /// gets a plain-text status.
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::Port(PortError::NotFound(_)) => StatusCode::NOT_FOUND,
            AppError::Document(e) if e.is_missing() => StatusCode::NOT_FOUND,
            AppError::Document(DocumentError::Name(_) | DocumentError::Upload(_)) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            AppError::Multipart(e) => e.status(),
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        error!("Request failed: {}", self);
        let message = status
            .canonical_reason()
            .unwrap_or("Internal Server Error")
            .to_string();
        (status, message).into_response()
    }
}
