/**
 * Backend Error Types
 *
 * Errors produced while handling store requests.
 *
 * # Error Categories
 *
 * ## Handler Errors
 *
 * The request could not be accepted as sent: a body that is not valid JSON,
 * a missing field, or an unsupported content type. The status code comes
 * from the rejection itself.
 *
 * ## Shared Errors
 *
 * Payload errors raised by the wire protocol types: a beacon body that is not
 * JSON, or one naming an action the store does not perform. Both are the
 * sender's fault and answer 400.
 */

use axum::http::StatusCode;
use thiserror::Error;

use crate::shared::SharedError;

/// Backend-specific error types
///
/// ```rust
/// use axum::http::StatusCode;
/// use diagram_collab::backend::error::BackendError;
///
/// let err = BackendError::handler(StatusCode::BAD_REQUEST, "Invalid request");
/// assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
/// ```
#[derive(Debug, Error)]
pub enum BackendError {
    /// Request rejected before reaching the store
    #[error("Handler error: {message}")]
    HandlerError {
        /// HTTP status code for this error
        status: StatusCode,
        /// Human-readable error message
        message: String,
    },

    /// Error raised by the shared protocol types
    #[error(transparent)]
    SharedError(#[from] SharedError),
}

impl BackendError {
    /// Create a new handler error with a status code
    pub fn handler(status: StatusCode, message: impl Into<String>) -> Self {
        Self::HandlerError {
            status,
            message: message.into(),
        }
    }

    /// Get the HTTP status code for this error
    ///
    /// - `HandlerError` - the status code carried by the error
    /// - `SharedError` - 400, the payload came from the client
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::HandlerError { status, .. } => *status,
            Self::SharedError(_) => StatusCode::BAD_REQUEST,
        }
    }

    /// Get the error message
    pub fn message(&self) -> String {
        match self {
            Self::HandlerError { message, .. } => message.clone(),
            Self::SharedError(err) => err.to_string(),
        }
    }
}
