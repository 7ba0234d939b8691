//! Client Error Types
//!
//! Errors raised by the sync engine and its collaborators.
//!
//! # Error Categories
//!
//! - `StoreError` - the remote store could not be reached or rejected a request
//! - `EditorError` - the editor surface failed to load or serialize a document
//! - `SyncError` - lifecycle misuse of a `SyncSession`, or a failed join
//!
//! Only `SyncError` ever reaches a caller. Store and editor failures inside the
//! scheduled activities are logged and swallowed so the next tick can proceed.

use thiserror::Error;

use crate::shared::{ConfigError, SharedError};

/// Failure talking to the remote store
///
/// Transport failures and non-success statuses are handled identically by the
/// engine; the split only exists for logging.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Network unreachable, timeout, connection reset
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The store answered with a non-success status
    #[error("Store rejected request: {status} - {body}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Response body, possibly empty
        body: String,
    },

    /// The response body did not match the expected payload
    #[error("Failed to decode store response: {0}")]
    Decode(#[from] SharedError),

    /// The store is not available (used by in-memory stores to simulate outages)
    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

impl StoreError {
    pub fn status(status: u16, body: impl Into<String>) -> Self {
        Self::Status {
            status,
            body: body.into(),
        }
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable(message.into())
    }
}

/// Failure inside the editor surface
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EditorError {
    /// The in-memory model could not be serialized
    #[error("Failed to serialize diagram: {0}")]
    Serialize(String),

    /// The text could not be loaded into a fresh model
    #[error("Failed to load diagram: {0}")]
    Load(String),

    /// The surface has been destroyed and no longer holds a model
    #[error("Editor surface has been destroyed")]
    Destroyed,
}

/// Lifecycle errors of a sync session
#[derive(Debug, Error)]
pub enum SyncError {
    /// The store did not acknowledge the join; the session stays inert
    #[error("Failed to join session: {0}")]
    Join(#[source] StoreError),

    /// `start()` was called on a session that is already running
    #[error("Session is already running")]
    AlreadyStarted,

    /// `start()` was called on a session that has been torn down
    #[error("Session has been stopped")]
    AlreadyStopped,

    /// Invalid sync configuration
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),
}
