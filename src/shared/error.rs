//! Wire Payload Errors
//!
//! Raised when a body exchanged between a sync client and the diagram store
//! cannot be turned into one of the protocol messages. The client surfaces
//! them as `StoreError::Decode`; the store server answers them with 400.
//!
//! # Usage
//!
//! ```rust
//! use diagram_collab::shared::{AbruptSignal, SharedError};
//!
//! let err = AbruptSignal::from_body(r#"{"action":"add_user"}"#).unwrap_err();
//! assert_eq!(err, SharedError::UnsupportedAction("add_user".to_string()));
//! ```
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SharedError {
    /// The body is not JSON of the expected shape
    #[error("Malformed payload: {0}")]
    Malformed(String),

    /// A well-formed beacon naming an action the store does not perform
    #[error("Unsupported beacon action '{0}'")]
    UnsupportedAction(String),
}

impl From<serde_json::Error> for SharedError {
    fn from(err: serde_json::Error) -> Self {
        Self::Malformed(err.to_string())
    }
}
