//! Diagram Store
//!
//! Server-side state for one shared diagram and its participant count, and
//! the HTTP handlers that expose them.
//!
//! # Endpoints
//!
//! - `GET /get-diagram` - current diagram text, `null` before the first save
//! - `POST /save-diagram` - overwrite the diagram (last write wins)
//! - `GET /user-count` - participant count
//! - `POST /add-user` / `POST /remove-user` - graceful join and leave
//! - `POST /user-beacon` - abrupt leave, body parsed regardless of content type

/// Diagram storage and user counter
pub mod state;

/// HTTP handlers
pub mod handlers;

pub use state::{DiagramStorage, StoreState, UserCounter};
