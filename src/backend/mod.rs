//! Backend Module
//!
//! Reference diagram store server. It keeps the shared diagram and the
//! participant count in memory and exposes them over flat JSON endpoints
//! that sync clients poll.
//!
//! This module is only compiled when the `ssr` feature is enabled.
//!
//! # Architecture
//!
//! - **`server`** - Server initialization, application state, configuration
//! - **`routes`** - Router assembly and CORS
//! - **`diagram`** - Diagram storage, user counter and their handlers
//! - **`error`** - Backend-specific error types
//!
//! # Module Structure
//!
//! ```text
//! backend/
//! ├── mod.rs      - Module exports and documentation
//! ├── server/     - Server initialization and state
//! ├── routes/     - Route configuration
//! ├── diagram/    - Diagram and presence endpoints
//! └── error/      - Backend error types
//! ```
//!
//! # Consistency
//!
//! Last write wins. Writes are not versioned and concurrent saves simply
//! overwrite each other; the user count never goes below zero.

/// Server initialization and configuration
pub mod server;

/// Route configuration
pub mod routes;

/// Diagram storage and presence endpoints
pub mod diagram;

/// Backend error types
pub mod error;

pub use error::BackendError;
pub use server::init::create_app;
