//! Server Module
//!
//! Initialization of the diagram store server.
//!
//! - **`config`** - Listen address from the environment
//! - **`state`** - Application state and `FromRef` extraction
//! - **`init`** - Builds the state and the router

/// Server configuration
pub mod config;

/// Application state
pub mod state;

/// Server initialization
pub mod init;

pub use config::ServerConfig;
pub use init::{create_app, create_app_with_state};
pub use state::AppState;
