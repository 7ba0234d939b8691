//! Shared Module
//!
//! This module contains types that are shared between the sync client and the
//! store server. These types describe the wire protocol and the configuration
//! both sides agree on.
//!
//! # Overview
//!
//! The shared module provides platform-agnostic types that can be used in
//! both server and client code. All wire types are designed for JSON
//! serialization and transmission over HTTP.

/// Wire payloads and endpoint paths
pub mod protocol;

/// Shared error types
pub mod error;

/// Application configuration
pub mod config;

/// Re-export commonly used types for convenience
pub use config::{AppConfig, AppConfigBuilder, ConfigError, ReconcilePolicy};
pub use error::SharedError;
pub use protocol::{
    AbruptAction, AbruptSignal, DiagramResponse, SaveDiagramRequest, StatusAck, UserCountAck,
    UserCountResponse,
};
