//! Common test utilities and helpers
//!
//! - Participant fixtures over a shared in-memory store
//! - Custom assertion macros

pub mod assertions;
pub mod fixtures;

pub use fixtures::*;
