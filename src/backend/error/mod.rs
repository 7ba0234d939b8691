//! Backend Error Module
//!
//! Error types returned by the store handlers. Every error converts into a
//! JSON response of the form:
//!
//! ```json
//! { "error": "Error message", "status": 400 }
//! ```
//!
//! # Module Structure
//!
//! ```text
//! error/
//! ├── mod.rs        - Module exports and documentation
//! ├── types.rs      - Error type definitions
//! └── conversion.rs - IntoResponse and extractor rejection conversions
//! ```

/// Error type definitions
pub mod types;

/// Error conversion implementations
pub mod conversion;

pub use types::BackendError;
