//! Route Configuration Module
//!
//! Assembles the store endpoints into one router:
//!
//! - `GET /get-diagram`, `POST /save-diagram`
//! - `GET /user-count`, `POST /add-user`, `POST /remove-user`
//! - `POST /user-beacon`
//!
//! Unknown paths fall through to a 404.

/// Main router creation
pub mod router;

pub use router::create_router;
