//! Integration tests
//!
//! - `sync_session_test` - engine scenarios against the in-memory store
//! - `http_store_test` - HTTP store and beacon against a mock server
//! - `store_server_test` - store server endpoints through `oneshot`
//! - `end_to_end_test` - sync sessions against a live store server

pub mod http_store_test;
pub mod sync_session_test;

#[cfg(feature = "ssr")]
pub mod end_to_end_test;
