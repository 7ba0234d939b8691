//! # Remote Store
//!
//! The shared diagram and the participant count live on a remote store. The
//! engine reaches it through [`RemoteStore`]; teardown during host unload goes
//! through the separate [`UnloadTransport`] capability because ordinary async
//! requests are not guaranteed to finish once the host starts closing.
//!
//! ## Implementations
//!
//! - [`HttpStore`] - reqwest client for the store server's JSON endpoints
//! - [`HttpBeacon`] - survivable transport that sends the unload signal on a
//!   dedicated OS thread, outside the async runtime
//! - [`MemoryStore`] - in-process store with call accounting and outage
//!   injection, for offline hosts and tests

pub mod beacon;
pub mod http;
pub mod memory;

use async_trait::async_trait;

use crate::client::error::StoreError;
use crate::shared::AbruptSignal;

pub use beacon::HttpBeacon;
pub use http::HttpStore;
pub use memory::{MemoryStore, StoreCalls};

/// Operations of the remote store
///
/// The store has no consistency model beyond last write wins.
#[async_trait]
pub trait RemoteStore: Send + Sync + 'static {
    /// Register one participant; resolves after the store acknowledges it
    async fn add_session(&self) -> Result<(), StoreError>;

    /// Graceful removal of one participant
    async fn remove_session(&self) -> Result<(), StoreError>;

    /// Current participant count
    async fn session_count(&self) -> Result<u64, StoreError>;

    /// Current shared document, `None` if nothing was written yet
    async fn read_document(&self) -> Result<Option<String>, StoreError>;

    /// Overwrite the shared document
    async fn write_document(&self, text: &str) -> Result<(), StoreError>;

    /// Deliver an abrupt-teardown signal over an ordinary request
    ///
    /// Used only when no survivable transport exists; completion is not
    /// guaranteed.
    async fn signal_abrupt(&self, signal: AbruptSignal) -> Result<(), StoreError>;
}

/// Transport that survives host teardown
///
/// `send` must hand the signal off without waiting on the async runtime:
/// by the time it is called the runtime may be shutting down. The return value
/// reports whether the transport accepted the signal, never whether the store
/// received it.
pub trait UnloadTransport: Send + Sync + 'static {
    fn send(&self, signal: AbruptSignal) -> bool;
}

/// How an abrupt-teardown signal left the client
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AbruptDelivery {
    /// The survivable transport accepted the signal
    Queued,
    /// A survivable transport exists but refused the signal
    Refused,
    /// No survivable transport; an ordinary request was spawned with no guarantee
    BestEffort,
    /// No survivable transport and no runtime to spawn a request on
    Dropped,
}
