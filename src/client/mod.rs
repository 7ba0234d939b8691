//! Diagram sync client
//!
//! Everything a participant needs to keep an editor in step with the shared
//! diagram: the store clients, the editor surface seam and the sync session
//! that drives them.
//!
//! - **`config`** - client configuration (env, TOML, builder)
//! - **`editor`** - [`EditorSurface`] seam and an in-memory surface
//! - **`error`** - store, editor and session errors
//! - **`store`** - [`RemoteStore`] over HTTP or in memory, and the unload beacon
//! - **`sync`** - [`SyncSession`] and its pollers, debouncer and session manager

pub mod config;
pub mod editor;
pub mod error;
pub mod store;
pub mod sync;

pub use config::Config;
pub use editor::{EditorSurface, InMemoryEditor, InteractionEvent, EMPTY_DIAGRAM};
pub use error::{EditorError, StoreError, SyncError};
pub use store::{
    AbruptDelivery, HttpBeacon, HttpStore, MemoryStore, RemoteStore, StoreCalls, UnloadTransport,
};
pub use sync::{SyncConfig, SyncSession, SyncStatus, Teardown, UnloadSignal};
