//! Diagram Collab - Main Library
//!
//! Keeps several participants' diagram editors in step through a shared
//! remote store, using periodic polling and debounced pushes instead of a
//! real-time transport.
//!
//! # Module Structure
//!
//! - **`shared`** - Types shared between client and server
//!   - Wire protocol payloads and endpoint paths
//!   - Configuration (`AppConfig`, `ReconcilePolicy`)
//!   - Error types
//!
//! - **`client`** - The sync engine
//!   - `SyncSession` with its session manager, pollers and change debouncer
//!   - `RemoteStore` over HTTP or in memory, unload beacon
//!   - `EditorSurface` seam
//!
//! - **`backend`** - Reference store server (only compiled with `ssr`)
//!   - Axum handlers for the diagram and the participant count
//!
//! # Feature Flags
//!
//! - **`ssr`** (default) - compiles the store server and its binary
//!
//! # Usage
//!
//! ## Server-Side
//!
//! ```rust,no_run
//! # #[cfg(feature = "ssr")]
//! # async fn example() -> std::io::Result<()> {
//! let app = diagram_collab::backend::create_app();
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await?;
//! axum::serve(listener, app).await
//! # }
//! ```
//!
//! ## Client
//!
//! See [`client::sync`] for a complete session example.
//!
//! # Consistency Model
//!
//! Last write wins at the store. Clients converge within roughly one poll
//! interval plus one debounce period after activity stops; concurrent edits
//! made within that window can be lost.

/// Shared types and data structures
pub mod shared;

/// Sync engine
pub mod client;

/// Backend server-side code
#[cfg(feature = "ssr")]
pub mod backend;
