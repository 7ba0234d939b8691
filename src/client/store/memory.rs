//! In-process remote store
//!
//! Same semantics as the store server (last write wins, user count saturating
//! at zero) without the network. Every call is counted, writes are recorded
//! with their `tokio::time::Instant`, and outages can be switched on to
//! exercise the engine's failure paths.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use tokio::time::Instant;

use crate::client::error::StoreError;
use crate::client::store::{RemoteStore, UnloadTransport};
use crate::shared::AbruptSignal;

/// Number of calls received per operation
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct StoreCalls {
    pub add_session: usize,
    pub remove_session: usize,
    pub session_count: usize,
    pub read_document: usize,
    pub write_document: usize,
    /// Abrupt signals over an ordinary request
    pub signal_abrupt: usize,
    /// Abrupt signals over the survivable transport
    pub beacon: usize,
}

impl StoreCalls {
    /// Reads and writes of presence or document state
    pub fn traffic(&self) -> usize {
        self.session_count + self.read_document + self.write_document
    }
}

#[derive(Debug, Default)]
struct MemoryState {
    diagram: Option<String>,
    user_count: u64,
    calls: StoreCalls,
    writes: Vec<(Instant, String)>,
}

/// Remote store held in memory
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: Mutex<MemoryState>,
    unavailable: AtomicBool,
    reject_joins: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with an existing shared document
    pub fn with_diagram(text: impl Into<String>) -> Self {
        let store = Self::new();
        store.state().diagram = Some(text.into());
        store
    }

    fn state(&self) -> MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn ensure_available(&self) -> Result<(), StoreError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(StoreError::unavailable("memory store is offline"));
        }
        Ok(())
    }

    /// Fail every operation until switched back
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Reject `add_session` with a 503 until switched back
    pub fn reject_joins(&self, reject: bool) {
        self.reject_joins.store(reject, Ordering::SeqCst);
    }

    /// Overwrite the document as another participant would
    pub fn put_diagram(&self, text: impl Into<String>) {
        self.state().diagram = Some(text.into());
    }

    pub fn diagram(&self) -> Option<String> {
        self.state().diagram.clone()
    }

    pub fn user_count(&self) -> u64 {
        self.state().user_count
    }

    pub fn calls(&self) -> StoreCalls {
        self.state().calls
    }

    /// Every accepted document write, oldest first
    pub fn writes(&self) -> Vec<(Instant, String)> {
        self.state().writes.clone()
    }
}

#[async_trait]
impl RemoteStore for MemoryStore {
    async fn add_session(&self) -> Result<(), StoreError> {
        self.state().calls.add_session += 1;
        self.ensure_available()?;
        if self.reject_joins.load(Ordering::SeqCst) {
            return Err(StoreError::status(503, "joins disabled"));
        }
        self.state().user_count += 1;
        Ok(())
    }

    async fn remove_session(&self) -> Result<(), StoreError> {
        self.state().calls.remove_session += 1;
        self.ensure_available()?;
        let mut state = self.state();
        state.user_count = state.user_count.saturating_sub(1);
        Ok(())
    }

    async fn session_count(&self) -> Result<u64, StoreError> {
        self.state().calls.session_count += 1;
        self.ensure_available()?;
        Ok(self.state().user_count)
    }

    async fn read_document(&self) -> Result<Option<String>, StoreError> {
        self.state().calls.read_document += 1;
        self.ensure_available()?;
        Ok(self.state().diagram.clone())
    }

    async fn write_document(&self, text: &str) -> Result<(), StoreError> {
        self.state().calls.write_document += 1;
        self.ensure_available()?;
        let mut state = self.state();
        state.diagram = Some(text.to_string());
        state.writes.push((Instant::now(), text.to_string()));
        Ok(())
    }

    async fn signal_abrupt(&self, _signal: AbruptSignal) -> Result<(), StoreError> {
        self.state().calls.signal_abrupt += 1;
        self.ensure_available()?;
        let mut state = self.state();
        state.user_count = state.user_count.saturating_sub(1);
        Ok(())
    }
}

impl UnloadTransport for MemoryStore {
    fn send(&self, _signal: AbruptSignal) -> bool {
        let mut state = self.state();
        state.calls.beacon += 1;
        if self.unavailable.load(Ordering::SeqCst) {
            return false;
        }
        state.user_count = state.user_count.saturating_sub(1);
        true
    }
}
