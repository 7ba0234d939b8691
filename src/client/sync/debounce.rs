//! # Change Debouncer
//!
//! Turns editor interaction into document pushes. Pointer activity is only a
//! proxy for "the document may have changed", so every activity event re-arms
//! a quiet-period timer and the push happens once the surface has been quiet
//! for the whole period.
//!
//! The timer is a two-state machine ([`DebounceState`]): `Idle`, or
//! `Armed(deadline)`. Activity moves Idle to Armed or pushes the deadline
//! back; only reaching the deadline moves Armed to Idle and triggers the push.
//!
//! Pushes are issued on a detached task. A failed write is logged and dropped;
//! the next burst of activity produces a fresh push.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::broadcast::{self, error::RecvError};
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::client::editor::{EditorSurface, InteractionEvent};
use crate::client::store::RemoteStore;
use crate::client::sync::document::SyncedText;
use crate::client::sync::metrics::SyncMetrics;

/// Debounce timer state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DebounceState {
    Idle,
    Armed(Instant),
}

impl DebounceState {
    /// Record activity at `now`; the deadline becomes `now + quiet`
    pub fn on_activity(&mut self, now: Instant, quiet: Duration) {
        *self = DebounceState::Armed(now + quiet);
    }

    pub fn deadline(&self) -> Option<Instant> {
        match self {
            DebounceState::Idle => None,
            DebounceState::Armed(deadline) => Some(*deadline),
        }
    }

    /// Fire if the deadline has passed; returns whether a push is due
    pub fn fire(&mut self, now: Instant) -> bool {
        match *self {
            DebounceState::Armed(deadline) if now >= deadline => {
                *self = DebounceState::Idle;
                true
            }
            _ => false,
        }
    }
}

pub struct ChangeDebouncer {
    store: Arc<dyn RemoteStore>,
    editor: Arc<dyn EditorSurface>,
    synced: Arc<SyncedText>,
    metrics: Arc<SyncMetrics>,
    quiet: Duration,
    token: CancellationToken,
}

impl ChangeDebouncer {
    pub fn new(
        store: Arc<dyn RemoteStore>,
        editor: Arc<dyn EditorSurface>,
        synced: Arc<SyncedText>,
        metrics: Arc<SyncMetrics>,
        quiet: Duration,
        token: CancellationToken,
    ) -> Self {
        Self {
            store,
            editor,
            synced,
            metrics,
            quiet,
            token,
        }
    }

    /// Run the debouncer over an existing subscription
    ///
    /// The subscription is dropped when the task exits.
    pub fn spawn(self, events: broadcast::Receiver<InteractionEvent>) -> JoinHandle<()> {
        tokio::spawn(self.run(events))
    }

    async fn run(self, mut events: broadcast::Receiver<InteractionEvent>) {
        let mut state = DebounceState::Idle;
        let mut subscribed = true;

        loop {
            let deadline = state.deadline();
            tokio::select! {
                biased;
                _ = self.token.cancelled() => break,
                _ = tokio::time::sleep_until(deadline.unwrap_or_else(Instant::now)), if deadline.is_some() => {
                    if state.fire(Instant::now()) {
                        self.push();
                    }
                }
                received = events.recv(), if subscribed => match received {
                    Ok(event) if event.is_activity() => state.on_activity(Instant::now(), self.quiet),
                    Ok(event) => tracing::trace!("[Debounce] Ignoring {}", event),
                    Err(RecvError::Lagged(missed)) => {
                        tracing::debug!("[Debounce] Missed {} events", missed);
                        state.on_activity(Instant::now(), self.quiet);
                    }
                    Err(RecvError::Closed) => {
                        tracing::debug!("[Debounce] Editor closed its event channel");
                        subscribed = false;
                    }
                },
                else => break,
            }
        }

        tracing::debug!("[Debounce] Stopped");
    }

    /// Serialize the editor and issue a write
    fn push(&self) {
        if self.token.is_cancelled() {
            return;
        }
        let text = match self.editor.serialize_to_text() {
            Ok(text) => text,
            Err(e) => {
                self.metrics.record_serialize_failure();
                tracing::warn!("[Debounce] Skipping push, failed to serialize: {}", e);
                return;
            }
        };

        self.metrics.record_push();
        tracing::debug!("[Debounce] Pushing {} bytes", text.len());

        let store = self.store.clone();
        let synced = self.synced.clone();
        let metrics = self.metrics.clone();
        let token = self.token.clone();
        tokio::spawn(async move {
            let result = store.write_document(&text).await;
            if token.is_cancelled() {
                tracing::debug!("[Debounce] Session ended; discarding push result");
                return;
            }
            match result {
                Ok(()) => synced.set(text),
                Err(e) => {
                    metrics.record_push_failure();
                    tracing::warn!("[Debounce] Push failed: {}", e);
                }
            }
        });
    }
}
