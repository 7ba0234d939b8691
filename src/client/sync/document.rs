//! # Document Poller
//!
//! Pulls the shared document every period and reconciles it into the editor
//! surface by full replacement.
//!
//! - no document on the store: initialize an empty diagram, only if the editor
//!   holds nothing yet
//! - otherwise: load the fetched text, subject to the [`ReconcilePolicy`]
//!
//! Under `SkipUnchanged` the fetched text is compared with [`SyncedText`], the
//! last text known to match the store. Both this poller (after a load) and the
//! change debouncer (after a landed push) update it, so a poll that returns
//! this client's own push does not reload it.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::client::editor::EditorSurface;
use crate::client::store::RemoteStore;
use crate::client::sync::metrics::SyncMetrics;
use crate::client::sync::scheduler::{detached, RepeatingTask};
use crate::shared::ReconcilePolicy;

/// Last document text known to be in sync with the store
#[derive(Debug, Default)]
pub struct SyncedText(Mutex<Option<String>>);

impl SyncedText {
    pub fn new() -> Self {
        Self::default()
    }

    fn slot(&self) -> MutexGuard<'_, Option<String>> {
        self.0.lock().unwrap_or_else(|p| p.into_inner())
    }

    pub fn get(&self) -> Option<String> {
        self.slot().clone()
    }

    pub fn set(&self, text: impl Into<String>) {
        *self.slot() = Some(text.into());
    }

    pub fn matches(&self, text: &str) -> bool {
        self.slot().as_deref() == Some(text)
    }
}

/// What a reconciliation did to the editor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reconciliation {
    /// Store had no document; editor initialized empty
    InitializedEmpty,
    /// Store had no document and the editor already holds one
    KeptLocal,
    /// Fetched text loaded into the editor
    Applied,
    /// Fetched text equals the last synced text; editor untouched
    Unchanged,
    /// The editor refused to load
    Failed,
}

pub struct DocumentPoller {
    store: Arc<dyn RemoteStore>,
    editor: Arc<dyn EditorSurface>,
    policy: ReconcilePolicy,
    synced: Arc<SyncedText>,
    metrics: Arc<SyncMetrics>,
    token: CancellationToken,
}

impl DocumentPoller {
    pub fn new(
        store: Arc<dyn RemoteStore>,
        editor: Arc<dyn EditorSurface>,
        policy: ReconcilePolicy,
        synced: Arc<SyncedText>,
        metrics: Arc<SyncMetrics>,
        token: CancellationToken,
    ) -> Self {
        Self {
            store,
            editor,
            policy,
            synced,
            metrics,
            token,
        }
    }

    /// One poll: read the document and reconcile it
    ///
    /// Returns `None` when the read failed or the session was cancelled
    /// while it was in flight.
    pub async fn tick(&self) -> Option<Reconciliation> {
        let store = self.store.clone();
        let result = detached(&self.token, async move { store.read_document().await }).await?;

        match result {
            Ok(document) => {
                self.metrics.record_document_read();
                if self.token.is_cancelled() {
                    return None;
                }
                Some(self.reconcile(document))
            }
            Err(e) => {
                self.metrics.record_document_failure();
                tracing::warn!("[Document] Failed to read diagram: {}", e);
                None
            }
        }
    }

    /// Bring the editor in line with `document`
    pub fn reconcile(&self, document: Option<String>) -> Reconciliation {
        let Some(text) = document else {
            return self.reconcile_missing();
        };

        if self.policy == ReconcilePolicy::SkipUnchanged
            && self.editor.has_document()
            && self.synced.matches(&text)
        {
            self.metrics.record_reconcile_skip();
            return Reconciliation::Unchanged;
        }

        match self.editor.load_from_text(&text) {
            Ok(()) => {
                self.metrics.record_reconciliation();
                tracing::debug!("[Document] Reconciled {} bytes", text.len());
                self.synced.set(text);
                Reconciliation::Applied
            }
            Err(e) => {
                tracing::warn!("[Document] Failed to load diagram: {}", e);
                Reconciliation::Failed
            }
        }
    }

    fn reconcile_missing(&self) -> Reconciliation {
        if self.editor.has_document() {
            return Reconciliation::KeptLocal;
        }
        match self.editor.load_empty() {
            Ok(()) => {
                tracing::debug!("[Document] Store is empty; initialized a new diagram");
                Reconciliation::InitializedEmpty
            }
            Err(e) => {
                tracing::warn!("[Document] Failed to initialize empty diagram: {}", e);
                Reconciliation::Failed
            }
        }
    }

    pub fn spawn(self, period: Duration) -> JoinHandle<()> {
        let poller = Arc::new(self);
        RepeatingTask::new("document", period, poller.token.clone()).spawn(move || {
            let poller = poller.clone();
            async move {
                poller.tick().await;
            }
        })
    }
}
