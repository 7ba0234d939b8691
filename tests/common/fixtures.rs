//! Participant fixtures
//!
//! A `Participant` bundles an in-memory editor with a sync session. Several
//! participants can share one `MemoryStore` to play out multi-client
//! scenarios under paused tokio time.

use std::sync::Arc;
use std::time::Duration;

use diagram_collab::client::{
    InMemoryEditor, InteractionEvent, MemoryStore, RemoteStore, SyncConfig, SyncSession,
};

pub const PRESENCE_INTERVAL: Duration = Duration::from_millis(1000);
pub const DOCUMENT_INTERVAL: Duration = Duration::from_millis(2000);
pub const DEBOUNCE: Duration = Duration::from_millis(500);

pub struct Participant {
    pub editor: Arc<InMemoryEditor>,
    pub session: SyncSession,
}

impl Participant {
    /// Participant with a survivable unload transport
    pub fn new(store: &Arc<MemoryStore>) -> Self {
        let editor = Arc::new(InMemoryEditor::new());
        let session = SyncSession::new(SyncConfig::default(), store.clone(), editor.clone())
            .with_unload_transport(store.clone());
        Self { editor, session }
    }

    /// Participant with custom timings
    pub fn with_config(store: &Arc<MemoryStore>, config: SyncConfig) -> Self {
        let editor = Arc::new(InMemoryEditor::new());
        let session = SyncSession::new(config, store.clone(), editor.clone())
            .with_unload_transport(store.clone());
        Self { editor, session }
    }

    /// Participant whose host has no survivable transport
    pub fn without_beacon(store: Arc<dyn RemoteStore>) -> Self {
        let editor = Arc::new(InMemoryEditor::new());
        let session = SyncSession::new(SyncConfig::default(), store, editor.clone());
        Self { editor, session }
    }

    /// Edit the document and report the gesture that made the edit
    pub fn edit(&self, text: &str) {
        self.editor.apply_local_edit(text);
        self.editor.emit(InteractionEvent::MouseUp);
    }
}

/// Let tasks that are ready at the current instant run
pub async fn settle() {
    tokio::time::sleep(Duration::from_millis(1)).await;
}
