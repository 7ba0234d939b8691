/**
 * Diagram Store State
 *
 * In-memory storage for the shared diagram and the participant count.
 * Both live behind `Arc<RwLock<>>` so handlers can read concurrently while
 * writes stay exclusive. Nothing is persisted; a restart starts empty.
 */

use std::sync::Arc;

use tokio::sync::RwLock;

/// Holder of the single shared diagram
#[derive(Debug, Default, Clone)]
pub struct DiagramStorage {
    diagram: Option<String>,
}

impl DiagramStorage {
    pub fn get(&self) -> Option<&str> {
        self.diagram.as_deref()
    }

    /// Replace the diagram; the previous text is discarded
    pub fn save(&mut self, new_diagram: String) {
        self.diagram = Some(new_diagram);
    }
}

/// Participant counter that never goes below zero
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct UserCounter {
    user_count: u64,
}

impl UserCounter {
    pub fn count(&self) -> u64 {
        self.user_count
    }

    pub fn increment(&mut self) -> u64 {
        self.user_count = self.user_count.saturating_add(1);
        self.user_count
    }

    pub fn decrement(&mut self) -> u64 {
        self.user_count = self.user_count.saturating_sub(1);
        self.user_count
    }
}

/// Shared store state handed to the handlers
#[derive(Debug, Default, Clone)]
pub struct StoreState {
    diagram: Arc<RwLock<DiagramStorage>>,
    users: Arc<RwLock<UserCounter>>,
}

impl StoreState {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn diagram(&self) -> Option<String> {
        self.diagram.read().await.get().map(str::to_owned)
    }

    pub async fn save_diagram(&self, new_diagram: String) {
        self.diagram.write().await.save(new_diagram);
    }

    pub async fn user_count(&self) -> u64 {
        self.users.read().await.count()
    }

    pub async fn add_user(&self) -> u64 {
        self.users.write().await.increment()
    }

    pub async fn remove_user(&self) -> u64 {
        self.users.write().await.decrement()
    }
}
