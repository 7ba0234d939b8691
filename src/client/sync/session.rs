//! # Session Manager
//!
//! Lifecycle of one logical participant against the remote store. The client
//! holds no identity beyond a joined flag; the store owns the count.
//!
//! ## Teardown paths
//!
//! - [`SessionManager::leave`] - graceful removal over an ordinary request
//! - [`SessionManager::notify_abrupt`] - unload-time removal over the
//!   survivable transport, degrading explicitly to a best-effort request when
//!   the host has none
//!
//! Both paths clear the joined flag first, so whichever runs first is the only
//! one that reaches the store.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::client::error::StoreError;
use crate::client::store::{AbruptDelivery, RemoteStore, UnloadTransport};
use crate::shared::AbruptSignal;

pub struct SessionManager {
    store: Arc<dyn RemoteStore>,
    unload: Option<Arc<dyn UnloadTransport>>,
    joined: AtomicBool,
}

impl SessionManager {
    pub fn new(store: Arc<dyn RemoteStore>, unload: Option<Arc<dyn UnloadTransport>>) -> Self {
        Self {
            store,
            unload,
            joined: AtomicBool::new(false),
        }
    }

    pub fn is_joined(&self) -> bool {
        self.joined.load(Ordering::SeqCst)
    }

    /// Register this participant; resolves after the store acknowledges
    pub async fn join(&self) -> Result<(), StoreError> {
        self.store.add_session().await?;
        self.joined.store(true, Ordering::SeqCst);
        tracing::info!("[Session] Joined");
        Ok(())
    }

    /// Graceful removal
    ///
    /// A no-op when not joined. Failures are logged and returned, never
    /// retried.
    pub async fn leave(&self) -> Result<(), StoreError> {
        if !self.joined.swap(false, Ordering::SeqCst) {
            tracing::debug!("[Session] Leave skipped, not joined");
            return Ok(());
        }
        match self.store.remove_session().await {
            Ok(()) => {
                tracing::info!("[Session] Left");
                Ok(())
            }
            Err(e) => {
                tracing::warn!("[Session] Leave failed: {}", e);
                Err(e)
            }
        }
    }

    /// Fire-and-forget removal for host unload
    ///
    /// Never awaits. Returns `None` when the session was not joined.
    pub fn notify_abrupt(&self) -> Option<AbruptDelivery> {
        if !self.joined.swap(false, Ordering::SeqCst) {
            tracing::debug!("[Session] Abrupt notify skipped, not joined");
            return None;
        }
        let signal = AbruptSignal::remove_user();

        let delivery = match &self.unload {
            Some(transport) if transport.send(signal) => AbruptDelivery::Queued,
            Some(_) => {
                tracing::warn!("[Session] Survivable transport refused the unload signal");
                AbruptDelivery::Refused
            }
            None => self.best_effort(signal),
        };
        tracing::info!("[Session] Unload signal: {:?}", delivery);
        Some(delivery)
    }

    fn best_effort(&self, signal: AbruptSignal) -> AbruptDelivery {
        tracing::warn!(
            "[Session] No survivable transport; sending unload signal as an ordinary request"
        );
        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            tracing::warn!("[Session] No runtime available; unload signal dropped");
            return AbruptDelivery::Dropped;
        };
        let store = self.store.clone();
        runtime.spawn(async move {
            if let Err(e) = store.signal_abrupt(signal).await {
                tracing::debug!("[Session] Best-effort unload signal failed: {}", e);
            }
        });
        AbruptDelivery::BestEffort
    }
}
