//! # Presence Poller
//!
//! Reads the participant count every period and republishes it on a watch
//! channel. A failed read is logged and the schedule carries on; there is no
//! backoff and no retry within a tick.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::client::store::RemoteStore;
use crate::client::sync::metrics::SyncMetrics;
use crate::client::sync::scheduler::{detached, RepeatingTask};

pub struct PresencePoller {
    store: Arc<dyn RemoteStore>,
    publisher: Arc<watch::Sender<Option<u64>>>,
    metrics: Arc<SyncMetrics>,
    token: CancellationToken,
}

impl PresencePoller {
    pub fn new(
        store: Arc<dyn RemoteStore>,
        publisher: Arc<watch::Sender<Option<u64>>>,
        metrics: Arc<SyncMetrics>,
        token: CancellationToken,
    ) -> Self {
        Self {
            store,
            publisher,
            metrics,
            token,
        }
    }

    /// One poll: read the count and publish it
    pub async fn tick(&self) {
        let store = self.store.clone();
        let Some(result) = detached(&self.token, async move { store.session_count().await }).await
        else {
            return;
        };

        match result {
            Ok(count) => {
                self.metrics.record_presence_read();
                let previous = self.publisher.send_replace(Some(count));
                if previous != Some(count) {
                    tracing::debug!("[Presence] {} participant(s)", count);
                }
            }
            Err(e) => {
                self.metrics.record_presence_failure();
                tracing::warn!("[Presence] Failed to read participant count: {}", e);
            }
        }
    }

    pub fn spawn(self, period: Duration) -> JoinHandle<()> {
        let poller = Arc::new(self);
        RepeatingTask::new("presence", period, poller.token.clone()).spawn(move || {
            let poller = poller.clone();
            async move { poller.tick().await }
        })
    }
}
