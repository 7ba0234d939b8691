//! Survivable unload transport
//!
//! The unload signal is posted from a dedicated OS thread with the blocking
//! reqwest client, so it does not depend on the async runtime that is being
//! torn down. Hosts that want the request to finish before the process exits
//! call [`HttpBeacon::flush`] from a blocking context.

use std::sync::Mutex;
use std::thread::JoinHandle;
use std::time::Duration;

use crate::client::config::Config;
use crate::client::store::UnloadTransport;
use crate::shared::protocol::USER_BEACON_PATH;
use crate::shared::AbruptSignal;

/// Beacon-style transport for the abrupt-teardown signal
#[derive(Debug)]
pub struct HttpBeacon {
    url: String,
    timeout: Duration,
    pending: Mutex<Vec<JoinHandle<()>>>,
}

impl HttpBeacon {
    pub fn new(config: &Config) -> Self {
        Self {
            url: config.api_url(USER_BEACON_PATH),
            timeout: config.request_timeout(),
            pending: Mutex::new(Vec::new()),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Block until every signal handed to this beacon has been sent or failed
    ///
    /// Must not be called from inside an async task; use `spawn_blocking`.
    pub fn flush(&self) {
        let handles: Vec<_> = {
            let mut pending = self.pending.lock().unwrap_or_else(|p| p.into_inner());
            pending.drain(..).collect()
        };
        for handle in handles {
            if handle.join().is_err() {
                tracing::warn!("[Beacon] Sender thread panicked");
            }
        }
    }
}

impl UnloadTransport for HttpBeacon {
    fn send(&self, signal: AbruptSignal) -> bool {
        let body = match signal.to_body() {
            Ok(body) => body,
            Err(e) => {
                tracing::warn!("[Beacon] Failed to encode signal: {}", e);
                return false;
            }
        };
        let url = self.url.clone();
        let timeout = self.timeout;

        let spawned = std::thread::Builder::new()
            .name("unload-beacon".to_string())
            .spawn(move || {
                let client = match reqwest::blocking::Client::builder().timeout(timeout).build() {
                    Ok(client) => client,
                    Err(e) => {
                        tracing::warn!("[Beacon] Failed to build client: {}", e);
                        return;
                    }
                };
                let result = client
                    .post(&url)
                    .header("Content-Type", "text/plain;charset=UTF-8")
                    .body(body)
                    .send();
                match result {
                    Ok(response) => {
                        tracing::debug!("[Beacon] Delivered with status {}", response.status())
                    }
                    Err(e) => tracing::debug!("[Beacon] Delivery failed: {}", e),
                }
            });

        match spawned {
            Ok(handle) => {
                let mut pending = self.pending.lock().unwrap_or_else(|p| p.into_inner());
                pending.retain(|sender| !sender.is_finished());
                pending.push(handle);
                true
            }
            Err(e) => {
                tracing::warn!("[Beacon] Failed to spawn sender thread: {}", e);
                false
            }
        }
    }
}
