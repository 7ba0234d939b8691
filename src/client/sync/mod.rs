//! # Sync Session
//!
//! Keeps one participant's editor in step with the shared diagram on the
//! remote store, without a real-time transport.
//!
//! ## Architecture
//!
//! A [`SyncSession`] owns every moving part for the lifetime of a participant:
//! - **Session manager**: join, graceful leave, abrupt unload signal
//! - **Presence poller**: participant count, republished on a watch channel
//! - **Document poller**: pulls the shared document and reconciles the editor
//! - **Change debouncer**: pushes the editor's document after a quiet period
//! - **Unload observer**: sends the abrupt signal when the host unloads
//!
//! Nothing starts until the store has acknowledged the join. All activities
//! share one `CancellationToken`; [`SyncSession::stop`] cancels it and waits
//! for every loop to exit, so no tick, timer or push fires after it returns.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use diagram_collab::client::{Config, HttpBeacon, HttpStore, InMemoryEditor, SyncSession};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config::new();
//! let store = Arc::new(HttpStore::new(config.clone())?);
//! let beacon = Arc::new(HttpBeacon::new(&config));
//! let editor = Arc::new(InMemoryEditor::new());
//!
//! let mut session = SyncSession::new(config.sync_config(), store, editor)
//!     .with_unload_transport(beacon);
//! session.start().await?;
//!
//! let mut presence = session.presence();
//! presence.changed().await?;
//! println!("participants: {:?}", *presence.borrow());
//!
//! session.stop().await;
//! # Ok(())
//! # }
//! ```

pub mod debounce;
pub mod document;
pub mod metrics;
pub mod presence;
pub mod scheduler;
pub mod session;

use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::client::editor::EditorSurface;
use crate::client::error::SyncError;
use crate::client::store::{RemoteStore, UnloadTransport};
use crate::shared::{AppConfig, ConfigError, ReconcilePolicy};

pub use debounce::{ChangeDebouncer, DebounceState};
pub use document::{DocumentPoller, Reconciliation, SyncedText};
pub use metrics::{MetricsSnapshot, SyncMetrics};
pub use presence::PresencePoller;
pub use scheduler::RepeatingTask;
pub use session::SessionManager;

/// Timing and policy of a sync session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncConfig {
    /// Presence poll period
    pub presence_interval: Duration,
    /// Document poll period
    pub document_interval: Duration,
    /// Quiet period before a push
    pub debounce: Duration,
    /// Reconciliation policy of the document poller
    pub reconcile: ReconcilePolicy,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self::from(&AppConfig::default())
    }
}

impl SyncConfig {
    /// Reject timings the scheduler cannot run
    ///
    /// Mirrors [`AppConfig::validate`]: every period is non-zero and the
    /// document poll is coarser than the debounce window.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, period) in [
            ("presence_interval", self.presence_interval),
            ("document_interval", self.document_interval),
            ("debounce", self.debounce),
        ] {
            if period.is_zero() {
                return Err(ConfigError::ZeroInterval(field));
            }
        }
        if self.document_interval <= self.debounce {
            return Err(ConfigError::PollFinerThanDebounce {
                document_interval_ms: millis(self.document_interval),
                debounce_ms: millis(self.debounce),
            });
        }
        Ok(())
    }
}

fn millis(period: Duration) -> u64 {
    u64::try_from(period.as_millis()).unwrap_or(u64::MAX)
}

impl From<&AppConfig> for SyncConfig {
    fn from(app: &AppConfig) -> Self {
        Self {
            presence_interval: Duration::from_millis(app.presence_interval_ms),
            document_interval: Duration::from_millis(app.document_interval_ms),
            debounce: Duration::from_millis(app.debounce_ms),
            reconcile: app.reconcile,
        }
    }
}

/// How a session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Teardown {
    Graceful,
    Abrupt,
}

/// First-wins record of how the session ended
#[derive(Debug, Default)]
struct TeardownLatch(AtomicU8);

impl TeardownLatch {
    const OPEN: u8 = 0;
    const GRACEFUL: u8 = 1;
    const ABRUPT: u8 = 2;

    /// Claim the teardown for `kind`; false if another path already has it
    fn claim(&self, kind: Teardown) -> bool {
        let value = match kind {
            Teardown::Graceful => Self::GRACEFUL,
            Teardown::Abrupt => Self::ABRUPT,
        };
        self.0
            .compare_exchange(Self::OPEN, value, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok()
    }

    fn get(&self) -> Option<Teardown> {
        match self.0.load(Ordering::SeqCst) {
            Self::GRACEFUL => Some(Teardown::Graceful),
            Self::ABRUPT => Some(Teardown::Abrupt),
            _ => None,
        }
    }
}

/// Host-owned unload notification
///
/// The host fires it when the page, window or process begins to close.
/// Clones share the same signal.
#[derive(Debug, Clone, Default)]
pub struct UnloadSignal(CancellationToken);

impl UnloadSignal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fire(&self) {
        self.0.cancel();
    }

    pub fn is_fired(&self) -> bool {
        self.0.is_cancelled()
    }

    pub async fn fired(&self) {
        self.0.cancelled().await
    }
}

/// Snapshot of a session's state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncStatus {
    /// Log correlation tag of the session
    pub tag: Uuid,
    /// Activities are scheduled and not cancelled
    pub running: bool,
    /// The store counts this participant
    pub joined: bool,
    /// Last published participant count
    pub presence: Option<u64>,
    /// How the session ended, if it has
    pub teardown: Option<Teardown>,
    pub metrics: MetricsSnapshot,
}

/// Everything that exists only between a successful join and teardown
struct ActiveSession {
    token: CancellationToken,
    tasks: Vec<JoinHandle<()>>,
}

impl ActiveSession {
    /// Cancel every activity and wait for its loop to exit
    async fn shutdown(self) {
        self.token.cancel();
        for task in self.tasks {
            if let Err(e) = task.await {
                tracing::warn!("[Session] Activity ended abnormally: {}", e);
            }
        }
    }
}

enum Lifecycle {
    Inert,
    Running(ActiveSession),
    Stopped,
}

/// One participant's synchronization with the shared diagram
pub struct SyncSession {
    tag: Uuid,
    config: SyncConfig,
    store: Arc<dyn RemoteStore>,
    editor: Arc<dyn EditorSurface>,
    manager: Arc<SessionManager>,
    unload: UnloadSignal,
    latch: Arc<TeardownLatch>,
    presence: Arc<watch::Sender<Option<u64>>>,
    synced: Arc<SyncedText>,
    metrics: Arc<SyncMetrics>,
    lifecycle: Lifecycle,
}

impl SyncSession {
    /// Create an inert session; nothing talks to the store until `start()`
    pub fn new(
        config: SyncConfig,
        store: Arc<dyn RemoteStore>,
        editor: Arc<dyn EditorSurface>,
    ) -> Self {
        let (presence, _) = watch::channel(None);
        Self {
            tag: Uuid::new_v4(),
            manager: Arc::new(SessionManager::new(store.clone(), None)),
            config,
            store,
            editor,
            unload: UnloadSignal::new(),
            latch: Arc::new(TeardownLatch::default()),
            presence: Arc::new(presence),
            synced: Arc::new(SyncedText::new()),
            metrics: Arc::new(SyncMetrics::new()),
            lifecycle: Lifecycle::Inert,
        }
    }

    /// Use a survivable transport for the unload signal
    pub fn with_unload_transport(mut self, transport: Arc<dyn UnloadTransport>) -> Self {
        self.manager = Arc::new(SessionManager::new(self.store.clone(), Some(transport)));
        self
    }

    /// Observe a host-provided unload signal instead of a private one
    pub fn with_unload_signal(mut self, signal: UnloadSignal) -> Self {
        self.unload = signal;
        self
    }

    pub fn tag(&self) -> Uuid {
        self.tag
    }

    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    /// The unload signal this session observes
    pub fn unload_signal(&self) -> UnloadSignal {
        self.unload.clone()
    }

    /// Participant count as last read by the presence poller
    pub fn presence(&self) -> watch::Receiver<Option<u64>> {
        self.presence.subscribe()
    }

    pub fn status(&self) -> SyncStatus {
        let running = match &self.lifecycle {
            Lifecycle::Running(active) => !active.token.is_cancelled(),
            Lifecycle::Inert | Lifecycle::Stopped => false,
        };
        SyncStatus {
            tag: self.tag,
            running,
            joined: self.manager.is_joined(),
            presence: *self.presence.borrow(),
            teardown: self.latch.get(),
            metrics: self.metrics.snapshot(),
        }
    }

    /// Join, then start every activity
    ///
    /// An invalid configuration is rejected before anything reaches the store.
    /// On join failure the error is logged and returned and the session stays
    /// inert: no poller, no subscription, no further store traffic.
    pub async fn start(&mut self) -> Result<(), SyncError> {
        match self.lifecycle {
            Lifecycle::Inert => {}
            Lifecycle::Running(_) => return Err(SyncError::AlreadyStarted),
            Lifecycle::Stopped => return Err(SyncError::AlreadyStopped),
        }

        if let Err(e) = self.config.validate() {
            tracing::error!(session = %self.tag, "[Session] Invalid configuration, staying inert: {}", e);
            return Err(SyncError::Config(e));
        }

        tracing::info!(session = %self.tag, "[Session] Joining");
        if let Err(e) = self.manager.join().await {
            tracing::error!(session = %self.tag, "[Session] Join failed, staying inert: {}", e);
            return Err(SyncError::Join(e));
        }

        let token = CancellationToken::new();
        let events = self.editor.subscribe();

        // the first document tick runs immediately and initializes the editor
        let document = DocumentPoller::new(
            self.store.clone(),
            self.editor.clone(),
            self.config.reconcile,
            self.synced.clone(),
            self.metrics.clone(),
            token.clone(),
        )
        .spawn(self.config.document_interval);

        let presence = PresencePoller::new(
            self.store.clone(),
            self.presence.clone(),
            self.metrics.clone(),
            token.clone(),
        )
        .spawn(self.config.presence_interval);

        let debouncer = ChangeDebouncer::new(
            self.store.clone(),
            self.editor.clone(),
            self.synced.clone(),
            self.metrics.clone(),
            self.config.debounce,
            token.clone(),
        )
        .spawn(events);

        let observer = self.spawn_unload_observer(token.clone());

        self.lifecycle = Lifecycle::Running(ActiveSession {
            token,
            tasks: vec![document, presence, debouncer, observer],
        });
        tracing::info!(session = %self.tag, "[Session] Started");
        Ok(())
    }

    /// Wait for the host's unload signal and send the abrupt notification
    ///
    /// Only cancels the activities and signals the store; the rest of the
    /// teardown is left to `stop()`, which the host may never get to run.
    fn spawn_unload_observer(&self, token: CancellationToken) -> JoinHandle<()> {
        let unload = self.unload.clone();
        let latch = self.latch.clone();
        let manager = self.manager.clone();
        let tag = self.tag;

        tokio::spawn(async move {
            tokio::select! {
                biased;
                _ = token.cancelled() => {}
                _ = unload.fired() => {
                    if latch.claim(Teardown::Abrupt) {
                        token.cancel();
                        let delivery = manager.notify_abrupt();
                        tracing::info!(session = %tag, "[Session] Unloaded ({:?})", delivery);
                    }
                }
            }
        })
    }

    /// Graceful teardown
    ///
    /// Cancels all timers, waits for every activity to exit, drops the
    /// interaction subscription, destroys the editor model and then leaves.
    /// Idempotent. When the session already ended through the unload path
    /// the leave is skipped.
    pub async fn stop(&mut self) {
        if self.unload.is_fired() {
            // the observer may not have run yet
            return self.stop_abrupt().await;
        }
        let Some(active) = self.take_active() else {
            return;
        };
        let graceful = self.latch.claim(Teardown::Graceful);

        active.shutdown().await;
        self.editor.destroy();

        if graceful {
            // failures are logged by the manager
            let _ = self.manager.leave().await;
            tracing::info!(session = %self.tag, "[Session] Stopped");
        } else {
            tracing::debug!(session = %self.tag, "[Session] Already unloaded; skipping leave");
        }
    }

    /// Teardown for a host that is closing
    ///
    /// Sends the abrupt signal before awaiting anything, then cleans up like
    /// `stop()` without the graceful leave. Idempotent.
    pub async fn stop_abrupt(&mut self) {
        let Some(active) = self.take_active() else {
            return;
        };
        if self.latch.claim(Teardown::Abrupt) {
            active.token.cancel();
            let delivery = self.manager.notify_abrupt();
            tracing::info!(session = %self.tag, "[Session] Unloaded ({:?})", delivery);
        }

        active.shutdown().await;
        self.editor.destroy();
    }

    fn take_active(&mut self) -> Option<ActiveSession> {
        match std::mem::replace(&mut self.lifecycle, Lifecycle::Stopped) {
            Lifecycle::Running(active) => Some(active),
            Lifecycle::Inert => {
                tracing::debug!(session = %self.tag, "[Session] Stopped before joining");
                None
            }
            Lifecycle::Stopped => None,
        }
    }
}

impl Drop for SyncSession {
    fn drop(&mut self) {
        if let Lifecycle::Running(active) = &self.lifecycle {
            tracing::warn!(session = %self.tag, "[Session] Dropped while running; cancelling activities");
            active.token.cancel();
        }
    }
}
