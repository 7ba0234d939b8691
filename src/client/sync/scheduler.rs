//! # Sync Scheduler
//!
//! Cancellable repeating tasks for the sync activities.
//!
//! ## Features
//!
//! - **Immediate first tick**: a task ticks as soon as it is spawned, then every
//!   period
//! - **Cancellation before every tick**: the shared `CancellationToken` wins any
//!   race against the interval
//! - **Detached store calls**: requests run on their own task so cancelling a
//!   loop never cancels an in-flight call; its result is discarded instead

use std::future::Future;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

/// A fixed-period activity bound to a cancellation token
#[derive(Debug, Clone)]
pub struct RepeatingTask {
    name: &'static str,
    period: Duration,
    token: CancellationToken,
}

impl RepeatingTask {
    pub fn new(name: &'static str, period: Duration, token: CancellationToken) -> Self {
        Self {
            name,
            period,
            token,
        }
    }

    /// Spawn the loop; `tick` runs once per period until the token is cancelled
    ///
    /// A tick that overruns the period delays the next one instead of
    /// bursting to catch up.
    pub fn spawn<F, Fut>(self, mut tick: F) -> JoinHandle<()>
    where
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(self.period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            tracing::debug!("[Scheduler] {} started, period {:?}", self.name, self.period);

            loop {
                tokio::select! {
                    biased;
                    _ = self.token.cancelled() => break,
                    _ = interval.tick() => {}
                }
                tick().await;
            }

            tracing::debug!("[Scheduler] {} stopped", self.name);
        })
    }
}

/// Run `call` on its own task and wait for it unless `token` is cancelled first
///
/// Returns `None` when the token is cancelled before or after the call
/// completes; the call itself keeps running to completion either way.
pub async fn detached<T, Fut>(token: &CancellationToken, call: Fut) -> Option<T>
where
    T: Send + 'static,
    Fut: Future<Output = T> + Send + 'static,
{
    let handle = tokio::spawn(call);
    let joined = tokio::select! {
        biased;
        _ = token.cancelled() => return None,
        joined = handle => joined,
    };
    match joined {
        Ok(_) if token.is_cancelled() => None,
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!("[Scheduler] Detached call failed to complete: {}", e);
            None
        }
    }
}
