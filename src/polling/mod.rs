//! Periodic refresh for list and leaderboard views.
//!
//! A [`Poller`] fetches immediately on `start`, then once per interval until
//! `stop`. The latest successful value is published on a `watch` channel;
//! failed ticks are logged and the previous value stays in place.

use parking_lot::Mutex;
use std::future::Future;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::api::ApiError;

struct Running {
    cancel: CancellationToken,
    handle: JoinHandle<()>,
}

pub struct Poller<T> {
    period: Duration,
    tx: watch::Sender<Option<T>>,
    running: Mutex<Option<Running>>,
}

impl<T> Poller<T>
where
    T: Send + Sync + 'static,
{
    pub fn new(period: Duration) -> Self {
        let (tx, _) = watch::channel(None);
        Self {
            period,
            tx,
            running: Mutex::new(None),
        }
    }

    /// Receiver that sees every successful fetch
    pub fn subscribe(&self) -> watch::Receiver<Option<T>> {
        self.tx.subscribe()
    }

    pub fn is_running(&self) -> bool {
        self.running
            .lock()
            .as_ref()
            .is_some_and(|running| !running.handle.is_finished())
    }

    /// Begin polling with `fetch`. Does nothing if already running.
    pub fn start<F, Fut>(&self, fetch: F)
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T, ApiError>> + Send + 'static,
    {
        let mut running = self.running.lock();
        if running.as_ref().is_some_and(|r| !r.handle.is_finished()) {
            tracing::debug!("Poller already running");
            return;
        }

        let cancel = CancellationToken::new();
        let token = cancel.clone();
        let tx = self.tx.clone();
        let period = self.period;

        tracing::debug!(interval_ms = period.as_millis() as u64, "Starting poller");

        let handle = tokio::spawn(async move {
            // First tick completes immediately
            let mut tick = interval(period);
            tick.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                tokio::select! {
                    biased;
                    _ = token.cancelled() => break,
                    _ = tick.tick() => {}
                }

                let result = tokio::select! {
                    biased;
                    _ = token.cancelled() => break,
                    result = fetch() => result,
                };

                match result {
                    Ok(value) => {
                        tx.send_replace(Some(value));
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, "Refresh failed, keeping previous data");
                    }
                }
            }

            tracing::debug!("Poller stopped");
        });

        *running = Some(Running { cancel, handle });
    }

    /// Stop polling. Safe to call when not running.
    pub fn stop(&self) {
        if let Some(running) = self.running.lock().take() {
            running.cancel.cancel();
        }
    }
}

impl<T> Drop for Poller<T> {
    fn drop(&mut self) {
        if let Some(running) = self.running.get_mut().take() {
            running.cancel.cancel();
        }
    }
}
