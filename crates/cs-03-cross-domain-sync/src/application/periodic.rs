//! # Periodic Sync
//!
//! Background resync on a fixed interval. Stopping cancels the timer; a sync
//! pass already in flight runs to completion.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

use crate::domain::SyncOutcome;
use crate::ports::CrossDomainSyncApi;

/// Spawns the periodic sync task.
pub struct PeriodicSync;

impl PeriodicSync {
    /// Start calling `sync_consent` every `interval`, first after one full
    /// interval has elapsed.
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn<S>(client: Arc<S>, interval: Duration) -> SyncHandle
    where
        S: CrossDomainSyncApi + ?Sized + 'static,
    {
        let period = interval.max(Duration::from_millis(1));
        let (shutdown_tx, mut shutdown_rx) = watch::channel(false);

        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // The first tick completes immediately.
            ticker.tick().await;
            info!(period_ms = period.as_millis() as u64, "[cs-03] Periodic sync started");

            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        match client.sync_consent().await {
                            SyncOutcome::Failed(reason) => {
                                debug!(%reason, "[cs-03] Sync pass failed");
                            }
                            outcome => debug!(?outcome, "[cs-03] Sync pass complete"),
                        }
                    }
                    changed = shutdown_rx.changed() => {
                        if changed.is_err() || *shutdown_rx.borrow() {
                            info!("[cs-03] Shutdown signal received");
                            break;
                        }
                    }
                }
            }
        });

        SyncHandle {
            shutdown: shutdown_tx,
            task: Some(task),
        }
    }
}

/// Owner of a running periodic sync. Dropping it stops the timer.
pub struct SyncHandle {
    shutdown: watch::Sender<bool>,
    task: Option<JoinHandle<()>>,
}

impl SyncHandle {
    /// Stop the timer and wait for the task to exit.
    pub async fn stop(mut self) {
        let _ = self.shutdown.send(true);
        if let Some(task) = self.task.take() {
            let _ = task.await;
        }
    }

    /// Whether the task is still running.
    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }
}

impl Drop for SyncHandle {
    fn drop(&mut self) {
        let _ = self.shutdown.send(true);
    }
}
