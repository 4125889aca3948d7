//! # Controller Handle

use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Owner of the controller's background task. Dropping it stops the task.
pub struct ControllerHandle {
    shutdown: watch::Sender<bool>,
    task: Option<JoinHandle<()>>,
}

impl ControllerHandle {
    pub(crate) fn new(shutdown: watch::Sender<bool>, task: JoinHandle<()>) -> Self {
        Self {
            shutdown,
            task: Some(task),
        }
    }

    /// Signal shutdown and wait for the task to exit.
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

impl Drop for ControllerHandle {
    fn drop(&mut self) {
        let _ = self.shutdown.send(true);
    }
}
