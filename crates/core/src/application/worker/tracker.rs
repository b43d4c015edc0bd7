// Active worker tracking (wait-group over spawned tasks)

use std::future::Future;
use tokio::task::JoinHandle;
use tokio_util::task::TaskTracker;

/// Counts outstanding group-spawn tasks and worker loops.
///
/// `wait` resolves once the tracker is closed and every tracked task has
/// returned.
#[derive(Clone, Default)]
pub struct ActiveWorkers {
    tracker: TaskTracker,
}

impl ActiveWorkers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawn a tracked task on the current runtime
    pub fn spawn<F>(&self, task: F) -> JoinHandle<F::Output>
    where
        F: Future + Send + 'static,
        F::Output: Send + 'static,
    {
        self.tracker.spawn(task)
    }

    /// Number of tracked tasks still running
    pub fn active(&self) -> usize {
        self.tracker.len()
    }

    /// Allow `wait` to complete once the tracked tasks drain
    pub fn close(&self) -> bool {
        self.tracker.close()
    }

    /// Wait until closed and drained
    pub async fn wait(&self) {
        self.tracker.wait().await
    }
}
