// Worker - invoke/sleep loop for one queue slot

mod shutdown;
mod tracker;

pub use shutdown::{shutdown_channel, ShutdownSender, ShutdownToken};
pub use tracker::ActiveWorkers;

use crate::domain::{JobInvocation, QueueSpec};
use crate::port::JobRunner;
use std::sync::Arc;
use tokio::time::sleep;
use tracing::{debug, info, warn};

/// Worker runs the Job Runner for one queue, once per interval
pub struct Worker {
    spec: Arc<QueueSpec>,
    invocation: Arc<JobInvocation>,
    runner: Arc<dyn JobRunner>,
    slot: usize,
}

impl Worker {
    pub fn new(
        spec: Arc<QueueSpec>,
        invocation: Arc<JobInvocation>,
        runner: Arc<dyn JobRunner>,
        slot: usize,
    ) -> Self {
        Self {
            spec,
            invocation,
            runner,
            slot,
        }
    }

    /// Run worker loop until shutdown; returns the number of invocations made.
    ///
    /// Shutdown is checked before each invocation and raced against the
    /// interval after it. An invocation in flight is always awaited.
    pub async fn run(&self, mut shutdown: ShutdownToken) -> usize {
        let queue = self.spec.name();
        info!(queue = %queue, worker = self.slot, "Worker started");

        let mut invocations = 0;
        loop {
            if shutdown.is_shutdown() {
                break;
            }

            self.invoke().await;
            invocations += 1;

            tokio::select! {
                _ = sleep(self.spec.interval()) => {},
                _ = shutdown.wait() => {
                    debug!(
                        queue = %queue,
                        worker = self.slot,
                        "Worker interrupted during interval"
                    );
                    break;
                }
            }
        }

        info!(
            queue = %queue,
            worker = self.slot,
            invocations = invocations,
            "Worker stopped"
        );
        invocations
    }

    /// One Job Runner call; failures are logged and never stop the loop
    async fn invoke(&self) {
        match self.runner.run(&self.invocation).await {
            Ok(outcome) if outcome.success() => {
                debug!(
                    queue = %self.spec.name(),
                    worker = self.slot,
                    duration_ms = outcome.duration_ms,
                    "Job runner completed"
                );
            }
            Ok(outcome) => {
                warn!(
                    queue = %self.spec.name(),
                    worker = self.slot,
                    exit_code = ?outcome.exit_code,
                    duration_ms = outcome.duration_ms,
                    "Job runner exited with failure"
                );
            }
            Err(e) => {
                warn!(
                    queue = %self.spec.name(),
                    worker = self.slot,
                    error = %e,
                    "CLI execution error"
                );
            }
        }
    }
}
