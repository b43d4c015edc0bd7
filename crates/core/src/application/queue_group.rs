// Queue Group - fans one queue spec out to its worker loops

use super::worker::{ActiveWorkers, ShutdownToken, Worker};
use crate::domain::{JobCommand, JobInvocation, QueueSpec};
use crate::port::{CommandPreview, JobRunner};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tracing::info;

/// All worker loops of one queue share this spec and invocation
#[derive(Clone)]
pub struct QueueGroup {
    spec: Arc<QueueSpec>,
    invocation: Arc<JobInvocation>,
}

impl QueueGroup {
    pub fn new(spec: QueueSpec, command: &JobCommand) -> Self {
        let invocation = command.invocation(&spec);
        Self {
            spec: Arc::new(spec),
            invocation: Arc::new(invocation),
        }
    }

    pub fn spec(&self) -> &QueueSpec {
        &self.spec
    }

    /// Spawn exactly `worker_count` workers, each registered with `workers`
    /// before this returns. Returns the number spawned.
    ///
    /// Each worker adds its invocation count to `invocations` when it exits.
    pub fn spawn(
        &self,
        runner: &Arc<dyn JobRunner>,
        shutdown: &ShutdownToken,
        workers: &ActiveWorkers,
        invocations: &Arc<AtomicUsize>,
    ) -> usize {
        let count = self.spec.worker_count();
        for slot in 0..count {
            let worker = Worker::new(
                Arc::clone(&self.spec),
                Arc::clone(&self.invocation),
                Arc::clone(runner),
                slot,
            );
            let token = shutdown.clone();
            let counter = Arc::clone(invocations);
            workers.spawn(async move {
                let made = worker.run(token).await;
                counter.fetch_add(made, Ordering::SeqCst);
            });
        }

        info!(
            queue = %self.spec.name(),
            workers = count,
            interval_secs = self.spec.interval_secs(),
            environment = %self.spec.environment(),
            project = %self.spec.project(),
            "Queue group spawned"
        );
        count
    }

    /// Emit what one tick of this group would run, once per worker
    pub fn preview_tick(&self, preview: &dyn CommandPreview) {
        let line = self.invocation.render();
        for _ in 0..self.spec.worker_count() {
            preview.emit(&line);
        }
    }
}
