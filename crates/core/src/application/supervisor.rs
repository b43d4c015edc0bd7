// Supervisor - owns the shutdown broadcast and the active-worker tracker

use super::queue_group::QueueGroup;
use super::resolve::resolve_queue_specs;
use super::worker::{shutdown_channel, ActiveWorkers, ShutdownSender};
use crate::domain::{JobCommand, QueueSpec};
use crate::error::Result;
use crate::port::{JobRunner, QueueSource};
use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tracing::info;

/// Summary returned once every worker has exited
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShutdownReport {
    pub queues: usize,
    pub workers: usize,
    /// Job Runner calls made by all workers, failed ones included
    pub invocations: usize,
}

/// Supervisor over all queue groups (not yet started)
pub struct Supervisor {
    groups: Vec<QueueGroup>,
    runner: Arc<dyn JobRunner>,
}

impl Supervisor {
    /// Build from already validated specs
    pub fn new(specs: Vec<QueueSpec>, command: &JobCommand, runner: Arc<dyn JobRunner>) -> Self {
        let groups = specs
            .into_iter()
            .map(|spec| QueueGroup::new(spec, command))
            .collect();
        Self { groups, runner }
    }

    /// Resolve every queue from `source` first; nothing is spawned on error
    pub fn from_source(
        source: &dyn QueueSource,
        command: &JobCommand,
        runner: Arc<dyn JobRunner>,
    ) -> Result<Self> {
        let specs = resolve_queue_specs(source)?;
        Ok(Self::new(specs, command, runner))
    }

    pub fn groups(&self) -> &[QueueGroup] {
        &self.groups
    }

    /// Spawn one group task per queue and return immediately.
    ///
    /// Each group task is tracked until it has registered its workers, so
    /// the tracker can never drain between a group start and its workers.
    pub fn start(self) -> RunningSupervisor {
        let (shutdown, token) = shutdown_channel();
        let workers = ActiveWorkers::new();
        let invocations = Arc::new(AtomicUsize::new(0));
        let queues = self.groups.len();
        let worker_total = self.groups.iter().map(|g| g.spec().worker_count()).sum();

        info!(queues = queues, workers = worker_total, "Starting daemon");

        for group in self.groups {
            let runner = Arc::clone(&self.runner);
            let token = token.clone();
            let tracked = workers.clone();
            let counter = Arc::clone(&invocations);
            workers.spawn(async move {
                group.spawn(&runner, &token, &tracked, &counter);
            });
        }

        RunningSupervisor {
            shutdown,
            workers,
            invocations,
            queues,
            worker_total,
        }
    }

    /// Start, wait for `signal`, then shut down and drain
    pub async fn run_until<F>(self, signal: F) -> ShutdownReport
    where
        F: Future<Output = ()>,
    {
        let running = self.start();
        signal.await;
        running.shutdown().await
    }
}

/// Handle to a started supervisor
pub struct RunningSupervisor {
    shutdown: ShutdownSender,
    workers: ActiveWorkers,
    invocations: Arc<AtomicUsize>,
    queues: usize,
    worker_total: usize,
}

impl RunningSupervisor {
    /// Broadcast shutdown once and wait until every worker has returned
    pub async fn shutdown(self) -> ShutdownReport {
        if self.shutdown.shutdown() {
            info!("Shutdown broadcast sent to all workers");
        }
        self.workers.close();
        self.workers.wait().await;

        let report = ShutdownReport {
            queues: self.queues,
            workers: self.worker_total,
            invocations: self.invocations.load(Ordering::SeqCst),
        };
        info!(
            queues = report.queues,
            workers = report.workers,
            invocations = report.invocations,
            "All queues stopped"
        );
        report
    }
}
