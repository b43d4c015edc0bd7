// Dry Run - previews the commands each queue would execute, forever

use super::queue_group::QueueGroup;
use crate::domain::{JobCommand, QueueSpec};
use crate::port::CommandPreview;
use std::sync::Arc;
use tokio::task::JoinSet;
use tokio::time::sleep;
use tracing::info;

/// Preview loop with no shutdown signal; it ends when the process is killed
pub struct DryRun {
    groups: Vec<QueueGroup>,
    preview: Arc<dyn CommandPreview>,
}

impl DryRun {
    /// Specs must come from the same resolution the daemon uses
    pub fn new(
        specs: Vec<QueueSpec>,
        command: &JobCommand,
        preview: Arc<dyn CommandPreview>,
    ) -> Self {
        let groups = specs
            .into_iter()
            .map(|spec| QueueGroup::new(spec, command))
            .collect();
        Self { groups, preview }
    }

    /// Emit every queue's commands each interval.
    ///
    /// Only returns when no queue is configured.
    pub async fn run(self) {
        info!(queues = self.groups.len(), "Starting dry run");

        let mut queues = JoinSet::new();
        for group in self.groups {
            let preview = Arc::clone(&self.preview);
            queues.spawn(async move {
                loop {
                    group.preview_tick(preview.as_ref());
                    sleep(group.spec().interval()).await;
                }
            });
        }

        while queues.join_next().await.is_some() {}
    }
}
