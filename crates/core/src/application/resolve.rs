// Queue spec resolution against the configured source

use crate::domain::QueueSpec;
use crate::error::Result;
use crate::port::QueueSource;
use tracing::{debug, warn};

/// Resolve and validate every configured queue.
///
/// All specs are validated before the caller spawns anything; the first
/// invalid queue fails the whole resolution.
pub fn resolve_queue_specs(source: &dyn QueueSource) -> Result<Vec<QueueSpec>> {
    let names = source.queue_names();
    if names.is_empty() {
        warn!("No queues configured");
    }

    let mut specs = Vec::with_capacity(names.len());
    for name in names {
        let params = source.queue_params(&name)?;
        let spec = QueueSpec::from_params(name, &params)?;
        debug!(
            queue = %spec.name(),
            workers = spec.worker_count(),
            interval_secs = spec.interval_secs(),
            "Queue resolved"
        );
        specs.push(spec);
    }
    Ok(specs)
}
