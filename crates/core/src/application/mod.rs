// Application Layer - Worker loops, queue groups and the supervisor that owns them

pub mod dry_run;
pub mod queue_group;
pub mod resolve;
pub mod supervisor;
pub mod worker;

// Re-exports
pub use dry_run::DryRun;
pub use queue_group::QueueGroup;
pub use resolve::resolve_queue_specs;
pub use supervisor::{RunningSupervisor, ShutdownReport, Supervisor};
pub use worker::{shutdown_channel, ActiveWorkers, ShutdownSender, ShutdownToken, Worker};
