// Port Layer - Interfaces for external collaborators

pub mod command_preview;
pub mod job_runner;
pub mod queue_source;
pub mod service_manager;

// Re-exports
pub use command_preview::CommandPreview;
pub use job_runner::{JobRunner, RunOutcome, RunnerError};
pub use queue_source::{ConfigError, QueueSource};
pub use service_manager::{ServiceError, ServiceManager};
