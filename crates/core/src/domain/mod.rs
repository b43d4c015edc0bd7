// Domain Layer - Queue definitions and the job command they produce

pub mod command;
pub mod error;
pub mod queue;

// Re-exports
pub use command::{JobCommand, JobInvocation};
pub use error::DomainError;
pub use queue::{QueueId, QueueParams, QueueSpec};
