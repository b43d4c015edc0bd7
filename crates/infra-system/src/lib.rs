// Queue Daemon Infrastructure - System Adapters
// Implements: JobRunner (subprocess), ServiceManager (systemd)

pub mod service;
pub mod subprocess_runner;

pub use service::{ServiceConfig, SystemdServiceManager};
pub use subprocess_runner::SubprocessRunner;
