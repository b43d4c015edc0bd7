// Service Manager Port
// OS-level service registration and control (install/remove/start/stop/status)

use thiserror::Error;

/// Service-control errors
///
/// Reported to the operator; they never touch a running daemon because
/// service commands and the daemon body are separate invocations.
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Service is not installed")]
    NotInstalled,

    #[error("Service has already been installed")]
    AlreadyInstalled,

    #[error("Service is already running")]
    AlreadyRunning,

    #[error("Service has already been stopped")]
    NotRunning,

    #[error("You must have root user privileges. Possibly using 'sudo' command should help")]
    PermissionDenied,

    #[error("Command `{command}` failed: {message}")]
    Command { command: String, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Service manager port
///
/// Every operation returns a human-readable result line on success.
pub trait ServiceManager: Send + Sync {
    fn install(&self) -> Result<String, ServiceError>;

    fn remove(&self) -> Result<String, ServiceError>;

    fn start(&self) -> Result<String, ServiceError>;

    fn stop(&self) -> Result<String, ServiceError>;

    fn status(&self) -> Result<String, ServiceError>;
}
