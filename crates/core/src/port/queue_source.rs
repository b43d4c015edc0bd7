// Queue Source Port
// Supplies queue names and their raw parameters (the configuration file in production)

use crate::domain::QueueParams;
use std::collections::BTreeMap;
use std::path::PathBuf;
use thiserror::Error;

/// Configuration errors (always fatal at startup)
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Config file not found in {0}")]
    NotFound(PathBuf),

    #[error("Failed to read config {path}: {message}")]
    Read { path: PathBuf, message: String },

    #[error("Queue '{0}' is not defined in the configuration")]
    UnknownQueue(String),

    #[error("Cannot resolve executable directory: {0}")]
    ExecutablePath(String),
}

/// Queue source port
pub trait QueueSource: Send + Sync {
    /// All configured queue names (every top-level key)
    fn queue_names(&self) -> Vec<String>;

    /// Raw parameters for one queue
    ///
    /// # Errors
    /// - ConfigError::UnknownQueue if the name is not configured
    fn queue_params(&self, name: &str) -> Result<QueueParams, ConfigError>;
}

/// In-memory source, used by tests and by callers that build queues in code
impl QueueSource for BTreeMap<String, QueueParams> {
    fn queue_names(&self) -> Vec<String> {
        self.keys().cloned().collect()
    }

    fn queue_params(&self, name: &str) -> Result<QueueParams, ConfigError> {
        self.get(name)
            .cloned()
            .ok_or_else(|| ConfigError::UnknownQueue(name.to_string()))
    }
}
