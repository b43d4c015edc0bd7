// Domain Error Types

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Invalid parameters for queue '{queue}': {reason}")]
    InvalidQueueSpec { queue: String, reason: String },

    #[error("Queue '{queue}': field '{field}' is not an integer: {value:?}")]
    InvalidNumber {
        queue: String,
        field: &'static str,
        value: String,
    },
}

pub type Result<T> = std::result::Result<T, DomainError>;
