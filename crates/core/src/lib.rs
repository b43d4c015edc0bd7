// Queue Daemon Core - Domain Logic & Ports
// NO infrastructure dependencies: processes, files and service managers live in infra crates

pub mod application;
pub mod domain;
pub mod error;
pub mod port;

pub use error::{AppError, Result};
