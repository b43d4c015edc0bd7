// Job Runner Port
// Abstraction over the external console command invoked once per worker tick

use crate::domain::JobInvocation;
use async_trait::async_trait;
use thiserror::Error;

/// Result of a completed invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOutcome {
    /// None when the process was terminated by a signal
    pub exit_code: Option<i32>,
    pub duration_ms: u64,
}

impl RunOutcome {
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }
}

/// Invocation errors
#[derive(Error, Debug)]
pub enum RunnerError {
    #[error("Spawn failed: {0}")]
    SpawnFailed(String),

    #[error("IO error: {0}")]
    Io(String),

    #[error("Process timeout after {0}ms")]
    Timeout(u64),
}

/// Job Runner trait
///
/// Implementations:
/// - SubprocessRunner: spawns the console process and waits for it
/// - MockJobRunner: records calls (tests)
///
/// A call is not cancellable by the supervisor: once `run` starts, the worker
/// awaits it to completion before it looks at the shutdown signal again.
#[async_trait]
pub trait JobRunner: Send + Sync {
    /// Run one invocation to completion
    ///
    /// # Errors
    /// - RunnerError::SpawnFailed if the process cannot be started
    /// - RunnerError::Timeout only when the implementation was given a timeout
    async fn run(&self, invocation: &JobInvocation) -> Result<RunOutcome, RunnerError>;
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;
    use std::time::Duration;

    /// Mock runner behavior
    #[derive(Debug, Clone)]
    pub enum MockBehavior {
        /// Exit 0 immediately
        Success,
        /// Exit with the given non-zero code
        Exit(i32),
        /// Fail to spawn
        Fail(String),
        /// Exit 0 after the given duration
        Delay(Duration),
    }

    /// Mock Job Runner that records invocations per queue
    pub struct MockJobRunner {
        behavior: Mutex<MockBehavior>,
        calls: Mutex<HashMap<String, usize>>,
        completed: Mutex<usize>,
    }

    impl MockJobRunner {
        pub fn new(behavior: MockBehavior) -> Self {
            Self {
                behavior: Mutex::new(behavior),
                calls: Mutex::new(HashMap::new()),
                completed: Mutex::new(0),
            }
        }

        pub fn new_success() -> Self {
            Self::new(MockBehavior::Success)
        }

        pub fn new_fail(message: impl Into<String>) -> Self {
            Self::new(MockBehavior::Fail(message.into()))
        }

        pub fn new_delayed(duration: Duration) -> Self {
            Self::new(MockBehavior::Delay(duration))
        }

        /// Total number of started invocations
        pub fn call_count(&self) -> usize {
            self.calls.lock().unwrap().values().sum()
        }

        /// Number of started invocations for one queue
        pub fn calls_for(&self, queue: &str) -> usize {
            self.calls.lock().unwrap().get(queue).copied().unwrap_or(0)
        }

        /// Number of invocations that ran to completion
        pub fn completed_count(&self) -> usize {
            *self.completed.lock().unwrap()
        }
    }

    #[async_trait]
    impl JobRunner for MockJobRunner {
        async fn run(&self, invocation: &JobInvocation) -> Result<RunOutcome, RunnerError> {
            *self
                .calls
                .lock()
                .unwrap()
                .entry(invocation.queue.clone())
                .or_insert(0) += 1;

            let behavior = self.behavior.lock().unwrap().clone();

            let result = match behavior {
                MockBehavior::Success => Ok(RunOutcome {
                    exit_code: Some(0),
                    duration_ms: 0,
                }),
                MockBehavior::Exit(code) => Ok(RunOutcome {
                    exit_code: Some(code),
                    duration_ms: 0,
                }),
                MockBehavior::Fail(msg) => Err(RunnerError::SpawnFailed(msg)),
                MockBehavior::Delay(duration) => {
                    tokio::time::sleep(duration).await;
                    Ok(RunOutcome {
                        exit_code: Some(0),
                        duration_ms: duration.as_millis() as u64,
                    })
                }
            };

            *self.completed.lock().unwrap() += 1;
            result
        }
    }
}
