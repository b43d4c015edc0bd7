// Subprocess job runner
// reason: async-trait, tokio::process for async child management
use async_trait::async_trait;
use std::process::{ExitStatus, Stdio};
use std::time::Duration;
use tokio::process::Command;
use tokio::time::{timeout, Instant};
use tracing::{debug, info};

use queue_daemon_core::domain::JobInvocation;
use queue_daemon_core::port::{JobRunner, RunOutcome, RunnerError};

/// Runs the console command as a child process and waits for it.
///
/// Output is inherited, not captured or parsed. Without a timeout (the
/// default) a started child is always awaited to completion.
#[derive(Debug, Clone, Default)]
pub struct SubprocessRunner {
    timeout: Option<Duration>,
}

impl SubprocessRunner {
    /// Create a runner that never cancels an invocation
    pub fn new() -> Self {
        Self::default()
    }

    /// Kill a child that runs longer than `limit`
    ///
    /// # Example
    /// ```ignore
    /// let runner = SubprocessRunner::new().with_timeout(Duration::from_secs(300));
    /// ```
    pub fn with_timeout(mut self, limit: Duration) -> Self {
        self.timeout = Some(limit);
        self
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Spawn child process and wait for its exit status
    async fn spawn_and_wait(&self, invocation: &JobInvocation) -> Result<ExitStatus, RunnerError> {
        let mut child = Command::new(&invocation.program)
            .args(&invocation.args)
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .kill_on_drop(self.timeout.is_some())
            .spawn()
            .map_err(|e| {
                RunnerError::SpawnFailed(format!("{}: {}", invocation.program.display(), e))
            })?;

        match self.timeout {
            Some(limit) => {
                let waited = timeout(limit, child.wait()).await;
                match waited {
                    Ok(Ok(status)) => Ok(status),
                    Ok(Err(e)) => Err(RunnerError::Io(e.to_string())),
                    Err(_) => {
                        // kill() also reaps the child
                        let _ = child.kill().await;
                        Err(RunnerError::Timeout(limit.as_millis() as u64))
                    }
                }
            }
            None => child.wait().await.map_err(|e| RunnerError::Io(e.to_string())),
        }
    }
}

#[async_trait]
impl JobRunner for SubprocessRunner {
    async fn run(&self, invocation: &JobInvocation) -> Result<RunOutcome, RunnerError> {
        let start = Instant::now();

        debug!(
            queue = %invocation.queue,
            command = %invocation.render(),
            "Starting job runner"
        );

        let status = self.spawn_and_wait(invocation).await?;
        let duration_ms = start.elapsed().as_millis() as u64;

        let outcome = RunOutcome {
            exit_code: status.code(),
            duration_ms,
        };

        info!(
            queue = %invocation.queue,
            duration_ms = duration_ms,
            exit_code = ?outcome.exit_code,
            "Job runner finished"
        );

        Ok(outcome)
    }
}
