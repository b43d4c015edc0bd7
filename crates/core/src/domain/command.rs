// Job Command - the external console invocation a worker performs per tick

use super::queue::QueueSpec;
use std::path::PathBuf;

/// Default directory holding one checkout per project
pub const DEFAULT_CONSOLE_ROOT: &str = "/uni";

/// Default console subcommand that receives queue messages
pub const DEFAULT_JOB_SUBCOMMAND: &str = "uecode:qpush:receive";

/// Template for building job invocations.
///
/// The program is `<console_root>/<project>/app/console`; arguments are
/// `<subcommand> <queue> --no-debug --env=<environment>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobCommand {
    console_root: PathBuf,
    subcommand: String,
}

impl JobCommand {
    pub fn new(console_root: impl Into<PathBuf>, subcommand: impl Into<String>) -> Self {
        Self {
            console_root: console_root.into(),
            subcommand: subcommand.into(),
        }
    }

    /// Build the invocation for a queue
    pub fn invocation(&self, spec: &QueueSpec) -> JobInvocation {
        let program = self
            .console_root
            .join(spec.project())
            .join("app")
            .join("console");

        JobInvocation {
            queue: spec.name().to_string(),
            program,
            args: vec![
                self.subcommand.clone(),
                spec.name().to_string(),
                "--no-debug".to_string(),
                format!("--env={}", spec.environment()),
            ],
        }
    }
}

impl Default for JobCommand {
    fn default() -> Self {
        Self::new(DEFAULT_CONSOLE_ROOT, DEFAULT_JOB_SUBCOMMAND)
    }
}

/// A fully resolved command line for one queue
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobInvocation {
    pub queue: String,
    pub program: PathBuf,
    pub args: Vec<String>,
}

impl JobInvocation {
    /// Render as a single shell-like line (dry-run output)
    pub fn render(&self) -> String {
        let mut line = self.program.display().to_string();
        for arg in &self.args {
            line.push(' ');
            line.push_str(arg);
        }
        line
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_render() {
        let spec = QueueSpec::new("q1", 2, 1, "dev", "p").unwrap();
        let invocation = JobCommand::default().invocation(&spec);

        assert_eq!(invocation.queue, "q1");
        assert_eq!(invocation.program, PathBuf::from("/uni/p/app/console"));
        assert_eq!(
            invocation.render(),
            "/uni/p/app/console uecode:qpush:receive q1 --no-debug --env=dev"
        );
    }

    #[test]
    fn test_custom_root_and_subcommand() {
        let spec = QueueSpec::new("mail", 1, 1, "prod", "shop").unwrap();
        let invocation = JobCommand::new("/srv/apps", "queue:consume").invocation(&spec);

        assert_eq!(invocation.program, PathBuf::from("/srv/apps/shop/app/console"));
        assert_eq!(
            invocation.args,
            vec!["queue:consume", "mail", "--no-debug", "--env=prod"]
        );
    }
}
