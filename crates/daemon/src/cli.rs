// Command-line surface: service lifecycle commands, dry run, or the bare daemon

use clap::error::ErrorKind;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use queue_daemon_core::domain::command::{DEFAULT_CONSOLE_ROOT, DEFAULT_JOB_SUBCOMMAND};
use queue_daemon_infra_system::service::DEFAULT_UNIT_DIR;

/// Printed together with clap's usage on any unknown command
pub const USAGE_HINT: &str =
    "Enter a valid input: install | start | stop | remove | status | dry-run";

#[derive(Parser, Debug)]
#[command(name = "queue-daemon")]
#[command(about = "Queue consumer daemon", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Without a command the daemon runs in the foreground until signalled
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Queue config file (default: config.yaml next to the executable)
    #[arg(long, env = "QUEUE_DAEMON_CONFIG", global = true)]
    pub config: Option<String>,

    /// Directory holding one checkout per project
    #[arg(
        long,
        env = "QUEUE_DAEMON_CONSOLE_ROOT",
        default_value = DEFAULT_CONSOLE_ROOT,
        global = true
    )]
    pub console_root: PathBuf,

    /// Console subcommand run for every queue tick
    #[arg(
        long,
        env = "QUEUE_DAEMON_JOB_COMMAND",
        default_value = DEFAULT_JOB_SUBCOMMAND,
        global = true
    )]
    pub job_command: String,

    /// Kill an invocation after this many seconds (default: never)
    #[arg(long, env = "QUEUE_DAEMON_INVOCATION_TIMEOUT", global = true)]
    pub invocation_timeout: Option<u64>,

    /// systemd unit directory used by the service commands
    #[arg(long, env = "QUEUE_DAEMON_UNIT_DIR", default_value = DEFAULT_UNIT_DIR, global = true)]
    pub unit_dir: PathBuf,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Commands {
    #[command(flatten)]
    Service(ServiceCommand),
    /// Print the commands each queue would run, every interval, until killed
    DryRun,
}

/// Service lifecycle commands; none of them reads the queue config
#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceCommand {
    /// Register as a systemd service
    Install,
    /// Unregister the service
    Remove,
    /// Start the registered service
    Start,
    /// Stop the registered service
    Stop,
    /// Print the service state
    Status,
}

impl Cli {
    /// Parse process arguments; exits with usage on bad input
    pub fn parse_or_exit() -> Self {
        match Self::try_parse() {
            Ok(cli) => cli,
            Err(e) => {
                if !matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) {
                    eprintln!("{}", USAGE_HINT);
                }
                e.exit()
            }
        }
    }

    /// Config path with `~` expanded
    pub fn config_path(&self) -> Option<PathBuf> {
        self.config
            .as_deref()
            .map(|path| PathBuf::from(shellexpand::tilde(path).into_owned()))
    }

    /// Daemon arguments for the service unit, so the service runs with the
    /// settings given at install time
    pub fn service_args(&self) -> Vec<String> {
        let mut args = Vec::new();
        if let Some(path) = self.config_path() {
            args.push("--config".to_string());
            args.push(path.display().to_string());
        }
        if self.console_root != PathBuf::from(DEFAULT_CONSOLE_ROOT) {
            args.push("--console-root".to_string());
            args.push(self.console_root.display().to_string());
        }
        if self.job_command != DEFAULT_JOB_SUBCOMMAND {
            args.push("--job-command".to_string());
            args.push(self.job_command.clone());
        }
        if let Some(secs) = self.invocation_timeout {
            args.push("--invocation-timeout".to_string());
            args.push(secs.to_string());
        }
        args
    }
}
