//! Queue Daemon - Main Entry Point
//! Service lifecycle commands, dry run, or the supervisor itself

mod cli;
mod logging;
mod preview;
mod signals;

use anyhow::{Context, Result};
use colored::Colorize;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};

use cli::{Cli, Commands, ServiceCommand};
use preview::StdoutPreview;
use signals::ShutdownSignals;

use queue_daemon_core::application::{resolve_queue_specs, DryRun, Supervisor};
use queue_daemon_core::domain::{JobCommand, QueueSpec};
use queue_daemon_core::port::{ServiceError, ServiceManager};
use queue_daemon_infra_config::FileQueueSource;
use queue_daemon_infra_system::{ServiceConfig, SubprocessRunner, SystemdServiceManager};

const VERSION: &str = env!("CARGO_PKG_VERSION");

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse_or_exit();

    // 1. Initialize logging (guard flushes the file writer on exit)
    let _log_guard = logging::init()?;

    match cli.command {
        Some(Commands::DryRun) => {
            run_dry(&cli).await?;
            Ok(ExitCode::SUCCESS)
        }
        Some(Commands::Service(command)) => Ok(run_service_command(&cli, command)),
        None => {
            run_daemon(&cli).await?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// Load the queue file: explicit path, or config.* beside the executable
fn load_queue_source(cli: &Cli) -> Result<FileQueueSource> {
    let source = match cli.config_path() {
        Some(path) => FileQueueSource::load(&path),
        None => FileQueueSource::load_beside_executable(),
    };
    let source = source.context("Error reading config file")?;
    info!(path = %source.path().display(), "Using queue configuration");
    Ok(source)
}

/// Resolve every queue before anything is spawned
fn load_queue_specs(cli: &Cli) -> Result<Vec<QueueSpec>> {
    let source = load_queue_source(cli)?;
    resolve_queue_specs(&source).context("Enter valid parameters in the config file")
}

fn job_command(cli: &Cli) -> JobCommand {
    JobCommand::new(cli.console_root.clone(), cli.job_command.clone())
}

/// Daemon body: run all queues until a termination signal, then drain
async fn run_daemon(cli: &Cli) -> Result<()> {
    info!("Queue daemon v{} starting...", VERSION);

    let specs = load_queue_specs(cli)?;

    let mut runner = SubprocessRunner::new();
    if let Some(secs) = cli.invocation_timeout {
        runner = runner.with_timeout(Duration::from_secs(secs));
    }

    let signals = ShutdownSignals::install().context("Failed to install signal handlers")?;

    let supervisor = Supervisor::new(specs, &job_command(cli), Arc::new(runner));
    let report = supervisor
        .run_until(async move {
            let signal = signals.recv().await;
            info!(signal = signal, "Shutdown signal received. Stopping queues...");
        })
        .await;

    info!(
        queues = report.queues,
        workers = report.workers,
        invocations = report.invocations,
        "Shutdown complete."
    );
    Ok(())
}

/// Preview loop; runs until the process is killed
async fn run_dry(cli: &Cli) -> Result<()> {
    let specs = load_queue_specs(cli)?;
    DryRun::new(specs, &job_command(cli), Arc::new(StdoutPreview))
        .run()
        .await;
    Ok(())
}

/// install/remove/start/stop/status; never touches a running daemon
fn run_service_command(cli: &Cli, command: ServiceCommand) -> ExitCode {
    let manager = match service_manager(cli) {
        Ok(manager) => manager,
        Err(e) => {
            error!(error = %e, "Error initializing service");
            eprintln!("{} {}", "✗".red(), e);
            return ExitCode::FAILURE;
        }
    };

    let result = match command {
        ServiceCommand::Install => manager.install(),
        ServiceCommand::Remove => manager.remove(),
        ServiceCommand::Start => manager.start(),
        ServiceCommand::Stop => manager.stop(),
        ServiceCommand::Status => manager.status(),
    };

    match result {
        Ok(message) => {
            println!("{}", message.green().bold());
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(command = ?command, error = %e, "Service command failed");
            eprintln!("{} {}", "✗".red(), e.to_string().red());
            ExitCode::FAILURE
        }
    }
}

fn service_manager(cli: &Cli) -> Result<SystemdServiceManager, ServiceError> {
    let mut config = ServiceConfig::for_current_exe()?;
    config.exec_args = cli.service_args();
    config.unit_dir = cli.unit_dir.clone();
    Ok(SystemdServiceManager::new(config))
}
