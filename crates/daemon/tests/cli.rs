//! Binary-level tests: argument handling, fatal config errors, dry run and
//! a full start/signal/drain cycle against a fake console script.

use std::fs;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Output, Stdio};
use std::time::{Duration, Instant};
use tempfile::TempDir;

const BIN: &str = env!("CARGO_BIN_EXE_queue-daemon");

fn daemon() -> Command {
    let mut cmd = Command::new(BIN);
    cmd.env_remove("QUEUE_DAEMON_CONFIG")
        .env_remove("QUEUE_DAEMON_LOG_DIR")
        .env("QUEUE_DAEMON_LOG_FORMAT", "json")
        .env("RUST_LOG", "queue_daemon=info");
    cmd
}

fn write_config(dir: &Path, body: &str) -> PathBuf {
    let path = dir.join("config.yaml");
    fs::write(&path, body).unwrap();
    path
}

fn run(cmd: &mut Command) -> Output {
    cmd.stdin(Stdio::null()).output().unwrap()
}

#[test]
fn test_unknown_command_prints_usage_hint() {
    let output = run(daemon().arg("restart"));

    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("Enter a valid input: install | start | stop | remove | status | dry-run")
    );
}

#[test]
fn test_status_when_not_installed() {
    let units = TempDir::new().unwrap();
    let output = run(daemon().arg("status").arg("--unit-dir").arg(units.path()));

    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Service is not installed"));
}

#[test]
fn test_invalid_queue_is_fatal_before_start() {
    let dir = TempDir::new().unwrap();
    let config = write_config(
        dir.path(),
        "q1:\n  processes: \"0\"\n  interval: \"1\"\n  environment: dev\n  project: p\n",
    );

    let output = run(daemon().arg("--config").arg(&config));

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Enter valid parameters"), "stderr: {}", stderr);
    assert!(!stderr.contains("Worker started"));
    assert!(output.stdout.is_empty());
}

#[test]
fn test_missing_config_is_fatal() {
    let dir = TempDir::new().unwrap();
    let output = run(daemon().arg("--config").arg(dir.path().join("absent.yaml")));

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Error reading config file"));
}

#[test]
fn test_dry_run_prints_one_line_per_worker() {
    let dir = TempDir::new().unwrap();
    let config = write_config(
        dir.path(),
        "q1:\n  processes: \"2\"\n  interval: \"1\"\n  environment: dev\n  project: p\n",
    );

    // Default logging: log records go to stderr, stdout carries only commands
    let mut child = daemon()
        .env_remove("RUST_LOG")
        .env_remove("QUEUE_DAEMON_LOG_FORMAT")
        .arg("dry-run")
        .arg("--config")
        .arg(&config)
        .stdout(Stdio::piped())
        .spawn()
        .unwrap();

    let stdout = child.stdout.take().unwrap();
    let lines: Vec<String> = BufReader::new(stdout)
        .lines()
        .take(4)
        .map(|l| l.unwrap())
        .collect();
    child.kill().unwrap();
    child.wait().unwrap();

    assert_eq!(lines.len(), 4);
    for line in lines {
        assert_eq!(line, "/uni/p/app/console uecode:qpush:receive q1 --no-debug --env=dev");
    }
}

#[cfg(unix)]
mod daemon_lifecycle {
    use super::*;
    use nix::sys::signal::{kill, Signal};
    use nix::unistd::Pid;
    use std::os::unix::fs::PermissionsExt;

    /// `<root>/<project>/app/console` that appends its arguments to `calls.log`
    fn fake_console(root: &Path, project: &str) -> PathBuf {
        let app = root.join(project).join("app");
        fs::create_dir_all(&app).unwrap();
        let log = root.join("calls.log");
        let console = app.join("console");
        fs::write(
            &console,
            format!("#!/bin/sh\necho \"$@\" >> {}\n", log.display()),
        )
        .unwrap();
        fs::set_permissions(&console, fs::Permissions::from_mode(0o755)).unwrap();
        log
    }

    fn read_calls(log: &Path) -> Vec<String> {
        fs::read_to_string(log)
            .unwrap_or_default()
            .lines()
            .map(str::to_string)
            .collect()
    }

    fn wait_for_exit(child: &mut Child, limit: Duration) -> Option<std::process::ExitStatus> {
        let deadline = Instant::now() + limit;
        while Instant::now() < deadline {
            if let Some(status) = child.try_wait().unwrap() {
                return Some(status);
            }
            std::thread::sleep(Duration::from_millis(50));
        }
        None
    }

    fn start_daemon(root: &Path, config: &Path) -> Child {
        daemon()
            .arg("--config")
            .arg(config)
            .arg("--console-root")
            .arg(root)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .unwrap()
    }

    #[test]
    fn test_sigterm_drains_all_workers() {
        let root = TempDir::new().unwrap();
        let calls = fake_console(root.path(), "p");
        let config = write_config(
            root.path(),
            "q1:\n  processes: \"2\"\n  interval: \"1\"\n  environment: dev\n  project: p\n",
        );

        let mut child = start_daemon(root.path(), &config);

        let deadline = Instant::now() + Duration::from_secs(10);
        while read_calls(&calls).len() < 4 && Instant::now() < deadline {
            std::thread::sleep(Duration::from_millis(50));
        }
        assert!(read_calls(&calls).len() >= 4, "workers never invoked the console");

        kill(Pid::from_raw(child.id() as i32), Signal::SIGTERM).unwrap();
        let status =
            wait_for_exit(&mut child, Duration::from_secs(10)).expect("daemon did not exit");
        assert!(status.success());

        let output = child.wait_with_output().unwrap();
        let stderr = String::from_utf8_lossy(&output.stderr);
        assert!(stderr.contains("All queues stopped"), "stderr: {}", stderr);
        assert!(output.stdout.is_empty());

        let after_exit = read_calls(&calls);
        assert!(after_exit
            .iter()
            .all(|c| c == "uecode:qpush:receive q1 --no-debug --env=dev"));

        std::thread::sleep(Duration::from_millis(1_500));
        assert_eq!(read_calls(&calls).len(), after_exit.len());
    }

    #[test]
    fn test_failing_console_keeps_daemon_running() {
        let root = TempDir::new().unwrap();
        let config = write_config(
            root.path(),
            "q1:\n  processes: \"1\"\n  interval: \"1\"\n  environment: dev\n  project: missing\n",
        );

        let mut child = start_daemon(root.path(), &config);

        std::thread::sleep(Duration::from_millis(1_500));
        assert!(child.try_wait().unwrap().is_none(), "daemon exited on a failed invocation");

        kill(Pid::from_raw(child.id() as i32), Signal::SIGINT).unwrap();
        let status =
            wait_for_exit(&mut child, Duration::from_secs(10)).expect("daemon did not exit");
        assert!(status.success());

        let output = child.wait_with_output().unwrap();
        assert!(String::from_utf8_lossy(&output.stderr).contains("CLI execution error"));
    }
}
