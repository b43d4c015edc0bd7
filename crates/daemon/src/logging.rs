// Logging setup: tracing-subscriber to stderr, or a daily rolling file
// stdout is reserved for command output (dry-run lines, service results)

use anyhow::Result;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const DEFAULT_FILTER: &str = "queue_daemon=info";
const LOG_FILE_PREFIX: &str = "queue-daemon.log";

/// Initialize the global subscriber
///
/// # Environment Variables
///
/// - `RUST_LOG`: filter directives (default: `queue_daemon=info`)
/// - `QUEUE_DAEMON_LOG_FORMAT`: `json` or `pretty` (default)
/// - `QUEUE_DAEMON_LOG_DIR`: write to `<dir>/queue-daemon.log.<date>` instead of stderr
///
/// The returned guard flushes the file writer on drop; keep it alive in `main`.
pub fn init() -> Result<Option<WorkerGuard>> {
    let log_format =
        std::env::var("QUEUE_DAEMON_LOG_FORMAT").unwrap_or_else(|_| "pretty".to_string());

    let env_filter =
        EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(DEFAULT_FILTER))?;

    let (writer, guard) = match std::env::var_os("QUEUE_DAEMON_LOG_DIR") {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX);
            let (non_blocking, guard) = tracing_appender::non_blocking(appender);
            (BoxMakeWriter::new(non_blocking), Some(guard))
        }
        None => (BoxMakeWriter::new(std::io::stderr), None),
    };
    let ansi = guard.is_none();

    match log_format.as_str() {
        "json" => {
            // Production: JSON structured logging
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().json().with_writer(writer))
                .try_init()?;
        }
        _ => {
            // Development: Pretty formatting
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().pretty().with_ansi(ansi).with_writer(writer))
                .try_init()?;
        }
    }

    Ok(guard)
}
