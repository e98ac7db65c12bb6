//! File logging for chatsift
//!
//! chatsift's reports go to stdout, so diagnostics never share that stream.
//! Logging is off unless the CLI is run with `--verbose`, in which case
//! [`init`] routes the core's `tracing` events (archive load, schema and
//! grouping summaries, name-inference decisions) to a daily log under
//! `$XDG_STATE_HOME/chatsift/`.
//!
//! `RUST_LOG` takes precedence over `[logging] level` in the config file.

use crate::config::{Config, LoggingConfig};
use crate::error::{Error, Result};
use std::path::PathBuf;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Install the file subscriber for a `--verbose` run.
///
/// The returned guard must live until the process exits; dropping it
/// flushes lines still queued on the background writer.
pub fn init(config: &LoggingConfig) -> Result<LoggingGuard> {
    let log_dir = Config::state_dir();
    std::fs::create_dir_all(&log_dir)?;

    let appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(LOG_FILE_NAME)
        .max_log_files(config.max_files.max(1))
        .build(&log_dir)
        .map_err(|e| Error::Config(format!("failed to open log file in {:?}: {}", log_dir, e)))?;
    let (writer, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::registry()
        .with(level_filter(&config.level))
        .with(
            fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_target(true),
        )
        .init();

    tracing::info!(
        log_dir = %log_dir.display(),
        level = %config.level,
        "Verbose logging enabled"
    );

    Ok(LoggingGuard { _guard: guard })
}

/// Route events to the test harness output; safe to call from every test.
pub fn init_test() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Keeps the background log writer running.
pub struct LoggingGuard {
    _guard: WorkerGuard,
}

/// Prefix of the daily log files (`chatsift.log.YYYY-MM-DD`).
pub const LOG_FILE_NAME: &str = "chatsift.log";

/// Base path of the log files
pub fn log_file_path() -> PathBuf {
    Config::log_path()
}

fn level_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level))
}
