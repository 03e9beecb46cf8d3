//! Tracing setup for the chatdesk binary.
//!
//! Logs go to a daily-rolling file so they never interleave with the REPL:
//! `~/.local/share/chatdesk/logs/chatdesk.YYYY-MM-DD.log` (or platform
//! equivalent, or `logging.directory` when configured).

use chatdesk_core::config::LoggingConfig;
use chatdesk_infrastructure::ChatdeskPaths;
use std::path::PathBuf;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

const LOG_FILE_PREFIX: &str = "chatdesk";
const LOG_FILE_SUFFIX: &str = "log";

/// Installs the global subscriber.
///
/// `RUST_LOG` wins over `config.filter`. The returned guard flushes the
/// non-blocking writer on drop and must live as long as the process. Returns
/// `None` when logging fell back to stderr.
pub fn init(config: &LoggingConfig) -> Option<WorkerGuard> {
    let filter = || {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.filter))
    };

    let Some(directory) = log_directory(config) else {
        eprintln!("[chatdesk] No log directory available, logging to stderr");
        init_stderr(filter());
        return None;
    };

    if let Err(e) = std::fs::create_dir_all(&directory) {
        eprintln!(
            "[chatdesk] Failed to create log directory {:?}: {}",
            directory, e
        );
        init_stderr(filter());
        return None;
    }

    let appender = match RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(LOG_FILE_PREFIX)
        .filename_suffix(LOG_FILE_SUFFIX)
        .build(&directory)
    {
        Ok(appender) => appender,
        Err(e) => {
            eprintln!("[chatdesk] Failed to open log file in {:?}: {}", directory, e);
            init_stderr(filter());
            return None;
        }
    };

    let (writer, guard) = tracing_appender::non_blocking(appender);
    let installed = tracing_subscriber::registry()
        .with(filter())
        .with(
            fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_target(true)
                .with_file(true)
                .with_line_number(true),
        )
        .try_init();

    match installed {
        Ok(()) => tracing::info!("Logging initialized, writing to {:?}", directory),
        Err(e) => eprintln!("[chatdesk] Failed to set tracing subscriber: {}", e),
    }
    Some(guard)
}

fn log_directory(config: &LoggingConfig) -> Option<PathBuf> {
    config
        .directory
        .clone()
        .or_else(|| ChatdeskPaths::log_dir().ok())
}

fn init_stderr(filter: EnvFilter) {
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(true))
        .try_init();
}
