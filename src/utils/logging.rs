//! Logging - tracing Subscriber Setup
//!
//! Logs go to a daily rolling file in the data directory so the terminal
//! view is never interleaved with log lines.

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::time::LocalTime;

use crate::constants::{DEFAULT_LOG_LEVEL, LOG_FILE_PREFIX};
use crate::domain::config::LogConfig;
use crate::error::{Error, Result};
use crate::helpers::{get_or_create_data_dir, is_development};

/// Pick the filter: `RUST_LOG` wins, then the configured level
///
/// Debug builds left at the default level log at `debug`.
pub fn build_filter(config: &LogConfig) -> Result<EnvFilter> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }

    let level = if is_development() && config.level == DEFAULT_LOG_LEVEL {
        "debug"
    } else {
        config.level.as_str()
    };

    EnvFilter::try_new(level).map_err(|e| Error::Invalid {
        message: format!("Invalid log level {level:?}: {e}"),
    })
}

/// Install the global subscriber
///
/// The returned guard flushes buffered lines on drop; keep it alive for the
/// life of the process.
pub fn init_logging(config: &LogConfig) -> Result<WorkerGuard> {
    let log_dir = get_or_create_data_dir()?;
    let file_appender = tracing_appender::rolling::daily(&log_dir, LOG_FILE_PREFIX);
    let (writer, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::fmt()
        .with_env_filter(build_filter(config)?)
        .with_timer(LocalTime::rfc_3339())
        .with_writer(writer)
        .with_ansi(false)
        .try_init()
        .map_err(|e| Error::Invalid {
            message: format!("Failed to install tracing subscriber: {e}"),
        })?;

    tracing::info!(dir = ?log_dir, "Logging initialized");
    Ok(guard)
}
