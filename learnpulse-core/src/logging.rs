//! Logging for learnpulse
//!
//! The CLI is quiet by default. With `--verbose` it writes a daily log file,
//! `learnpulse.log.<date>`, to the XDG state directory.

use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

use crate::config::{Config, LoggingConfig};
use crate::error::{Error, Result};

/// File name prefix of the rotated log files.
pub const LOG_FILE_PREFIX: &str = "learnpulse.log";

/// Install the file logger in the XDG state directory.
///
/// `RUST_LOG` overrides `logging.level` when set. The returned guard must be
/// held until exit; dropping it flushes buffered lines.
pub fn init(config: &LoggingConfig) -> Result<LoggingGuard> {
    init_in(&Config::state_dir(), config)
}

/// Install the file logger writing under `log_dir`.
pub fn init_in(log_dir: &Path, config: &LoggingConfig) -> Result<LoggingGuard> {
    let filter = build_filter(std::env::var("RUST_LOG").ok().as_deref(), &config.level)?;

    std::fs::create_dir_all(log_dir)?;

    let appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(LOG_FILE_PREFIX)
        .max_log_files(config.max_files.max(1))
        .build(log_dir)
        .map_err(|e| Error::Config(format!("failed to create log file: {}", e)))?;
    let (writer, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_target(true),
        )
        .try_init()
        .map_err(|e| Error::Config(format!("failed to install logger: {}", e)))?;

    tracing::info!(
        log_dir = %log_dir.display(),
        level = %config.level,
        max_files = config.max_files,
        "Logging initialized"
    );

    Ok(LoggingGuard { _guard: guard })
}

/// Filter from `RUST_LOG` if it parses, else from the configured level.
///
/// A bad configured level is a config error rather than a silent default.
fn build_filter(env_directives: Option<&str>, level: &str) -> Result<EnvFilter> {
    if let Some(filter) = env_directives.and_then(|d| EnvFilter::try_new(d).ok()) {
        return Ok(filter);
    }
    EnvFilter::try_new(level)
        .map_err(|e| Error::Config(format!("invalid logging.level '{}': {}", level, e)))
}

/// Log to the test writer, filtered by `RUST_LOG`.
pub fn init_test() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .with_span_events(FmtSpan::CLOSE)
        .try_init();
}

/// Keeps the background log writer alive.
pub struct LoggingGuard {
    _guard: WorkerGuard,
}
