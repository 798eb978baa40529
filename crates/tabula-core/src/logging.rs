//! File-backed `tracing` setup.
//!
//! A full-screen terminal UI owns stdout, so diagnostics go to a file
//! instead. [`init_file_logging`] installs a global `tracing-subscriber`
//! formatter writing through a non-blocking `tracing-appender` worker.

use std::path::{Path, PathBuf};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

/// Errors raised while installing the log subscriber.
#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    /// The log path has no file name component.
    #[error("log path {0:?} does not name a file")]
    InvalidPath(PathBuf),
    /// The log directory could not be created.
    #[error("could not create log directory: {0}")]
    Io(#[from] std::io::Error),
    /// The fallback filter directive did not parse.
    #[error("invalid log filter: {0}")]
    Filter(#[from] tracing_subscriber::filter::ParseError),
    /// A global subscriber is already installed.
    #[error("could not install log subscriber: {0}")]
    Install(String),
}

/// Send `tracing` output to `path` (appending).
///
/// `RUST_LOG` takes precedence; `default_filter` (e.g. `"info"` or
/// `"tabula_widgets=debug"`) applies when it is unset or invalid. Keep the
/// returned guard alive for as long as logging should work; dropping it
/// flushes and stops the writer thread.
///
/// ```no_run
/// let _guard = tabula_core::logging::init_file_logging("tabula.log", "debug").unwrap();
/// tracing::info!("ready");
/// ```
pub fn init_file_logging(
    path: impl AsRef<Path>,
    default_filter: &str,
) -> Result<WorkerGuard, LoggingError> {
    let path = path.as_ref();
    let file_name = path
        .file_name()
        .ok_or_else(|| LoggingError::InvalidPath(path.to_path_buf()))?;
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir)?;

    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(default_filter)?,
    };

    let (writer, guard) = tracing_appender::non_blocking(tracing_appender::rolling::never(
        dir, file_name,
    ));
    tracing_subscriber::fmt()
        .with_writer(writer)
        .with_ansi(false)
        .with_env_filter(filter)
        .try_init()
        .map_err(|e| LoggingError::Install(e.to_string()))?;

    Ok(guard)
}
