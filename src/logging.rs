//! `tracing` subscriber setup for binaries and integration harnesses.

use std::path::Path;

use thiserror::Error;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::filter::ParseError;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::{
    SubscriberInitExt,
    TryInitError,
};
use tracing_subscriber::{
    EnvFilter,
    fmt,
};

use crate::config::LogSettings;

#[derive(Error, Debug)]
pub enum LoggingError {
    #[error("Invalid log filter: {0}")]
    InvalidFilter(#[from] ParseError),

    #[error("Log file path has no file name: {0}")]
    InvalidFile(String),

    #[error("Global subscriber already installed: {0}")]
    AlreadyInitialized(#[from] TryInitError),
}

/// Install the global subscriber.
///
/// `RUST_LOG` overrides `settings.filter`. When `settings.file` is set, logs
/// are written there through a non-blocking writer; keep the returned guard
/// alive until exit so buffered lines are flushed.
///
/// # Errors
/// Returns [`LoggingError`] for an invalid filter or file, or when a global
/// subscriber is already installed.
pub fn init(settings: &LogSettings) -> Result<Option<WorkerGuard>, LoggingError> {
    let filter = EnvFilter::try_from_default_env().or_else(|_| parse_filter(&settings.filter))?;

    let Some(file) = &settings.file else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_writer(std::io::stderr))
            .try_init()?;
        return Ok(None);
    };

    let path = Path::new(file);
    let name = path.file_name().ok_or_else(|| LoggingError::InvalidFile(file.clone()))?;
    let dir = path.parent().filter(|dir| !dir.as_os_str().is_empty()).unwrap_or(Path::new("."));

    let (writer, guard) = tracing_appender::non_blocking(tracing_appender::rolling::never(dir, name));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_ansi(false).with_writer(writer))
        .try_init()?;
    Ok(Some(guard))
}

/// Parse `EnvFilter` directives such as `"info,portfolio_i18n=debug"`.
///
/// # Errors
/// Returns [`ParseError`] for malformed directives.
pub fn parse_filter(directives: &str) -> Result<EnvFilter, ParseError> {
    EnvFilter::try_new(directives)
}
