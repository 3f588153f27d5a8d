//! Structured logging setup.
//!
//! # Responsibilities
//! - Build the global tracing subscriber from `LoggingConfig`
//! - Route output to stdout or an append-only log file
//! - Apply the configured level and timestamp format
//!
//! # Design Decisions
//! - `RUST_LOG` overrides the configured level (standard tracing behavior)
//! - Unknown level strings fall back to `info` instead of erroring
//! - Production mode emits JSON; other modes emit the human format

use std::fs::OpenOptions;
use std::io::{self, IsTerminal};
use std::path::PathBuf;

use thiserror::Error;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::time::ChronoLocal;
use tracing_subscriber::EnvFilter;

use crate::config::{LoggingConfig, RunMode};

/// Sentinel log path selecting stdout instead of a file.
pub const STDOUT_PATH: &str = "stdout";

/// Error type for logging setup.
#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("failed to open log file {}: {source}", .path.display())]
    OpenLogFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Install the global tracing subscriber.
///
/// Returns the worker guard keeping the non-blocking file writer alive; the
/// caller must hold it for the process lifetime when logging to a file.
/// Calling this twice is a no-op the second time, which keeps test binaries
/// that share one process safe.
pub fn init(config: &LoggingConfig, mode: RunMode) -> Result<Option<WorkerGuard>, LoggingError> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| level_filter(&config.level));
    let timer = ChronoLocal::new(config.time_format.clone());

    if config.path == STDOUT_PATH {
        let builder = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_timer(timer)
            .with_ansi(io::stdout().is_terminal());
        if mode == RunMode::Production {
            let _ = builder.json().flatten_event(true).try_init();
        } else {
            let _ = builder.try_init();
        }
        return Ok(None);
    }

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&config.path)
        .map_err(|source| LoggingError::OpenLogFile {
            path: PathBuf::from(&config.path),
            source,
        })?;
    let (writer, guard) = tracing_appender::non_blocking(file);

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_timer(timer)
        .with_writer(writer)
        .with_ansi(false);
    if mode == RunMode::Production {
        let _ = builder.json().flatten_event(true).try_init();
    } else {
        let _ = builder.try_init();
    }

    Ok(Some(guard))
}

/// Turn a configured level string into a filter, coercing garbage to `info`.
fn level_filter(level: &str) -> EnvFilter {
    EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("info"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_levels_parse() {
        for level in ["trace", "debug", "info", "warn", "error"] {
            assert_eq!(level_filter(level).to_string(), level);
        }
    }

    #[test]
    fn garbage_level_falls_back_to_info() {
        assert_eq!(level_filter("not a !!! directive").to_string(), "info");
    }

    #[test]
    fn unwritable_log_file_is_an_error() {
        let config = LoggingConfig {
            path: "/nonexistent-dir/origin-gate.log".to_string(),
            ..LoggingConfig::default()
        };
        let err = init(&config, RunMode::Development).unwrap_err();
        assert!(matches!(err, LoggingError::OpenLogFile { .. }));
    }

    #[test]
    fn double_init_is_harmless() {
        let config = LoggingConfig::default();
        assert!(init(&config, RunMode::Development).unwrap().is_none());
        assert!(init(&config, RunMode::Development).unwrap().is_none());
    }
}
