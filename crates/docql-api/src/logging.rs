//! Logging configuration for docql
//!
//! The core emits `tracing` events when queries are classified, compiled,
//! prepared, bound and executed. This module installs a subscriber for them.

use std::path::{Path, PathBuf};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const DEFAULT_FILE_NAME: &str = "docql.log";

/// Error raised while installing the global subscriber
pub type InitError = Box<dyn std::error::Error + Send + Sync>;

/// Log output destination
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogOutput {
    /// Output to stdout
    Stdout,
    /// Output to a daily rolling file
    File(PathBuf),
    /// Output to both stdout and file
    Both(PathBuf),
}

/// Log format style
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable multi-line format
    Pretty,
    /// Compact single-line format
    Compact,
}

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Filter directive, e.g. `info` or `docql_core=trace`
    pub level: String,
    pub output: LogOutput,
    pub format: LogFormat,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            output: LogOutput::Stdout,
            format: LogFormat::Pretty,
        }
    }
}

impl LogConfig {
    pub fn info() -> Self {
        Self::default()
    }

    /// Debug level: one event per compiled query and per prepared statement
    pub fn debug() -> Self {
        Self {
            level: "debug".to_string(),
            ..Default::default()
        }
    }

    /// Trace level: adds every translated condition tree
    pub fn trace() -> Self {
        Self {
            level: "trace".to_string(),
            ..Default::default()
        }
    }

    pub fn warn() -> Self {
        Self {
            level: "warn".to_string(),
            ..Default::default()
        }
    }

    /// Set log output to a daily rolling file
    pub fn with_file<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.output = LogOutput::File(path.into());
        self
    }

    /// Set log output to both stdout and file
    pub fn with_both<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.output = LogOutput::Both(path.into());
        self
    }

    pub fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_level<S: Into<String>>(mut self, level: S) -> Self {
        self.level = level.into();
        self
    }

    /// Build the filter, preferring `RUST_LOG` over the configured level
    pub fn filter(&self) -> Result<EnvFilter, InitError> {
        match EnvFilter::try_from_default_env() {
            Ok(filter) => Ok(filter),
            Err(_) => Ok(EnvFilter::try_new(&self.level)?),
        }
    }

    /// Initialize global logging with this configuration
    ///
    /// Returns a guard that must be kept alive while logging to a file.
    /// Dropping it flushes and stops the writer thread. Fails if the level
    /// is not a valid filter or a global subscriber is already installed.
    ///
    /// # Examples
    ///
    /// ```rust,no_run
    /// use docql::logging::LogConfig;
    ///
    /// let _guard = LogConfig::debug().init()?;
    /// # Ok::<(), docql::logging::InitError>(())
    /// ```
    pub fn init(self) -> Result<Option<WorkerGuard>, InitError> {
        let env_filter = self.filter()?;

        match self.output {
            LogOutput::Stdout => {
                match self.format {
                    LogFormat::Pretty => tracing_subscriber::registry()
                        .with(env_filter)
                        .with(fmt::layer().pretty())
                        .try_init()?,
                    LogFormat::Compact => tracing_subscriber::registry()
                        .with(env_filter)
                        .with(fmt::layer().compact())
                        .try_init()?,
                }
                Ok(None)
            }
            LogOutput::File(path) => {
                let (non_blocking, guard) = tracing_appender::non_blocking(rolling_file(&path));

                match self.format {
                    LogFormat::Pretty => tracing_subscriber::registry()
                        .with(env_filter)
                        .with(fmt::layer().with_writer(non_blocking).pretty())
                        .try_init()?,
                    LogFormat::Compact => tracing_subscriber::registry()
                        .with(env_filter)
                        .with(fmt::layer().with_writer(non_blocking).compact())
                        .try_init()?,
                }
                Ok(Some(guard))
            }
            LogOutput::Both(path) => {
                let (non_blocking, guard) = tracing_appender::non_blocking(rolling_file(&path));

                // Both outputs share the default format
                tracing_subscriber::registry()
                    .with(env_filter)
                    .with(fmt::layer())
                    .with(fmt::layer().with_writer(non_blocking).with_ansi(false))
                    .try_init()?;

                Ok(Some(guard))
            }
        }
    }
}

fn rolling_file(path: &Path) -> tracing_appender::rolling::RollingFileAppender {
    tracing_appender::rolling::daily(
        path.parent().unwrap_or_else(|| Path::new(".")),
        path.file_name()
            .and_then(|n| n.to_str())
            .unwrap_or(DEFAULT_FILE_NAME),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_config_defaults() {
        let config = LogConfig::default();
        assert_eq!(config.level, "info");
        assert_eq!(config.output, LogOutput::Stdout);
        assert_eq!(config.format, LogFormat::Pretty);
    }

    #[test]
    fn test_log_config_builders() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("query.log");
        let config = LogConfig::trace()
            .with_file(&path)
            .with_format(LogFormat::Compact);
        assert_eq!(config.level, "trace");
        assert_eq!(config.output, LogOutput::File(path));
        assert_eq!(config.format, LogFormat::Compact);
    }

    #[test]
    fn test_filter_accepts_directives() {
        let config = LogConfig::info().with_level("docql_core=trace,warn");
        assert!(config.filter().is_ok());
    }
}
