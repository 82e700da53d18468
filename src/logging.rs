//! Logging setup.
//!
//! The library only emits `tracing` events; binaries decide where they go.
//! [`init`] installs a `tracing-subscriber` fmt subscriber writing to stderr,
//! so streamed completions on stdout stay clean. `RUST_LOG` overrides the
//! configured level.

use crate::error::LiquidBooksError;
use serde::{Deserialize, Serialize};
use tracing_subscriber::filter::{EnvFilter, LevelFilter};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Logging configuration, the `[logging]` table of the configuration file.
///
/// # Example
///
/// ```rust
/// use liquidbooks_ai::logging::{LogFormat, LogLevel, LoggingConfig};
///
/// let config = LoggingConfig::new()
///     .with_level(LogLevel::Debug)
///     .with_format(LogFormat::Json);
/// assert_eq!(config.level, LogLevel::Debug);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level filter.
    pub level: LogLevel,
    /// Output format.
    pub format: LogFormat,
}

impl LoggingConfig {
    /// Creates a new LoggingConfig with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the log level filter.
    #[must_use]
    pub fn with_level(mut self, level: LogLevel) -> Self {
        self.level = level;
        self
    }

    /// Sets the output format.
    #[must_use]
    pub fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    /// Raises the level by one step per `-v` flag, never lowering it.
    #[must_use]
    pub fn with_verbosity(mut self, verbose: u8) -> Self {
        let requested = match verbose {
            0 => return self,
            1 => LogLevel::Debug,
            _ => LogLevel::Trace,
        };
        if requested.to_filter() > self.level.to_filter() {
            self.level = requested;
        }
        self
    }
}

/// Log level filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Trace level - most verbose.
    Trace,
    /// Debug level.
    Debug,
    /// Info level.
    Info,
    /// Warn level - default.
    #[default]
    Warn,
    /// Error level - least verbose.
    Error,
}

impl LogLevel {
    /// Converts to tracing_subscriber LevelFilter.
    #[must_use]
    pub fn to_filter(self) -> LevelFilter {
        match self {
            Self::Trace => LevelFilter::TRACE,
            Self::Debug => LevelFilter::DEBUG,
            Self::Info => LevelFilter::INFO,
            Self::Warn => LevelFilter::WARN,
            Self::Error => LevelFilter::ERROR,
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable lines
    #[default]
    Pretty,
    /// One JSON object per event
    Json,
}

/// Installs the global subscriber.
///
/// # Errors
///
/// Returns a logging error if a global subscriber is already installed.
pub fn init(config: &LoggingConfig) -> Result<(), LiquidBooksError> {
    let filter = EnvFilter::builder()
        .with_default_directive(config.level.to_filter().into())
        .from_env_lossy();

    let registry = tracing_subscriber::registry().with(filter);

    let result = match config.format {
        LogFormat::Pretty => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(false),
            )
            .try_init(),
        LogFormat::Json => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .try_init(),
    };

    result.map_err(|e| LiquidBooksError::logging(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = LoggingConfig::default();
        assert_eq!(config.level, LogLevel::Warn);
        assert_eq!(config.format, LogFormat::Pretty);
        assert_eq!(LoggingConfig::new(), config);
    }

    #[test]
    fn deserializes_lowercase_names() {
        let config: LoggingConfig = toml::from_str(
            r#"
            level = "debug"
            format = "json"
            "#,
        )
        .unwrap();
        assert_eq!(config.level, LogLevel::Debug);
        assert_eq!(config.format, LogFormat::Json);
    }

    #[test]
    fn missing_fields_use_defaults() {
        let config: LoggingConfig = toml::from_str(r#"level = "error""#).unwrap();
        assert_eq!(config.level, LogLevel::Error);
        assert_eq!(config.format, LogFormat::Pretty);
    }

    #[test]
    fn log_level_to_filter_mapping() {
        assert_eq!(LogLevel::Trace.to_filter(), LevelFilter::TRACE);
        assert_eq!(LogLevel::Debug.to_filter(), LevelFilter::DEBUG);
        assert_eq!(LogLevel::Info.to_filter(), LevelFilter::INFO);
        assert_eq!(LogLevel::Warn.to_filter(), LevelFilter::WARN);
        assert_eq!(LogLevel::Error.to_filter(), LevelFilter::ERROR);
    }

    #[test]
    fn verbosity_raises_but_never_lowers() {
        let config = LoggingConfig::new();
        assert_eq!(config.with_verbosity(0).level, LogLevel::Warn);
        assert_eq!(config.with_verbosity(1).level, LogLevel::Debug);
        assert_eq!(config.with_verbosity(3).level, LogLevel::Trace);

        let trace = LoggingConfig::new().with_level(LogLevel::Trace);
        assert_eq!(trace.with_verbosity(1).level, LogLevel::Trace);
    }

    #[test]
    fn second_init_fails() {
        let config = LoggingConfig::new();
        let _ = init(&config);

        let err = init(&config).unwrap_err();
        assert!(err.to_string().starts_with("failed to initialize logging"));
    }
}
