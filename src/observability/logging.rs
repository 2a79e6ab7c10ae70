//! Structured logging.
//!
//! # Responsibilities
//! - Resolve log level, output format and source annotation from the environment
//! - Initialize the process-wide `tracing` subscriber exactly once
//!
//! # Design Decisions
//! - Uses tracing crate for structured logging
//! - JSON format for production, pretty format for development
//! - Resolution never fails: unknown inputs degrade to safe defaults
//! - `RUST_LOG` directives refine the resolved level per target

use std::fmt;

use tracing_subscriber::filter::{EnvFilter, LevelFilter};
use tracing_subscriber::fmt::time::ChronoLocal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::environment::{EnvSource, EnvironmentProfile};

/// Time-of-day stamp used by the pretty format.
const PRETTY_TIME_FORMAT: &str = "%H:%M:%S%.3f";

/// Minimum severity emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    /// Case-insensitive parse; `WARNING` is accepted as an alias.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_uppercase().as_str() {
            "DEBUG" => Some(LogLevel::Debug),
            "INFO" => Some(LogLevel::Info),
            "WARN" | "WARNING" => Some(LogLevel::Warn),
            "ERROR" => Some(LogLevel::Error),
            _ => None,
        }
    }

    pub fn as_filter(self) -> LevelFilter {
        match self {
            LogLevel::Debug => LevelFilter::DEBUG,
            LogLevel::Info => LevelFilter::INFO,
            LogLevel::Warn => LevelFilter::WARN,
            LogLevel::Error => LevelFilter::ERROR,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warn => "WARN",
            LogLevel::Error => "ERROR",
        };
        f.write_str(s)
    }
}

/// Output encoding of log lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// One JSON object per line.
    Json,
    /// Plain single-line text, no colour.
    Text,
    /// Human-oriented text with a short time-of-day stamp.
    Pretty,
}

impl LogFormat {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "json" => Some(LogFormat::Json),
            "text" => Some(LogFormat::Text),
            "pretty" => Some(LogFormat::Pretty),
            _ => None,
        }
    }
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            LogFormat::Json => "json",
            LogFormat::Text => "text",
            LogFormat::Pretty => "pretty",
        };
        f.write_str(s)
    }
}

/// Process-wide logging configuration. Fixed before the first request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogConfig {
    pub level: LogLevel,
    pub format: LogFormat,
    pub include_source: bool,
}

/// Resolve the logging configuration from `env`.
///
/// `LOG_LEVEL` and `LOG_FORMAT` override the profile defaults (`INFO`/`json`
/// when production-like, `DEBUG`/`pretty` otherwise). An unrecognized
/// `LOG_LEVEL` resolves to `INFO`; an unrecognized `LOG_FORMAT` falls back to
/// the profile default. `LOG_SOURCE=true` adds file and line to each event.
pub fn resolve_log_config(env: &impl EnvSource) -> LogConfig {
    let profile = EnvironmentProfile::resolve(env);

    let level = match env.non_empty("LOG_LEVEL") {
        Some(raw) => LogLevel::parse(&raw).unwrap_or(LogLevel::Info),
        None if profile.is_production => LogLevel::Info,
        None => LogLevel::Debug,
    };

    let format = env
        .non_empty("LOG_FORMAT")
        .and_then(|raw| LogFormat::parse(&raw))
        .unwrap_or(if profile.is_production {
            LogFormat::Json
        } else {
            LogFormat::Pretty
        });

    let include_source = env
        .var("LOG_SOURCE")
        .is_some_and(|v| v.trim().eq_ignore_ascii_case("true"));

    LogConfig {
        level,
        format,
        include_source,
    }
}

/// Install the global subscriber for `config`.
///
/// Returns `false` when a global subscriber was already installed; the
/// existing one stays in place and startup continues.
pub fn init_logging(config: &LogConfig) -> bool {
    let filter = EnvFilter::builder()
        .with_default_directive(config.level.as_filter().into())
        .from_env_lossy();

    let registry = tracing_subscriber::registry().with(filter);
    let source = config.include_source;

    let result = match config.format {
        LogFormat::Json => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .flatten_event(true)
                    .with_file(source)
                    .with_line_number(source),
            )
            .try_init(),
        LogFormat::Text => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_ansi(false)
                    .with_file(source)
                    .with_line_number(source),
            )
            .try_init(),
        LogFormat::Pretty => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_timer(ChronoLocal::new(PRETTY_TIME_FORMAT.to_string()))
                    .with_file(source)
                    .with_line_number(source),
            )
            .try_init(),
    };

    result.is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn resolve(pairs: &[(&'static str, &'static str)]) -> LogConfig {
        let env: HashMap<&str, &str> = pairs.iter().copied().collect();
        resolve_log_config(&env)
    }

    #[test]
    fn development_defaults() {
        let config = resolve(&[]);
        assert_eq!(config.level, LogLevel::Debug);
        assert_eq!(config.format, LogFormat::Pretty);
        assert!(!config.include_source);
    }

    #[test]
    fn production_defaults() {
        let config = resolve(&[("ENV", "production")]);
        assert_eq!(config.level, LogLevel::Info);
        assert_eq!(config.format, LogFormat::Json);
    }

    #[test]
    fn kubernetes_counts_as_production() {
        let config = resolve(&[("KUBERNETES_SERVICE_HOST", "10.96.0.1")]);
        assert_eq!(config.level, LogLevel::Info);
        assert_eq!(config.format, LogFormat::Json);
    }

    #[test]
    fn explicit_level_is_case_insensitive() {
        assert_eq!(resolve(&[("LOG_LEVEL", "warn")]).level, LogLevel::Warn);
        assert_eq!(resolve(&[("LOG_LEVEL", "Warning")]).level, LogLevel::Warn);
        assert_eq!(resolve(&[("LOG_LEVEL", "eRrOr")]).level, LogLevel::Error);
        assert_eq!(
            resolve(&[("ENV", "prod"), ("LOG_LEVEL", "debug")]).level,
            LogLevel::Debug
        );
    }

    #[test]
    fn unknown_level_resolves_to_info() {
        assert_eq!(resolve(&[("LOG_LEVEL", "verbose")]).level, LogLevel::Info);
        assert_eq!(resolve(&[("LOG_LEVEL", "\u{1F600}")]).level, LogLevel::Info);
    }

    #[test]
    fn explicit_format_overrides_profile() {
        assert_eq!(resolve(&[("LOG_FORMAT", "TEXT")]).format, LogFormat::Text);
        assert_eq!(
            resolve(&[("ENV", "production"), ("LOG_FORMAT", "pretty")]).format,
            LogFormat::Pretty
        );
    }

    #[test]
    fn unknown_format_falls_back_to_profile_default() {
        assert_eq!(resolve(&[("LOG_FORMAT", "xml")]).format, LogFormat::Pretty);
        assert_eq!(
            resolve(&[("ENV", "production"), ("LOG_FORMAT", "xml")]).format,
            LogFormat::Json
        );
    }

    #[test]
    fn source_annotation_requires_true() {
        assert!(resolve(&[("LOG_SOURCE", "true")]).include_source);
        assert!(resolve(&[("LOG_SOURCE", "TRUE")]).include_source);
        assert!(!resolve(&[("LOG_SOURCE", "1")]).include_source);
        assert!(!resolve(&[("LOG_SOURCE", "")]).include_source);
    }

    #[test]
    fn second_init_is_reported_not_fatal() {
        let config = resolve(&[]);
        let _ = init_logging(&config);
        assert!(!init_logging(&config));
    }
}
