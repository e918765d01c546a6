//! Structured logging configuration.

use crate::config::LoggingSettings;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Default filter when nothing else is configured.
const DEFAULT_FILTER: &str = "warn";

/// Filter used for `--verbose`.
const VERBOSE_FILTER: &str = "skillswap=debug,info";

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable multi-line output.
    #[default]
    Pretty,
    /// One JSON object per event.
    Json,
}

impl LogFormat {
    /// Parses a format name, case-insensitively.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "pretty" | "text" => Some(Self::Pretty),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Output format.
    pub format: LogFormat,
    /// `EnvFilter` directive.
    pub directive: String,
    /// Append to this file instead of stderr.
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            format: LogFormat::Pretty,
            directive: DEFAULT_FILTER.to_string(),
            file: None,
        }
    }
}

impl LoggingConfig {
    /// Builds logging configuration from config settings with env overrides.
    ///
    /// Filter precedence: `--verbose`, `SKILLSWAP_LOG`, `RUST_LOG`, the config
    /// file, then `warn`.
    #[must_use]
    pub fn from_settings(settings: Option<&LoggingSettings>, verbose: bool) -> Self {
        let mut config = Self::default();

        if let Some(settings) = settings {
            if let Some(format) = settings.format.as_deref().and_then(LogFormat::parse) {
                config.format = format;
            }
            if let Some(level) = non_empty(settings.level.as_deref()) {
                config.directive = level.to_string();
            }
            if let Some(file) = non_empty(settings.file.as_deref()) {
                config.file = Some(PathBuf::from(file));
            }
        }

        if let Ok(directive) = std::env::var("RUST_LOG") {
            if !directive.trim().is_empty() {
                config.directive = directive;
            }
        }
        if let Ok(directive) = std::env::var("SKILLSWAP_LOG") {
            if !directive.trim().is_empty() {
                config.directive = directive;
            }
        }
        if let Some(format) = std::env::var("SKILLSWAP_LOG_FORMAT")
            .ok()
            .as_deref()
            .and_then(LogFormat::parse)
        {
            config.format = format;
        }
        if let Ok(file) = std::env::var("SKILLSWAP_LOG_FILE") {
            if !file.trim().is_empty() {
                config.file = Some(PathBuf::from(file));
            }
        }

        if verbose {
            config.directive = VERBOSE_FILTER.to_string();
        }

        config
    }

    /// Builds the filter, falling back to `warn` on a bad directive.
    #[must_use]
    #[allow(clippy::print_stderr)]
    pub fn filter(&self) -> EnvFilter {
        EnvFilter::try_new(&self.directive).unwrap_or_else(|e| {
            // No subscriber exists yet, so this can't be a tracing event
            eprintln!("invalid log filter {:?}: {e}", self.directive);
            EnvFilter::new(DEFAULT_FILTER)
        })
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
