//! Logging settings consumed by the binary's tracing subscriber

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::{env_parse, ConfigError, Environment};

/// Output format of log lines
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// One JSON object per event, for log shippers
    Json,
    /// Multi-line human readable output
    Pretty,
    /// Single-line human readable output
    Compact,
}

impl FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(LogFormat::Json),
            "pretty" => Ok(LogFormat::Pretty),
            "compact" => Ok(LogFormat::Compact),
            other => Err(ConfigError::invalid("LOG_FORMAT", format!("unknown format '{}'", other))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// Filter directive, e.g. `info` or `tr_core=debug,info`
    pub level: String,

    pub format: LogFormat,

    /// ANSI colours for the human readable formats
    #[serde(default)]
    pub colored: bool,

    /// Attach file and line to each event
    #[serde(default)]
    pub source_location: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self::for_environment(Environment::default())
    }
}

impl LoggingConfig {
    /// Defaults per environment: verbose pretty output locally, JSON elsewhere
    pub fn for_environment(env: Environment) -> Self {
        let local = env.is_development();
        Self {
            level: if local { "debug" } else { "info" }.to_string(),
            format: if local { LogFormat::Pretty } else { LogFormat::Json },
            colored: local,
            source_location: local,
        }
    }

    /// Environment defaults overridden by `LOG_LEVEL`, `LOG_FORMAT`, `LOG_COLOR`
    /// and `LOG_SOURCE_LOCATION`
    pub fn from_env(env: Environment) -> Self {
        let defaults = Self::for_environment(env);
        Self {
            level: std::env::var("LOG_LEVEL").unwrap_or(defaults.level),
            format: env_parse("LOG_FORMAT", defaults.format),
            colored: env_parse("LOG_COLOR", defaults.colored),
            source_location: env_parse("LOG_SOURCE_LOCATION", defaults.source_location),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_per_environment() {
        let dev = LoggingConfig::for_environment(Environment::Development);
        assert_eq!(dev.level, "debug");
        assert_eq!(dev.format, LogFormat::Pretty);
        assert!(dev.colored && dev.source_location);

        let prod = LoggingConfig::for_environment(Environment::Production);
        assert_eq!(prod.level, "info");
        assert_eq!(prod.format, LogFormat::Json);
        assert!(!prod.colored);
    }

    #[test]
    fn test_log_format_parse() {
        assert_eq!("JSON".parse::<LogFormat>().unwrap(), LogFormat::Json);
        assert_eq!("compact".parse::<LogFormat>().unwrap(), LogFormat::Compact);
        assert!("xml".parse::<LogFormat>().is_err());
    }
}
