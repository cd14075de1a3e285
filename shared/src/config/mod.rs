//! Configuration module with business-specific sub-modules
//!
//! This module organizes configuration into logical areas:
//! - `environment` - Deployment environment detection
//! - `logging` - Log level and output format
//! - `persistence` - Snapshot persistence of manager state
//! - `rotation` - Rotation schedule, grace period and retention policy
//! - `server` - HTTP server configuration
//! - `signing` - Credential signing key and issuer/audience

pub mod environment;
pub mod logging;
pub mod persistence;
pub mod rotation;
pub mod server;
pub mod signing;

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

// Re-export commonly used types
pub use environment::Environment;
pub use logging::{LogFormat, LoggingConfig};
pub use persistence::PersistenceConfig;
pub use rotation::{RotationConfig, MAX_POLICY_SECS};
pub use server::ServerConfig;
pub use signing::SigningConfig;

/// Errors raised while validating configuration
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },

    #[error("Missing required setting: {field}")]
    Missing { field: String },
}

impl ConfigError {
    pub(crate) fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// Complete application configuration combining all sub-configurations
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AppConfig {
    /// Environment configuration
    pub environment: Environment,

    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Rotation policy
    #[serde(default)]
    pub rotation: RotationConfig,

    /// Signing key configuration
    #[serde(default)]
    pub signing: SigningConfig,

    /// Snapshot persistence configuration
    #[serde(default)]
    pub persistence: PersistenceConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Build the configuration from environment variables
    pub fn from_env() -> Self {
        let environment = Environment::from_env();
        Self {
            environment,
            server: ServerConfig::from_env(),
            rotation: RotationConfig::from_env(),
            signing: SigningConfig::from_env(),
            persistence: PersistenceConfig::from_env(),
            logging: LoggingConfig::from_env(environment),
        }
    }

    /// Validate every sub-configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.rotation.validate()?;
        self.signing.validate(self.environment)?;
        Ok(())
    }
}

/// Read an environment variable and parse it, falling back to `default` when the
/// variable is unset or unparsable.
pub(crate) fn env_parse<T: FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|value| value.trim().parse().ok())
        .unwrap_or(default)
}

/// Read an optional environment variable and parse it.
pub(crate) fn env_parse_opt<T: FromStr>(key: &str) -> Option<T> {
    std::env::var(key)
        .ok()
        .and_then(|value| value.trim().parse().ok())
}
