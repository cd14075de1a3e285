//! Credential signing configuration

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::{ConfigError, Environment};

/// Supported MAC algorithms
pub const SUPPORTED_ALGORITHMS: &[&str] = &["HS256", "HS384", "HS512"];

/// Signing key source and credential issuer/audience
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct SigningConfig {
    /// Literal signing secret. A `base64:` prefix marks base64-encoded key bytes.
    #[serde(default)]
    pub secret: Option<String>,

    /// File containing the signing secret (same encoding rules as `secret`)
    #[serde(default)]
    pub secret_file: Option<PathBuf>,

    /// MAC algorithm name
    #[serde(default = "default_algorithm")]
    pub algorithm: String,

    /// Issuer claim stamped into and required from every credential
    #[serde(default = "default_issuer")]
    pub issuer: String,

    /// Audience claim stamped into and required from every credential
    #[serde(default = "default_audience")]
    pub audience: String,
}

impl Default for SigningConfig {
    fn default() -> Self {
        Self {
            secret: None,
            secret_file: None,
            algorithm: default_algorithm(),
            issuer: default_issuer(),
            audience: default_audience(),
        }
    }
}

impl SigningConfig {
    /// Create a configuration with a literal secret
    pub fn with_secret(secret: impl Into<String>) -> Self {
        Self {
            secret: Some(secret.into()),
            ..Default::default()
        }
    }

    /// Create from environment variables
    pub fn from_env() -> Self {
        Self {
            secret: std::env::var("SIGNING_SECRET").ok().filter(|s| !s.is_empty()),
            secret_file: std::env::var("SIGNING_SECRET_FILE").ok().map(PathBuf::from),
            algorithm: std::env::var("SIGNING_ALGORITHM").unwrap_or_else(|_| default_algorithm()),
            issuer: std::env::var("SIGNING_ISSUER").unwrap_or_else(|_| default_issuer()),
            audience: std::env::var("SIGNING_AUDIENCE").unwrap_or_else(|_| default_audience()),
        }
    }

    /// Whether any key source is configured
    pub fn has_key_source(&self) -> bool {
        self.secret.is_some() || self.secret_file.is_some()
    }

    /// Validate algorithm and key presence for the given environment
    pub fn validate(&self, environment: Environment) -> Result<(), ConfigError> {
        if !SUPPORTED_ALGORITHMS.contains(&self.algorithm.to_uppercase().as_str()) {
            return Err(ConfigError::invalid(
                "algorithm",
                format!("unsupported algorithm {}", self.algorithm),
            ));
        }
        if self.issuer.is_empty() {
            return Err(ConfigError::invalid("issuer", "must not be empty"));
        }
        if self.audience.is_empty() {
            return Err(ConfigError::invalid("audience", "must not be empty"));
        }
        if environment.is_production() && !self.has_key_source() {
            return Err(ConfigError::Missing {
                field: "SIGNING_SECRET or SIGNING_SECRET_FILE".to_string(),
            });
        }
        Ok(())
    }
}

fn default_algorithm() -> String {
    String::from("HS256")
}

fn default_issuer() -> String {
    String::from("token-rotation")
}

fn default_audience() -> String {
    String::from("token-rotation-api")
}
