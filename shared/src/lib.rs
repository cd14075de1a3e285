//! Shared configuration and common types for the token rotation service
//!
//! This crate provides functionality used across all server modules:
//! - Configuration types (rotation policy, signing keys, persistence, server, logging)
//! - The API error envelope and error codes

pub mod config;
pub mod errors;

// Re-export commonly used items at crate root
pub use config::{
    AppConfig, ConfigError, Environment, LogFormat, LoggingConfig, PersistenceConfig,
    RotationConfig, ServerConfig, SigningConfig, MAX_POLICY_SECS,
};
pub use errors::{error_codes, ErrorResponse, IntoErrorResponse};
