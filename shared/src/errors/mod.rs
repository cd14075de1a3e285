//! Shared error types and response structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// JSON body of every error the HTTP API returns
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error code for client identification
    pub error: String,

    /// Human-readable error message
    pub message: String,

    /// Additional error details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<HashMap<String, serde_json::Value>>,

    /// Timestamp when the error occurred
    pub timestamp: DateTime<Utc>,
}

impl ErrorResponse {
    /// Create a new error response
    pub fn new(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
            details: None,
            timestamp: Utc::now(),
        }
    }

    /// Attach a structured detail; values that fail to serialize are dropped
    pub fn add_detail(mut self, key: impl Into<String>, value: impl Serialize) -> Self {
        let details = self.details.get_or_insert_with(HashMap::new);
        if let Ok(json_value) = serde_json::to_value(value) {
            details.insert(key.into(), json_value);
        }
        self
    }
}

/// Machine readable codes carried in `ErrorResponse::error`
pub mod error_codes {
    // Generic request failures
    pub const UNAUTHORIZED: &str = "UNAUTHORIZED";
    pub const NOT_FOUND: &str = "NOT_FOUND";
    pub const CONFLICT: &str = "CONFLICT";
    pub const BAD_REQUEST: &str = "BAD_REQUEST";
    pub const INTERNAL_ERROR: &str = "INTERNAL_ERROR";
    pub const VALIDATION_ERROR: &str = "VALIDATION_ERROR";

    // Credential lifecycle. The verification failures never reach clients;
    // they are rendered as `UNAUTHORIZED` and only appear in logs.
    pub const INVALID_SIGNATURE: &str = "INVALID_SIGNATURE";
    pub const MALFORMED_TOKEN: &str = "MALFORMED_TOKEN";
    pub const TOKEN_EXPIRED: &str = "TOKEN_EXPIRED";
    pub const TOKEN_REVOKED: &str = "TOKEN_REVOKED";
    pub const TOKEN_NOT_FOUND: &str = "TOKEN_NOT_FOUND";
    pub const TOKEN_ALREADY_REVOKED: &str = "TOKEN_ALREADY_REVOKED";
    pub const SIGNING_FAILED: &str = "SIGNING_FAILED";
    pub const ROTATION_CONFLICT: &str = "ROTATION_CONFLICT";
}

/// Implemented by error types that know their client-facing rendering
pub trait IntoErrorResponse {
    fn to_error_response(&self) -> ErrorResponse;
}
