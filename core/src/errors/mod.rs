//! Domain-specific error types and error handling.

mod types;

pub use types::TokenError;

use thiserror::Error;
use tr_shared::errors::{error_codes, ErrorResponse, IntoErrorResponse};

/// Message returned for every authentication failure, whatever its internal kind
pub const OPAQUE_AUTH_FAILURE_MESSAGE: &str = "Invalid or expired credential";

/// Core domain errors (general purpose)
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Resource not found: {resource}")]
    NotFound { resource: String },

    #[error("Storage error: {message}")]
    Storage { message: String },

    #[error("Persistence error: {message}")]
    Persistence { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },

    // Bridge to specific error types
    #[error(transparent)]
    Token(#[from] TokenError),
}

impl DomainError {
    /// Returns the token error kind, if this is one
    pub fn token_error(&self) -> Option<&TokenError> {
        match self {
            DomainError::Token(e) => Some(e),
            _ => None,
        }
    }

    /// Whether the error must be reported to callers as a generic authentication failure
    pub fn is_authentication_failure(&self) -> bool {
        self.token_error()
            .map(TokenError::is_authentication_failure)
            .unwrap_or(false)
    }
}

impl IntoErrorResponse for DomainError {
    fn to_error_response(&self) -> ErrorResponse {
        match self {
            // Signature failures and revocations share one response so callers
            // cannot tell which check rejected the credential.
            e if e.is_authentication_failure() => {
                ErrorResponse::new(error_codes::UNAUTHORIZED, OPAQUE_AUTH_FAILURE_MESSAGE)
            }
            DomainError::Token(e) => ErrorResponse::new(e.code(), e.to_string()),
            DomainError::Validation { message } => {
                ErrorResponse::new(error_codes::VALIDATION_ERROR, message.clone())
            }
            DomainError::NotFound { resource } => {
                ErrorResponse::new(error_codes::NOT_FOUND, format!("{} not found", resource))
            }
            DomainError::Storage { .. }
            | DomainError::Persistence { .. }
            | DomainError::Internal { .. } => {
                ErrorResponse::new(error_codes::INTERNAL_ERROR, "An internal error occurred")
            }
        }
    }
}

pub type DomainResult<T> = Result<T, DomainError>;

#[cfg(test)]
mod tests;
