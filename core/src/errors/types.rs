//! Token lifecycle error kinds

use thiserror::Error;
use tr_shared::errors::error_codes;

/// Token-related errors
///
/// The first four variants are authentication failures; callers outside the
/// manager only ever see them collapsed into a single opaque message.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("Token signature verification failed")]
    InvalidSignature,

    #[error("Malformed token")]
    MalformedToken,

    #[error("Token expired")]
    Expired,

    #[error("Token revoked")]
    Revoked,

    #[error("Token not found: {token_id}")]
    TokenNotFound { token_id: String },

    #[error("Token already revoked: {token_id}")]
    AlreadyRevoked { token_id: String },

    #[error("Token signing failed: {reason}")]
    SigningFailed { reason: String },

    #[error("Token {token_id} changed state concurrently")]
    RotationConflict { token_id: String },
}

impl TokenError {
    /// Stable machine-readable code
    pub fn code(&self) -> &'static str {
        match self {
            TokenError::InvalidSignature => error_codes::INVALID_SIGNATURE,
            TokenError::MalformedToken => error_codes::MALFORMED_TOKEN,
            TokenError::Expired => error_codes::TOKEN_EXPIRED,
            TokenError::Revoked => error_codes::TOKEN_REVOKED,
            TokenError::TokenNotFound { .. } => error_codes::TOKEN_NOT_FOUND,
            TokenError::AlreadyRevoked { .. } => error_codes::TOKEN_ALREADY_REVOKED,
            TokenError::SigningFailed { .. } => error_codes::SIGNING_FAILED,
            TokenError::RotationConflict { .. } => error_codes::ROTATION_CONFLICT,
        }
    }

    /// Whether this error is a credential verification failure
    pub fn is_authentication_failure(&self) -> bool {
        matches!(
            self,
            TokenError::InvalidSignature
                | TokenError::MalformedToken
                | TokenError::Expired
                | TokenError::Revoked
        )
    }
}
