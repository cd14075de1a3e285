use tr_shared::errors::{error_codes, IntoErrorResponse};

use super::{DomainError, TokenError, OPAQUE_AUTH_FAILURE_MESSAGE};

#[test]
fn test_authentication_failures_are_opaque() {
    let kinds = [
        TokenError::InvalidSignature,
        TokenError::MalformedToken,
        TokenError::Expired,
        TokenError::Revoked,
    ];

    for kind in kinds {
        let response = DomainError::from(kind).to_error_response();
        assert_eq!(response.error, error_codes::UNAUTHORIZED);
        assert_eq!(response.message, OPAQUE_AUTH_FAILURE_MESSAGE);
    }
}

#[test]
fn test_client_errors_keep_their_code() {
    let error = DomainError::from(TokenError::TokenNotFound {
        token_id: "abc".to_string(),
    });
    assert!(!error.is_authentication_failure());

    let response = error.to_error_response();
    assert_eq!(response.error, "TOKEN_NOT_FOUND");
    assert!(response.message.contains("abc"));
}

#[test]
fn test_internal_errors_hide_details() {
    let error = DomainError::Storage {
        message: "lock poisoned at shard 3".to_string(),
    };
    let response = error.to_error_response();
    assert_eq!(response.error, error_codes::INTERNAL_ERROR);
    assert!(!response.message.contains("shard"));
}

#[test]
fn test_token_error_codes() {
    assert_eq!(TokenError::Revoked.code(), "TOKEN_REVOKED");
    assert_eq!(
        TokenError::AlreadyRevoked { token_id: "x".into() }.code(),
        error_codes::TOKEN_ALREADY_REVOKED
    );
    assert_eq!(
        TokenError::RotationConflict { token_id: "x".into() }.code(),
        error_codes::ROTATION_CONFLICT
    );
}
