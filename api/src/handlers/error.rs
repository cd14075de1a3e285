//! Mapping of domain errors onto HTTP responses

use actix_web::{error::JsonPayloadError, http::StatusCode, HttpRequest, HttpResponse};
use tracing::{error, warn};
use validator::ValidationErrors;

use tr_core::errors::{DomainError, TokenError};
use tr_shared::errors::{error_codes, ErrorResponse, IntoErrorResponse};

/// HTTP status for a domain error
pub fn status_for(error: &DomainError) -> StatusCode {
    match error {
        e if e.is_authentication_failure() => StatusCode::UNAUTHORIZED,
        DomainError::Token(TokenError::TokenNotFound { .. }) | DomainError::NotFound { .. } => {
            StatusCode::NOT_FOUND
        }
        DomainError::Token(TokenError::AlreadyRevoked { .. })
        | DomainError::Token(TokenError::RotationConflict { .. }) => StatusCode::CONFLICT,
        DomainError::Validation { .. } => StatusCode::BAD_REQUEST,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Converts a domain error into a JSON error response
///
/// Authentication failures all carry the same body. Server-side failures
/// are logged here with their detail and reported generically.
pub fn handle_domain_error(error: DomainError) -> HttpResponse {
    let status = status_for(&error);
    if status.is_server_error() {
        error!("Request failed: {}", error);
    } else if status == StatusCode::UNAUTHORIZED {
        warn!(reason = %error, "Credential rejected");
    }
    HttpResponse::build(status).json(error.to_error_response())
}

/// 400 response listing the fields that failed validation
pub fn validation_error_response(errors: ValidationErrors) -> HttpResponse {
    let mut response = ErrorResponse::new(error_codes::VALIDATION_ERROR, "Request validation failed");
    for (field, field_errors) in errors.field_errors() {
        let messages: Vec<String> = field_errors
            .iter()
            .map(|e| {
                e.message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| e.code.to_string())
            })
            .collect();
        response = response.add_detail(field.to_string(), messages);
    }
    HttpResponse::BadRequest().json(response)
}

/// Turns unreadable JSON bodies into the standard 400 error shape
pub fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    let response = HttpResponse::BadRequest().json(ErrorResponse::new(
        error_codes::BAD_REQUEST,
        format!("Invalid request body: {}", err),
    ));
    actix_web::error::InternalError::from_response(err, response).into()
}
