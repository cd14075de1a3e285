use actix_web::{web, HttpResponse};
use validator::Validate;

use tr_core::{RevocationSet, TokenStore};

use crate::dto::{IssueTokenRequest, TokenResponse};
use crate::handlers::{handle_domain_error, validation_error_response};
use crate::routes::AppState;

/// Handler for POST /api/v1/tokens/issue
///
/// # Request Body
///
/// ```json
/// {
///     "claims": { "sub": "user-42", "role": "admin", "tenant": "acme" },
///     "ttlSecs": 3600,
///     "rotationIntervalSecs": 1800
/// }
/// ```
///
/// # Response
///
/// ## Success (201 Created)
/// ```json
/// {
///     "token": "eyJ...",
///     "tokenId": "1f0c...",
///     "rotationDue": "2024-03-31T12:00:00Z",
///     "rotationCount": 0
/// }
/// ```
///
/// ## Errors
/// - 400 Bad Request: Reserved claim names or out-of-range durations
/// - 500 Internal Server Error: Signing or storage failure
pub async fn issue_token<S, R>(
    state: web::Data<AppState<S, R>>,
    request: web::Json<IssueTokenRequest>,
) -> HttpResponse
where
    S: TokenStore + 'static,
    R: RevocationSet + 'static,
{
    if let Err(errors) = request.validate() {
        return validation_error_response(errors);
    }

    let request = request.into_inner();
    let options = request.options();
    match state.manager.issue_token(request.claims, options).await {
        Ok(issued) => HttpResponse::Created().json(TokenResponse::from(issued)),
        Err(error) => handle_domain_error(error),
    }
}
