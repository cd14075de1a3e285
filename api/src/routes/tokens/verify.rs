use actix_web::{web, HttpResponse};
use validator::Validate;

use tr_core::{RevocationSet, TokenStore};

use crate::dto::VerifyTokenRequest;
use crate::handlers::{handle_domain_error, validation_error_response};
use crate::routes::AppState;

/// Handler for POST /api/v1/tokens/verify
///
/// Responds 200 with `{valid, claims, needsRotation, inGracePeriod, rotationDue}`
/// for an acceptable credential and an opaque 401 otherwise.
pub async fn verify_token<S, R>(
    state: web::Data<AppState<S, R>>,
    request: web::Json<VerifyTokenRequest>,
) -> HttpResponse
where
    S: TokenStore + 'static,
    R: RevocationSet + 'static,
{
    if let Err(errors) = request.validate() {
        return validation_error_response(errors);
    }

    match state.manager.verify_token(&request.token).await {
        Ok(outcome) => HttpResponse::Ok().json(outcome),
        Err(error) => handle_domain_error(error),
    }
}
