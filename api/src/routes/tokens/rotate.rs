use actix_web::{web, HttpResponse};

use tr_core::{RevocationSet, TokenStore};

use crate::dto::{RotateTokenRequest, TokenResponse};
use crate::handlers::handle_domain_error;
use crate::routes::AppState;

/// Handler for POST /api/v1/tokens/rotate
///
/// # Request Body
///
/// ```json
/// {
///     "tokenId": "1f0c...",
///     "claims": { "role": "admin", "beta": null }
/// }
/// ```
///
/// A `null` extension claim removes it from the successor.
///
/// ## Errors
/// - 404 Not Found: Unknown token id
/// - 409 Conflict: Token already revoked, or changed state concurrently
pub async fn rotate_token<S, R>(
    state: web::Data<AppState<S, R>>,
    request: web::Json<RotateTokenRequest>,
) -> HttpResponse
where
    S: TokenStore + 'static,
    R: RevocationSet + 'static,
{
    let request = request.into_inner();
    match state.manager.rotate_token(request.token_id, request.claims).await {
        Ok(successor) => HttpResponse::Ok().json(TokenResponse::from(successor)),
        Err(error) => handle_domain_error(error),
    }
}
