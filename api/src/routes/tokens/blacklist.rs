use actix_web::{web, HttpResponse};

use tr_core::{RevocationSet, TokenStore};

use crate::dto::BlacklistTokenRequest;
use crate::handlers::handle_domain_error;
use crate::routes::AppState;

/// Handler for POST /api/v1/tokens/blacklist
///
/// Idempotent; unknown token ids are accepted and revoked as well.
pub async fn blacklist_token<S, R>(
    state: web::Data<AppState<S, R>>,
    request: web::Json<BlacklistTokenRequest>,
) -> HttpResponse
where
    S: TokenStore + 'static,
    R: RevocationSet + 'static,
{
    match state.manager.blacklist_token(request.token_id).await {
        Ok(_) => HttpResponse::NoContent().finish(),
        Err(error) => handle_domain_error(error),
    }
}
