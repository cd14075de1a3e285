use actix_web::{web, HttpResponse};
use tracing::warn;

use tr_core::{RevocationSet, TokenStore};

use crate::handlers::handle_domain_error;
use crate::routes::AppState;

/// Handler for POST /api/v1/admin/force-rotate
///
/// Rotates every active token and returns one result per token. Individual
/// failures are reported in the body; the request itself still succeeds.
pub async fn force_rotate_all<S, R>(state: web::Data<AppState<S, R>>) -> HttpResponse
where
    S: TokenStore + 'static,
    R: RevocationSet + 'static,
{
    warn!("Emergency rotation requested");
    match state.manager.force_rotate_all().await {
        Ok(report) => HttpResponse::Ok().json(report),
        Err(error) => handle_domain_error(error),
    }
}
