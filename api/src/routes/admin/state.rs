use actix_web::{web, HttpResponse};

use tr_core::{RevocationSet, StateSnapshot, TokenStore};

use crate::handlers::handle_domain_error;
use crate::routes::AppState;

/// Handler for GET /api/v1/admin/export
pub async fn export_state<S, R>(state: web::Data<AppState<S, R>>) -> HttpResponse
where
    S: TokenStore + 'static,
    R: RevocationSet + 'static,
{
    match state.manager.export_state().await {
        Ok(snapshot) => HttpResponse::Ok().json(snapshot),
        Err(error) => handle_domain_error(error),
    }
}

/// Handler for POST /api/v1/admin/import
///
/// Replaces all token state with the posted snapshot.
pub async fn import_state<S, R>(
    state: web::Data<AppState<S, R>>,
    snapshot: web::Json<StateSnapshot>,
) -> HttpResponse
where
    S: TokenStore + 'static,
    R: RevocationSet + 'static,
{
    match state.manager.import_state(snapshot.into_inner()).await {
        Ok(summary) => HttpResponse::Ok().json(summary),
        Err(error) => handle_domain_error(error),
    }
}
