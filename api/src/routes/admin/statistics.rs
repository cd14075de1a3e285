use actix_web::{web, HttpResponse};

use tr_core::{RevocationSet, TokenStore};

use crate::handlers::handle_domain_error;
use crate::routes::AppState;

/// Handler for GET /api/v1/admin/statistics
pub async fn get_statistics<S, R>(state: web::Data<AppState<S, R>>) -> HttpResponse
where
    S: TokenStore + 'static,
    R: RevocationSet + 'static,
{
    match state.manager.get_statistics().await {
        Ok(stats) => HttpResponse::Ok().json(stats),
        Err(error) => handle_domain_error(error),
    }
}
