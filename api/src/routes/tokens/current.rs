use actix_web::HttpResponse;

use crate::dto::TokenContextResponse;
use crate::middleware::TokenContext;

/// Handler for GET /api/v1/tokens/current
///
/// Describes the bearer credential. Only reachable through the
/// rotation-aware middleware.
pub async fn current_token(context: TokenContext) -> HttpResponse {
    HttpResponse::Ok().json(TokenContextResponse {
        token_id: context.token_id,
        claims: context.claims,
        needs_rotation: context.needs_rotation,
        in_grace_period: context.in_grace_period,
        rotation_due: context.rotation_due,
    })
}
