//! Application factory
//!
//! Builds the Actix-web application around a shared rotation manager.

use actix_web::{web, App, HttpResponse};
use std::sync::Arc;
use tracing_actix_web::TracingLogger;

use tr_core::{RevocationSet, TokenStore};
use tr_shared::errors::{error_codes, ErrorResponse};

use crate::handlers::json_error_handler;
use crate::middleware::{CredentialVerifier, RotationAwareAuth};
use crate::routes::{admin, health::health_check, tokens, AppState};

/// Largest accepted JSON body; snapshots posted to the import endpoint can be large
const JSON_BODY_LIMIT: usize = 16 * 1024 * 1024;

/// Create and configure the application with all dependencies
pub fn create_app<S, R>(
    app_state: web::Data<AppState<S, R>>,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse<impl actix_web::body::MessageBody>,
        Error = actix_web::Error,
        InitError = (),
    >,
>
where
    S: TokenStore + 'static,
    R: RevocationSet + 'static,
{
    let verifier: Arc<dyn CredentialVerifier> = app_state.manager.clone();

    App::new()
        // Add application state
        .app_data(app_state)
        .app_data(
            web::JsonConfig::default()
                .limit(JSON_BODY_LIMIT)
                .error_handler(json_error_handler),
        )
        .wrap(TracingLogger::default())
        // Health check endpoint
        .route("/health", web::get().to(health_check))
        // API v1 routes
        .service(
            web::scope("/api/v1")
                .service(
                    web::scope("/tokens")
                        .route("/issue", web::post().to(tokens::issue_token::<S, R>))
                        .route("/verify", web::post().to(tokens::verify_token::<S, R>))
                        .route("/rotate", web::post().to(tokens::rotate_token::<S, R>))
                        .route("/blacklist", web::post().to(tokens::blacklist_token::<S, R>))
                        .route(
                            "/current",
                            web::get()
                                .to(tokens::current_token)
                                .wrap(RotationAwareAuth::new(verifier)),
                        ),
                )
                .service(
                    web::scope("/admin")
                        .route("/force-rotate", web::post().to(admin::force_rotate_all::<S, R>))
                        .route("/statistics", web::get().to(admin::get_statistics::<S, R>))
                        .route("/export", web::get().to(admin::export_state::<S, R>))
                        .route("/import", web::post().to(admin::import_state::<S, R>)),
                ),
        )
        // Default 404 handler
        .default_service(web::route().to(not_found))
}

async fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(ErrorResponse::new(
        error_codes::NOT_FOUND,
        "The requested resource was not found",
    ))
}
