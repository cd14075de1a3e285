//! Bearer credential middleware aware of rotation state.
//!
//! Every request through the middleware has its `Authorization: Bearer`
//! credential verified by the rotation manager. Rejected credentials get the
//! same opaque 401 whatever the reason. Accepted credentials that are overdue
//! for rotation but still inside the grace window pass through, and the
//! response tells the client to refresh via `X-Token-Rotation-Required` and
//! `X-Token-Rotation-Due`.

use actix_web::{
    body::EitherBody,
    dev::{Service, ServiceRequest, ServiceResponse, Transform},
    error::ErrorUnauthorized,
    http::header::{HeaderName, HeaderValue, AUTHORIZATION},
    Error, FromRequest, HttpMessage, HttpRequest, HttpResponse,
};
use chrono::{DateTime, Utc};
use futures_util::future::LocalBoxFuture;
use std::{
    future::{ready, Ready},
    rc::Rc,
    sync::Arc,
    task::{Context, Poll},
};
use uuid::Uuid;

use tr_core::{
    errors::{DomainError, OPAQUE_AUTH_FAILURE_MESSAGE},
    RevocationSet, RotationManager, TokenClaims, TokenStore, VerificationOutcome,
};
use tr_shared::errors::{error_codes, ErrorResponse};

use crate::handlers::handle_domain_error;

/// Response header set when the client should refresh its credential
pub const ROTATION_REQUIRED_HEADER: &str = "x-token-rotation-required";

/// Response header carrying the credential's rotation time
pub const ROTATION_DUE_HEADER: &str = "x-token-rotation-due";

/// Verified credential injected into request extensions
#[derive(Debug, Clone)]
pub struct TokenContext {
    pub token_id: Uuid,
    pub claims: TokenClaims,
    pub needs_rotation: bool,
    pub in_grace_period: bool,
    pub rotation_due: Option<DateTime<Utc>>,
}

impl TokenContext {
    fn from_outcome(outcome: VerificationOutcome) -> Option<Self> {
        let claims = outcome.claims?;
        Some(Self {
            token_id: claims.token_id,
            claims,
            needs_rotation: outcome.needs_rotation,
            in_grace_period: outcome.in_grace_period,
            rotation_due: outcome.rotation_due,
        })
    }

    /// Whether the response should advise the client to refresh
    pub fn should_advise_refresh(&self) -> bool {
        self.needs_rotation && self.in_grace_period
    }
}

/// Verification seam used by the middleware
pub trait CredentialVerifier: Send + Sync {
    fn verify<'a>(
        &'a self,
        signed: &'a str,
    ) -> LocalBoxFuture<'a, Result<VerificationOutcome, DomainError>>;
}

impl<S: TokenStore, R: RevocationSet> CredentialVerifier for RotationManager<S, R> {
    fn verify<'a>(
        &'a self,
        signed: &'a str,
    ) -> LocalBoxFuture<'a, Result<VerificationOutcome, DomainError>> {
        Box::pin(self.verify_token(signed))
    }
}

/// Rotation-aware authentication middleware factory
#[derive(Clone)]
pub struct RotationAwareAuth {
    verifier: Arc<dyn CredentialVerifier>,
}

impl RotationAwareAuth {
    pub fn new(verifier: Arc<dyn CredentialVerifier>) -> Self {
        Self { verifier }
    }
}

impl<S, B> Transform<S, ServiceRequest> for RotationAwareAuth
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RotationAwareAuthMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RotationAwareAuthMiddleware {
            service: Rc::new(service),
            verifier: self.verifier.clone(),
        }))
    }
}

/// Rotation-aware authentication middleware service
pub struct RotationAwareAuthMiddleware<S> {
    service: Rc<S>,
    verifier: Arc<dyn CredentialVerifier>,
}

impl<S, B> Service<ServiceRequest> for RotationAwareAuthMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, ctx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);
        let verifier = self.verifier.clone();

        Box::pin(async move {
            let token = match extract_bearer_token(&req) {
                Some(token) => token,
                None => return Ok(req.into_response(unauthorized()).map_into_right_body()),
            };

            let outcome = match verifier.verify(&token).await {
                Ok(outcome) => outcome,
                Err(e) => {
                    return Ok(req.into_response(handle_domain_error(e)).map_into_right_body());
                }
            };

            let context = match TokenContext::from_outcome(outcome) {
                Some(context) => context,
                None => return Ok(req.into_response(unauthorized()).map_into_right_body()),
            };
            let advise = context.should_advise_refresh();
            let rotation_due = context.rotation_due;
            req.extensions_mut().insert(context);

            let mut res = service.call(req).await?.map_into_left_body();

            if advise {
                let headers = res.headers_mut();
                headers.insert(
                    HeaderName::from_static(ROTATION_REQUIRED_HEADER),
                    HeaderValue::from_static("true"),
                );
                if let Some(value) = rotation_due.and_then(|due| HeaderValue::from_str(&due.to_rfc3339()).ok()) {
                    headers.insert(HeaderName::from_static(ROTATION_DUE_HEADER), value);
                }
            }

            Ok(res)
        })
    }
}

fn unauthorized() -> HttpResponse {
    HttpResponse::Unauthorized().json(ErrorResponse::new(
        error_codes::UNAUTHORIZED,
        OPAQUE_AUTH_FAILURE_MESSAGE,
    ))
}

/// Extracts Bearer token from Authorization header
fn extract_bearer_token(req: &ServiceRequest) -> Option<String> {
    req.headers()
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Extractor for the verified credential
impl FromRequest for TokenContext {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut actix_web::dev::Payload) -> Self::Future {
        let result = req
            .extensions()
            .get::<TokenContext>()
            .cloned()
            .ok_or_else(|| ErrorUnauthorized(OPAQUE_AUTH_FAILURE_MESSAGE));

        ready(result)
    }
}
