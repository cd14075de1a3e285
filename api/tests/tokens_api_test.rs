//! HTTP tests for the token lifecycle endpoints

mod common;

use actix_web::{http::StatusCode, test};
use serde_json::{json, Value};

use common::test_context;
use tr_api::create_app;
use tr_core::errors::OPAQUE_AUTH_FAILURE_MESSAGE;
use tr_core::{ClaimSet, IssueOptions};

#[actix_web::test]
async fn test_issue_token_returns_created() {
    let ctx = test_context();
    let app = test::init_service(create_app(ctx.state.clone())).await;

    let req = test::TestRequest::post()
        .uri("/api/v1/tokens/issue")
        .set_json(json!({ "claims": { "sub": "alice", "role": "admin", "tenant": "acme" } }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["token"].as_str().unwrap().split('.').count(), 3);
    assert_eq!(body["rotationCount"], 0);
    assert!(body.get("previousTokenId").is_none());
    assert_eq!(ctx.manager.get_statistics().await.unwrap().active_count, 1);
}

#[actix_web::test]
async fn test_issue_rejects_reserved_claim() {
    let ctx = test_context();
    let app = test::init_service(create_app(ctx.state.clone())).await;

    let req = test::TestRequest::post()
        .uri("/api/v1/tokens/issue")
        .set_json(json!({ "claims": { "rotationCount": 9 } }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(ctx.manager.get_statistics().await.unwrap().total_count, 0);
}

#[actix_web::test]
async fn test_issue_rejects_out_of_range_ttl() {
    let ctx = test_context();
    let app = test::init_service(create_app(ctx.state.clone())).await;

    let req = test::TestRequest::post()
        .uri("/api/v1/tokens/issue")
        .set_json(json!({ "ttlSecs": 0 }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "VALIDATION_ERROR");
    assert!(body["details"].get("ttl_secs").is_some());
}

#[actix_web::test]
async fn test_issue_rejects_ttl_beyond_retention() {
    let ctx = test_context();
    let app = test::init_service(create_app(ctx.state.clone())).await;

    let req = test::TestRequest::post()
        .uri("/api/v1/tokens/issue")
        .set_json(json!({ "ttlSecs": 365 * 24 * 3600 }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "VALIDATION_ERROR");
    assert_eq!(ctx.manager.get_statistics().await.unwrap().total_count, 0);
}

#[actix_web::test]
async fn test_malformed_body_is_bad_request() {
    let ctx = test_context();
    let app = test::init_service(create_app(ctx.state.clone())).await;

    let req = test::TestRequest::post()
        .uri("/api/v1/tokens/verify")
        .insert_header(("content-type", "application/json"))
        .set_payload("{not json")
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "BAD_REQUEST");
}

#[actix_web::test]
async fn test_verify_issued_token() {
    let ctx = test_context();
    let app = test::init_service(create_app(ctx.state.clone())).await;

    let issued: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/tokens/issue")
            .set_json(json!({ "claims": { "sub": "alice" } }))
            .to_request(),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/api/v1/tokens/verify")
        .set_json(json!({ "token": issued["token"] }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["valid"], true);
    assert_eq!(body["needsRotation"], false);
    assert_eq!(body["claims"]["sub"], "alice");
    assert_eq!(body["claims"]["tokenId"], issued["tokenId"]);
}

#[actix_web::test]
async fn test_verify_failures_share_one_response() {
    let ctx = test_context();
    let app = test::init_service(create_app(ctx.state.clone())).await;

    let issued = ctx
        .manager
        .issue_token(ClaimSet::new(), IssueOptions::default())
        .await
        .unwrap();
    ctx.manager.blacklist_token(issued.token_id).await.unwrap();

    let mut bodies = Vec::new();
    for token in ["garbage.token.value".to_string(), issued.signed_value] {
        let req = test::TestRequest::post()
            .uri("/api/v1/tokens/verify")
            .set_json(json!({ "token": token }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        let body: Value = test::read_body_json(resp).await;
        bodies.push((body["error"].clone(), body["message"].clone()));
    }

    assert_eq!(bodies[0], bodies[1]);
    assert_eq!(bodies[0].1, OPAQUE_AUTH_FAILURE_MESSAGE);
}

#[actix_web::test]
async fn test_rotate_token_links_successor() {
    let ctx = test_context();
    let app = test::init_service(create_app(ctx.state.clone())).await;
    let issued = ctx
        .manager
        .issue_token(ClaimSet::new().with_subject("bob"), IssueOptions::default())
        .await
        .unwrap();

    let req = test::TestRequest::post()
        .uri("/api/v1/tokens/rotate")
        .set_json(json!({
            "tokenId": issued.token_id,
            "claims": { "scope": "read" }
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["previousTokenId"], json!(issued.token_id));
    assert_eq!(body["rotationCount"], 1);

    let successor = ctx
        .manager
        .verify_token(body["token"].as_str().unwrap())
        .await
        .unwrap();
    let claims = successor.claims.unwrap();
    assert_eq!(claims.custom.subject.as_deref(), Some("bob"));
    assert_eq!(claims.custom.extra["scope"], "read");

    // The old credential keeps working during the grace period
    let outcome = ctx.manager.verify_token(&issued.signed_value).await.unwrap();
    assert!(outcome.valid);
}

#[actix_web::test]
async fn test_rotate_unknown_token_is_not_found() {
    let ctx = test_context();
    let app = test::init_service(create_app(ctx.state.clone())).await;

    let req = test::TestRequest::post()
        .uri("/api/v1/tokens/rotate")
        .set_json(json!({ "tokenId": uuid::Uuid::new_v4() }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "TOKEN_NOT_FOUND");
}

#[actix_web::test]
async fn test_rotate_blacklisted_token_conflicts() {
    let ctx = test_context();
    let app = test::init_service(create_app(ctx.state.clone())).await;
    let issued = ctx
        .manager
        .issue_token(ClaimSet::new(), IssueOptions::default())
        .await
        .unwrap();
    ctx.manager.blacklist_token(issued.token_id).await.unwrap();

    let req = test::TestRequest::post()
        .uri("/api/v1/tokens/rotate")
        .set_json(json!({ "tokenId": issued.token_id }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::CONFLICT);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "TOKEN_ALREADY_REVOKED");
}

#[actix_web::test]
async fn test_blacklist_is_idempotent_and_revokes() {
    let ctx = test_context();
    let app = test::init_service(create_app(ctx.state.clone())).await;
    let issued = ctx
        .manager
        .issue_token(ClaimSet::new(), IssueOptions::default())
        .await
        .unwrap();

    for _ in 0..2 {
        let req = test::TestRequest::post()
            .uri("/api/v1/tokens/blacklist")
            .set_json(json!({ "tokenId": issued.token_id }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NO_CONTENT);
    }

    let req = test::TestRequest::post()
        .uri("/api/v1/tokens/verify")
        .set_json(json!({ "token": issued.signed_value }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(ctx.manager.get_statistics().await.unwrap().blacklisted_count, 1);
}

#[actix_web::test]
async fn test_unknown_route_is_not_found() {
    let ctx = test_context();
    let app = test::init_service(create_app(ctx.state.clone())).await;

    let req = test::TestRequest::get().uri("/api/v1/nothing").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
