//! Federated login endpoint behavior with unconfigured providers.
//!
//! Full verification against live provider JWKS is exercised in
//! `warden-oidc`; here we pin the HTTP contract: a provider without a
//! client id rejects cleanly and leaks nothing.

#[macro_use]
mod common;

use actix_web::http::StatusCode;
use actix_web::{test, web};
use common::TestContext;
use serde_json::json;

fn no_extra_routes(_cfg: &mut web::ServiceConfig) {}

#[actix_web::test]
async fn test_unconfigured_google_provider_rejects() {
    let ctx = TestContext::new();
    let app = test::init_service(test_app!(ctx, no_extra_routes)).await;

    let req = test::TestRequest::post()
        .uri("/auth/google")
        .set_json(json!({"token": "some-google-id-token"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "Unsupported provider: google");
}

#[actix_web::test]
async fn test_unconfigured_apple_provider_rejects() {
    let ctx = TestContext::new();
    let app = test::init_service(test_app!(ctx, no_extra_routes)).await;

    let req = test::TestRequest::post()
        .uri("/auth/apple")
        .set_json(json!({"token": "some-apple-identity-token"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_missing_token_field_is_a_client_error() {
    let ctx = TestContext::new();
    let app = test::init_service(test_app!(ctx, no_extra_routes)).await;

    let req = test::TestRequest::post()
        .uri("/auth/google")
        .set_json(json!({"not_token": "x"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_client_error());
}
