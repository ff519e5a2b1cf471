//! End-to-end password authentication flow over the full middleware stack.

#[macro_use]
mod common;

use actix_web::http::StatusCode;
use actix_web::{test, web};
use common::TestContext;
use serde_json::json;

fn no_extra_routes(_cfg: &mut web::ServiceConfig) {}

#[actix_web::test]
async fn test_register_login_me_logout_cycle() {
    let ctx = TestContext::new();
    let app = test::init_service(test_app!(ctx, no_extra_routes)).await;

    // Register
    let req = test::TestRequest::post()
        .uri("/auth/register")
        .set_json(json!({"email": "a@x.com", "password": "secret123"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["email"], "a@x.com");
    assert!(body["id"].as_str().is_some());

    // Login sets a session cookie
    let req = test::TestRequest::post()
        .uri("/auth/login")
        .set_json(json!({"email": "a@x.com", "password": "secret123"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let session_cookie = resp
        .response()
        .cookies()
        .find(|c| c.name() == "session_id")
        .expect("login must set session_id cookie")
        .into_owned();
    assert!(!session_cookie.value().is_empty());
    assert_eq!(session_cookie.http_only(), Some(true));

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["email"], "a@x.com");

    // Identity check with the cookie
    let req = test::TestRequest::get()
        .uri("/auth/me")
        .cookie(session_cookie.clone())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["email"], "a@x.com");

    // Logout deletes the server-side session
    let req = test::TestRequest::post()
        .uri("/auth/logout")
        .cookie(session_cookie.clone())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    // The same cookie no longer authenticates
    let req = test::TestRequest::get()
        .uri("/auth/me")
        .cookie(session_cookie)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn test_duplicate_registration_rejected() {
    let ctx = TestContext::new();
    let app = test::init_service(test_app!(ctx, no_extra_routes)).await;

    let req = test::TestRequest::post()
        .uri("/auth/register")
        .set_json(json!({"email": "dup@x.com", "password": "secret123"}))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

    let req = test::TestRequest::post()
        .uri("/auth/register")
        .set_json(json!({"email": "dup@x.com", "password": "other-secret9"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "Email already registered");
}

#[actix_web::test]
async fn test_wrong_password_is_uniform_401() {
    let ctx = TestContext::new();
    let app = test::init_service(test_app!(ctx, no_extra_routes)).await;

    let req = test::TestRequest::post()
        .uri("/auth/register")
        .set_json(json!({"email": "u@x.com", "password": "secret123"}))
        .to_request();
    test::call_service(&app, req).await;

    // Wrong password and unknown user produce identical responses
    let req = test::TestRequest::post()
        .uri("/auth/login")
        .set_json(json!({"email": "u@x.com", "password": "wrong-password"}))
        .to_request();
    let wrong_pw = test::call_service(&app, req).await;
    assert_eq!(wrong_pw.status(), StatusCode::UNAUTHORIZED);
    let wrong_pw_body: serde_json::Value = test::read_body_json(wrong_pw).await;

    let req = test::TestRequest::post()
        .uri("/auth/login")
        .set_json(json!({"email": "nobody@x.com", "password": "secret123"}))
        .to_request();
    let unknown = test::call_service(&app, req).await;
    assert_eq!(unknown.status(), StatusCode::UNAUTHORIZED);
    let unknown_body: serde_json::Value = test::read_body_json(unknown).await;

    assert_eq!(wrong_pw_body, unknown_body);
}

#[actix_web::test]
async fn test_me_without_credentials_is_401_with_challenge() {
    let ctx = TestContext::new();
    let app = test::init_service(test_app!(ctx, no_extra_routes)).await;

    let req = test::TestRequest::get().uri("/auth/me").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        resp.headers().get("www-authenticate").and_then(|v| v.to_str().ok()),
        Some("Bearer")
    );
}

#[actix_web::test]
async fn test_logout_is_idempotent() {
    let ctx = TestContext::new();
    let app = test::init_service(test_app!(ctx, no_extra_routes)).await;

    // Logging out with no session at all still succeeds and clears the cookie
    let req = test::TestRequest::post().uri("/auth/logout").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let cleared = resp
        .response()
        .cookies()
        .find(|c| c.name() == "session_id")
        .expect("logout must clear the cookie");
    assert_eq!(cleared.value(), "");
}

#[actix_web::test]
async fn test_weak_password_rejected_at_registration() {
    let ctx = TestContext::new();
    let app = test::init_service(test_app!(ctx, no_extra_routes)).await;

    let req = test::TestRequest::post()
        .uri("/auth/register")
        .set_json(json!({"email": "w@x.com", "password": "short"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_responses_carry_request_id_and_process_time() {
    let ctx = TestContext::new();
    let app = test::init_service(test_app!(ctx, no_extra_routes)).await;

    let req = test::TestRequest::get().uri("/health").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(resp.headers().contains_key("x-request-id"));
    assert!(resp.headers().contains_key("x-process-time"));

    // An inbound request id is echoed back
    let req = test::TestRequest::get()
        .uri("/health")
        .insert_header(("x-request-id", "trace-me-42"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(
        resp.headers().get("x-request-id").and_then(|v| v.to_str().ok()),
        Some("trace-me-42")
    );
}
