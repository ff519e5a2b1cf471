//! Bearer token lifecycle over the full stack: issuance, identity
//! resolution, revocation, and the no-oracle failure property.

#[macro_use]
mod common;

use actix_web::http::StatusCode;
use actix_web::{test, web};
use common::TestContext;
use serde_json::json;

fn no_extra_routes(_cfg: &mut web::ServiceConfig) {}

#[actix_web::test]
async fn test_token_grants_identity() {
    let ctx = TestContext::new();
    let app = test::init_service(test_app!(ctx, no_extra_routes)).await;

    let req = test::TestRequest::post()
        .uri("/auth/register")
        .set_json(json!({"email": "t@x.com", "password": "secret123"}))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

    let req = test::TestRequest::post()
        .uri("/auth/token")
        .set_json(json!({"email": "t@x.com", "password": "secret123"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: serde_json::Value = test::read_body_json(resp).await;
    let access_token = body["access_token"].as_str().unwrap().to_string();
    assert_eq!(body["token_type"], "bearer");
    assert!(body["expires_in"].as_u64().unwrap() > 0);
    // Three base64url segments
    assert_eq!(access_token.split('.').count(), 3);

    let req = test::TestRequest::get()
        .uri("/auth/me")
        .insert_header(("authorization", format!("Bearer {}", access_token)))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["email"], "t@x.com");
}

#[actix_web::test]
async fn test_logout_revokes_presented_token() {
    let ctx = TestContext::new();
    let app = test::init_service(test_app!(ctx, no_extra_routes)).await;

    let req = test::TestRequest::post()
        .uri("/auth/register")
        .set_json(json!({"email": "r@x.com", "password": "secret123"}))
        .to_request();
    test::call_service(&app, req).await;

    let req = test::TestRequest::post()
        .uri("/auth/token")
        .set_json(json!({"email": "r@x.com", "password": "secret123"}))
        .to_request();
    let body: serde_json::Value = test::read_body_json(test::call_service(&app, req).await).await;
    let access_token = body["access_token"].as_str().unwrap().to_string();

    // Valid before logout
    let req = test::TestRequest::get()
        .uri("/auth/me")
        .insert_header(("authorization", format!("Bearer {}", access_token)))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

    // Logout with the bearer token revokes its jti
    let req = test::TestRequest::post()
        .uri("/auth/logout")
        .insert_header(("authorization", format!("Bearer {}", access_token)))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

    // The unexpired token is now rejected...
    let req = test::TestRequest::get()
        .uri("/auth/me")
        .insert_header(("authorization", format!("Bearer {}", access_token)))
        .to_request();
    let revoked = test::call_service(&app, req).await;
    assert_eq!(revoked.status(), StatusCode::UNAUTHORIZED);
    let revoked_body: serde_json::Value = test::read_body_json(revoked).await;

    // ...and indistinguishable from a corrupted token
    let req = test::TestRequest::get()
        .uri("/auth/me")
        .insert_header(("authorization", format!("Bearer {}corrupt", access_token)))
        .to_request();
    let corrupted = test::call_service(&app, req).await;
    assert_eq!(corrupted.status(), StatusCode::UNAUTHORIZED);
    let corrupted_body: serde_json::Value = test::read_body_json(corrupted).await;

    assert_eq!(revoked_body["detail"], corrupted_body["detail"]);
}

#[actix_web::test]
async fn test_concurrent_requests_with_revoked_jti_both_fail() {
    let ctx = TestContext::new();
    let app = test::init_service(test_app!(ctx, no_extra_routes)).await;

    let req = test::TestRequest::post()
        .uri("/auth/register")
        .set_json(json!({"email": "c@x.com", "password": "secret123"}))
        .to_request();
    test::call_service(&app, req).await;

    let req = test::TestRequest::post()
        .uri("/auth/token")
        .set_json(json!({"email": "c@x.com", "password": "secret123"}))
        .to_request();
    let body: serde_json::Value = test::read_body_json(test::call_service(&app, req).await).await;
    let access_token = body["access_token"].as_str().unwrap().to_string();

    let req = test::TestRequest::post()
        .uri("/auth/logout")
        .insert_header(("authorization", format!("Bearer {}", access_token)))
        .to_request();
    test::call_service(&app, req).await;

    let req1 = test::TestRequest::get()
        .uri("/auth/me")
        .insert_header(("authorization", format!("Bearer {}", access_token)))
        .to_request();
    let req2 = test::TestRequest::get()
        .uri("/auth/me")
        .insert_header(("authorization", format!("Bearer {}", access_token)))
        .to_request();

    let (first, second) =
        futures_util::join!(test::call_service(&app, req1), test::call_service(&app, req2));
    assert_eq!(first.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(second.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn test_expired_token_short_circuits_401() {
    let ctx = TestContext::new();

    // Craft a well-signed token that expired two hours ago
    let now = chrono::Utc::now().timestamp();
    let claims = json!({
        "sub": "ghost",
        "iss": ctx.auth_settings.jwt_issuer,
        "jti": uuid::Uuid::new_v4().to_string(),
        "exp": now - 7200,
        "iat": now - 10_800,
    });
    let expired = jsonwebtoken::encode(
        &jsonwebtoken::Header::new(jsonwebtoken::Algorithm::HS256),
        &claims,
        &jsonwebtoken::EncodingKey::from_secret(ctx.auth_settings.jwt_secret.as_bytes()),
    )
    .unwrap();

    let app = test::init_service(test_app!(ctx, no_extra_routes)).await;
    let req = test::TestRequest::get()
        .uri("/auth/me")
        .insert_header(("authorization", format!("Bearer {}", expired)))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        resp.headers().get("www-authenticate").and_then(|v| v.to_str().ok()),
        Some("Bearer")
    );
}

#[actix_web::test]
async fn test_refresh_token_cannot_authenticate() {
    let ctx = TestContext::new();
    let app = test::init_service(test_app!(ctx, no_extra_routes)).await;

    let req = test::TestRequest::post()
        .uri("/auth/register")
        .set_json(json!({"email": "rf@x.com", "password": "secret123"}))
        .to_request();
    test::call_service(&app, req).await;

    let req = test::TestRequest::post()
        .uri("/auth/token")
        .set_json(json!({"email": "rf@x.com", "password": "secret123"}))
        .to_request();
    let body: serde_json::Value = test::read_body_json(test::call_service(&app, req).await).await;
    let refresh_token = body["refresh_token"].as_str().unwrap().to_string();

    let req = test::TestRequest::get()
        .uri("/auth/me")
        .insert_header(("authorization", format!("Bearer {}", refresh_token)))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn test_token_wins_over_session_cookie() {
    let ctx = TestContext::new();
    let app = test::init_service(test_app!(ctx, no_extra_routes)).await;

    // Session for one user
    let req = test::TestRequest::post()
        .uri("/auth/register")
        .set_json(json!({"email": "sess@x.com", "password": "secret123"}))
        .to_request();
    test::call_service(&app, req).await;
    let req = test::TestRequest::post()
        .uri("/auth/login")
        .set_json(json!({"email": "sess@x.com", "password": "secret123"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    let session_cookie = resp
        .response()
        .cookies()
        .find(|c| c.name() == "session_id")
        .unwrap()
        .into_owned();

    // Token for another user
    let req = test::TestRequest::post()
        .uri("/auth/register")
        .set_json(json!({"email": "tok@x.com", "password": "secret123"}))
        .to_request();
    test::call_service(&app, req).await;
    let req = test::TestRequest::post()
        .uri("/auth/token")
        .set_json(json!({"email": "tok@x.com", "password": "secret123"}))
        .to_request();
    let body: serde_json::Value = test::read_body_json(test::call_service(&app, req).await).await;
    let access_token = body["access_token"].as_str().unwrap().to_string();

    // Both credentials presented: the bearer token decides the identity
    let req = test::TestRequest::get()
        .uri("/auth/me")
        .cookie(session_cookie.clone())
        .insert_header(("authorization", format!("Bearer {}", access_token)))
        .to_request();
    let body: serde_json::Value = test::read_body_json(test::call_service(&app, req).await).await;
    assert_eq!(body["email"], "tok@x.com");

    // An invalid bearer token never falls back to the (valid) session
    let req = test::TestRequest::get()
        .uri("/auth/me")
        .cookie(session_cookie)
        .insert_header(("authorization", "Bearer not.a.token"))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::UNAUTHORIZED);
}
