//! Sanitization and validation gate: depth limits, allow-list cleaning of
//! query and body input, schema enforcement, strict mode.

#[macro_use]
mod common;

use actix_web::http::StatusCode;
use actix_web::{test, web, HttpRequest, HttpResponse};
use common::TestContext;
use serde_json::{json, Value};
use std::collections::HashMap;
use warden_policy::{FieldSpec, ParamSchema, SchemaRegistry};

fn echo_routes(cfg: &mut web::ServiceConfig) {
    cfg.route(
        "/echo-body",
        web::post().to(|body: web::Json<Value>| async move { HttpResponse::Ok().json(body.0) }),
    )
    .route(
        "/echo-query",
        web::get().to(|query: web::Query<HashMap<String, String>>| async move {
            HttpResponse::Ok().json(query.0)
        }),
    )
    .route(
        "/docs/raw-query",
        web::get().to(|req: HttpRequest| async move {
            HttpResponse::Ok().body(req.query_string().to_string())
        }),
    );
}

fn schemas() -> SchemaRegistry {
    SchemaRegistry::new()
        .register(
            "/echo-query",
            ParamSchema::new()
                .field("q", FieldSpec::string().len_range(1, 100))
                .field("page", FieldSpec::int().range(1, 1000)),
        )
        .register("/echo-body", ParamSchema::new())
}

fn deep_json(depth: usize) -> Value {
    let mut value = json!("leaf");
    for _ in 0..depth {
        value = json!({ "nested": value });
    }
    value
}

#[actix_web::test]
async fn test_excessive_depth_rejected_before_sanitization() {
    let ctx = TestContext::new().with_schemas(schemas());
    let app = test::init_service(test_app!(ctx, echo_routes)).await;

    let req = test::TestRequest::post()
        .uri("/echo-body")
        .set_json(deep_json(15))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(test::read_body(resp).await.as_ref(), b"Invalid request body");
}

#[actix_web::test]
async fn test_depth_at_limit_passes() {
    let ctx = TestContext::new().with_schemas(schemas());
    let app = test::init_service(test_app!(ctx, echo_routes)).await;

    let req = test::TestRequest::post()
        .uri("/echo-body")
        .set_json(deep_json(9))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[actix_web::test]
async fn test_body_strings_are_sanitized_before_the_handler() {
    let ctx = TestContext::new().with_schemas(schemas());
    let app = test::init_service(test_app!(ctx, echo_routes)).await;

    let req = test::TestRequest::post()
        .uri("/echo-body")
        .set_json(json!({
            "name": "<script>alert(1)</script>safe",
            "bio": "<b>kept</b>",
            "count": 7
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    // The handler echoed what it received: already-cleaned input
    assert_eq!(body["name"], "alert(1)safe");
    assert_eq!(body["bio"], "<b>kept</b>");
    assert_eq!(body["count"], 7);
}

#[actix_web::test]
async fn test_malformed_json_body_rejected() {
    let ctx = TestContext::new().with_schemas(schemas());
    let app = test::init_service(test_app!(ctx, echo_routes)).await;

    let req = test::TestRequest::post()
        .uri("/echo-body")
        .insert_header(("content-type", "application/json"))
        .set_payload("{not json")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_query_values_sanitized_and_replaced() {
    let ctx = TestContext::new().with_schemas(schemas());
    let app = test::init_service(test_app!(ctx, echo_routes)).await;

    let req = test::TestRequest::get()
        .uri("/echo-query?q=%3Cscript%3Ealert(1)%3C%2Fscript%3Etext")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    // Downstream only ever sees the cleaned value
    assert_eq!(body["q"], "alert(1)text");
}

#[actix_web::test]
async fn test_unknown_parameter_rejected() {
    let ctx = TestContext::new().with_schemas(schemas());
    let app = test::init_service(test_app!(ctx, echo_routes)).await;

    let req = test::TestRequest::get().uri("/echo-query?q=x&evil=1").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(test::read_body(resp).await.as_ref(), b"Invalid request parameters");
}

#[actix_web::test]
async fn test_constraint_violation_rejected() {
    let ctx = TestContext::new().with_schemas(schemas());
    let app = test::init_service(test_app!(ctx, echo_routes)).await;

    let req = test::TestRequest::get().uri("/echo-query?page=5000").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_strict_mode_rejects_params_on_undeclared_path() {
    let ctx = TestContext::new().with_schemas(schemas());
    let app = test::init_service(test_app!(ctx, echo_routes)).await;

    // /health declares no schema; strict mode refuses its parameters
    let req = test::TestRequest::get().uri("/health?debug=1").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    // Without parameters the same path is untouched
    let req = test::TestRequest::get().uri("/health").to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);
}

#[actix_web::test]
async fn test_excluded_path_bypasses_validation() {
    let ctx = TestContext::new().with_schemas(schemas());
    let app = test::init_service(test_app!(ctx, echo_routes)).await;

    // /docs is excluded by default; hostile-looking params pass through raw
    let req = test::TestRequest::get()
        .uri("/docs/raw-query?q=%3Cscript%3E")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(test::read_body(resp).await.as_ref(), b"q=%3Cscript%3E");
}

#[actix_web::test]
async fn test_non_strict_mode_passes_undeclared_params() {
    let mut governance = warden_configs::GovernanceSettings::default();
    governance.validation.strict_mode = false;
    let ctx = TestContext::with_governance(governance).with_schemas(schemas());
    let app = test::init_service(test_app!(ctx, echo_routes)).await;

    let req = test::TestRequest::get().uri("/health?debug=1").to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);
}
