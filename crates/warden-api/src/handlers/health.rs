//! Health probe and root banner.

use actix_web::HttpResponse;
use serde_json::json;

/// GET /health
pub async fn healthcheck_handler() -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// GET /
pub async fn root_handler() -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "message": "Welcome to Warden",
    }))
}
