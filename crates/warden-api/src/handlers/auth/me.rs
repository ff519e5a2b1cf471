//! Current user handler
//!
//! GET /auth/me - Returns the user behind the request's resolved identity.
//! The auth resolver has already done the work; this handler only enforces
//! that an identity exists and that its user record is still present.

use actix_web::http::header;
use actix_web::{web, HttpMessage, HttpRequest, HttpResponse};
use std::sync::Arc;
use warden_auth::{RequestIdentity, UserRepository};
use warden_commons::UserId;

use super::models::{AuthErrorResponse, UserResponse};

/// GET /auth/me
pub async fn me_handler(
    req: HttpRequest,
    repo: web::Data<Arc<dyn UserRepository>>,
) -> HttpResponse {
    let identity = req
        .extensions()
        .get::<RequestIdentity>()
        .cloned()
        .unwrap_or(RequestIdentity::Anonymous);

    let user_id = match identity.user_id() {
        Some(user_id) => UserId::new(user_id),
        None => return not_authenticated(),
    };

    match repo.get_by_id(&user_id).await {
        Ok(Some(user)) => HttpResponse::Ok().json(UserResponse::from(&user)),
        Ok(None) => {
            log::warn!("Identity references missing user {}", user_id);
            not_authenticated()
        }
        Err(e) => {
            log::error!("User lookup failed for {}: {}", user_id, e);
            HttpResponse::InternalServerError()
                .json(AuthErrorResponse::new("internal_error", "Lookup failed"))
        }
    }
}

fn not_authenticated() -> HttpResponse {
    HttpResponse::Unauthorized()
        .insert_header((header::WWW_AUTHENTICATE, "Bearer"))
        .json(AuthErrorResponse::new("unauthorized", "Not authenticated"))
}
