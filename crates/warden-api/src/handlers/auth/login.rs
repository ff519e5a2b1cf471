//! Login handler
//!
//! POST /auth/login - Authenticates a password credential and establishes a
//! server-side session referenced by an HttpOnly cookie.

use actix_web::{web, HttpResponse};
use std::collections::HashMap;
use std::sync::Arc;
use warden_auth::{authenticate_password, create_session_cookie, CookieConfig, UserRepository};
use warden_session::SessionStore;

use super::models::{AuthErrorResponse, LoginRequest, MessageResponse};
use crate::error::map_auth_error_to_response;

/// POST /auth/login
pub async fn login_handler(
    repo: web::Data<Arc<dyn UserRepository>>,
    sessions: web::Data<Arc<SessionStore>>,
    cookie_config: web::Data<CookieConfig>,
    body: web::Json<LoginRequest>,
) -> HttpResponse {
    let user = match authenticate_password(repo.get_ref(), &body.email, &body.password).await {
        Ok(user) => user,
        Err(err) => return map_auth_error_to_response(err),
    };

    let session_id = match sessions
        .create(user.user_id.clone(), user.email.clone(), HashMap::new())
        .await
    {
        Ok(session_id) => session_id,
        Err(e) => {
            log::error!("Session creation failed for {}: {}", user.user_id, e);
            return HttpResponse::InternalServerError()
                .json(AuthErrorResponse::new("internal_error", "Login failed"));
        }
    };

    let cookie = create_session_cookie(&session_id, cookie_config.get_ref());
    HttpResponse::Ok()
        .cookie(cookie)
        .json(MessageResponse::with_email("Login successful", user.email))
}
