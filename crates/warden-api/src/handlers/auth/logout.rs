//! Logout handler
//!
//! POST /auth/logout - Deletes the server-side session, revokes a presented
//! bearer token for its remaining lifetime, and clears the cookie.
//! Idempotent: logging out twice is fine.

use actix_web::http::header;
use actix_web::{web, HttpMessage, HttpRequest, HttpResponse};
use std::sync::Arc;
use std::time::Duration;
use warden_auth::{
    create_session_logout_cookie, CookieConfig, TokenService, SESSION_COOKIE_NAME,
    TOKEN_COOKIE_NAME,
};
use warden_session::SessionStore;

use super::models::MessageResponse;

/// POST /auth/logout
pub async fn logout_handler(
    req: HttpRequest,
    sessions: web::Data<Arc<SessionStore>>,
    tokens: web::Data<Arc<TokenService>>,
    cookie_config: web::Data<CookieConfig>,
) -> HttpResponse {
    if let Some(cookie) = req.cookie(SESSION_COOKIE_NAME) {
        if let Err(e) = sessions.delete(cookie.value()).await {
            // Deletion failure is not the client's problem; the cookie is
            // cleared regardless and the record will age out on TTL.
            log::error!("Session delete failed: {}", e);
        }
    }

    if let Some(token) = presented_bearer(&req) {
        // An unreadable token needs no revocation entry; expiry has it.
        if let Ok(claims) = tokens.decode(&token) {
            let remaining = Duration::from_secs(claims.remaining_secs());
            if let Err(e) = tokens.revoke(&claims.jti, remaining).await {
                log::error!("Token revocation failed for jti={}: {}", claims.jti, e);
            }
        }
    }

    HttpResponse::Ok()
        .cookie(create_session_logout_cookie(cookie_config.get_ref()))
        .json(MessageResponse::new("Logged out"))
}

fn presented_bearer(req: &HttpRequest) -> Option<String> {
    if let Some(value) = req.headers().get(header::AUTHORIZATION) {
        if let Ok(raw) = value.to_str() {
            if let Some(token) = raw.strip_prefix("Bearer ") {
                return Some(token.to_string());
            }
        }
        return None;
    }
    req.cookie(TOKEN_COOKIE_NAME).map(|cookie| {
        let value = cookie.value();
        value.strip_prefix("Bearer ").unwrap_or(value).to_string()
    })
}
