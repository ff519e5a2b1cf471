//! Identity resolution — the auth resolver stage.
//!
//! Walks each request through the identity state machine:
//!
//! 1. A bearer token (Authorization header, or `access_token` cookie) is
//!    decoded and checked against the revocation list. Success yields
//!    `AuthenticatedByToken`; ANY failure — expired, malformed, bad
//!    signature, revoked — short-circuits 401 immediately. A presented
//!    token never falls back to session lookup.
//! 2. With no token presented, a `session_id` cookie is resolved against
//!    the session store. A live record yields `AuthenticatedBySession`.
//! 3. Otherwise the request proceeds as `Anonymous` — not an error; whether
//!    anonymous access is acceptable is each handler's decision.
//!
//! The resolved identity lands in the request extensions for handlers and
//! the logger. Token-authenticated responses nearing expiry are tagged with
//! `X-Token-Expiring-Soon`.

use actix_web::body::{BoxBody, EitherBody};
use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::header::{self, HeaderName, HeaderValue};
use actix_web::{Error, HttpMessage, HttpResponse};
use futures_util::future::LocalBoxFuture;
use serde_json::json;
use std::future::{ready, Ready};
use std::rc::Rc;
use std::sync::Arc;
use std::time::Duration;
use warden_auth::{
    RequestIdentity, SessionIdentity, TokenIdentity, TokenService, SESSION_COOKIE_NAME,
    TOKEN_COOKIE_NAME,
};
use warden_session::SessionStore;

use super::request_id_of;

pub const EXPIRING_SOON_HEADER: &str = "x-token-expiring-soon";

/// Auth resolver middleware factory.
pub struct AuthResolver {
    tokens: Arc<TokenService>,
    sessions: Arc<SessionStore>,
    refresh_hint_window: Duration,
}

impl AuthResolver {
    pub fn new(
        tokens: Arc<TokenService>,
        sessions: Arc<SessionStore>,
        refresh_hint_window: Duration,
    ) -> Self {
        Self { tokens, sessions, refresh_hint_window }
    }
}

impl<S, B> Transform<S, ServiceRequest> for AuthResolver
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B, BoxBody>>;
    type Error = Error;
    type InitError = ();
    type Transform = AuthResolverService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthResolverService {
            service: Rc::new(service),
            tokens: self.tokens.clone(),
            sessions: self.sessions.clone(),
            refresh_hint_window: self.refresh_hint_window,
        }))
    }
}

pub struct AuthResolverService<S> {
    service: Rc<S>,
    tokens: Arc<TokenService>,
    sessions: Arc<SessionStore>,
    refresh_hint_window: Duration,
}

impl<S, B> Service<ServiceRequest> for AuthResolverService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B, BoxBody>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);
        let tokens = self.tokens.clone();
        let sessions = self.sessions.clone();
        let hint_window = self.refresh_hint_window.as_secs() as i64;

        Box::pin(async move {
            let mut identity = RequestIdentity::Anonymous;
            let mut expiring_soon = false;

            if let Some(token) = bearer_token(&req) {
                match tokens.decode_checked(&token).await {
                    Ok(claims) => {
                        let now = chrono::Utc::now().timestamp();
                        expiring_soon = (claims.exp as i64) - now < hint_window;
                        identity = RequestIdentity::Token(TokenIdentity {
                            user_id: claims.sub,
                            email: claims.email,
                            jti: claims.jti,
                            expires_at: claims.exp as i64,
                        });
                    }
                    Err(e) => {
                        // A presented-but-invalid token is terminal: no
                        // session fallback, no cause disclosure.
                        let request_id = request_id_of(&req);
                        log::warn!(
                            "Rejected bearer token: path={} request_id={} reason={}",
                            req.path(),
                            request_id,
                            e
                        );
                        let response = HttpResponse::Unauthorized()
                            .insert_header((header::WWW_AUTHENTICATE, "Bearer"))
                            .json(json!({
                                "detail": "Invalid authentication credentials",
                                "request_id": request_id,
                            }));
                        return Ok(req.into_response(response).map_into_right_body());
                    }
                }
            } else if let Some(cookie) = req.cookie(SESSION_COOKIE_NAME) {
                match sessions.get(cookie.value()).await {
                    Ok(Some(record)) => {
                        identity = RequestIdentity::Session(SessionIdentity {
                            user_id: record.user_id.as_str().to_string(),
                            email: record.email,
                            session_id: cookie.value().to_string(),
                        });
                    }
                    Ok(None) => {
                        // Absent or expired session: anonymous, not an error
                    }
                    Err(e) => {
                        log::error!("Session lookup failed: {}", e);
                    }
                }
            }

            req.extensions_mut().insert(identity);

            let mut res = service.call(req).await?;
            if expiring_soon {
                res.headers_mut().insert(
                    HeaderName::from_static(EXPIRING_SOON_HEADER),
                    HeaderValue::from_static("true"),
                );
            }
            Ok(res.map_into_left_body())
        })
    }
}

/// Pull a bearer token from the Authorization header, falling back to the
/// `access_token` cookie (which may itself carry a `Bearer ` prefix).
fn bearer_token(req: &ServiceRequest) -> Option<String> {
    if let Some(value) = req.headers().get(header::AUTHORIZATION) {
        if let Ok(raw) = value.to_str() {
            if let Some(token) = raw.strip_prefix("Bearer ") {
                return Some(token.to_string());
            }
        }
        // A non-bearer Authorization header is not ours to judge here
        return None;
    }

    req.cookie(TOKEN_COOKIE_NAME).map(|cookie| {
        let value = cookie.value();
        value.strip_prefix("Bearer ").unwrap_or(value).to_string()
    })
}
