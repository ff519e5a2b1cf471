//! Federated login handlers
//!
//! POST /auth/google | /auth/apple | /auth/facebook - Verify a provider
//! credential, provision the user just-in-time, and establish a session.
//! Provider verification happens exactly here, once per login event; its
//! result lives on in the session, never re-verified per request.

use actix_web::{web, HttpResponse};
use std::collections::HashMap;
use std::sync::Arc;
use warden_auth::{create_session_cookie, provision_federated_user, CookieConfig, UserRepository};
use warden_oidc::{FederatedVerifier, IdentityProvider};
use warden_session::SessionStore;

use super::models::{AuthErrorResponse, MessageResponse, SocialLoginRequest};
use crate::error::{map_auth_error_to_response, map_oidc_error_to_response};

/// POST /auth/google
pub async fn google_login_handler(
    repo: web::Data<Arc<dyn UserRepository>>,
    sessions: web::Data<Arc<SessionStore>>,
    verifier: web::Data<Arc<FederatedVerifier>>,
    cookie_config: web::Data<CookieConfig>,
    body: web::Json<SocialLoginRequest>,
) -> HttpResponse {
    process_social_login(IdentityProvider::Google, &body.token, repo, sessions, verifier, cookie_config)
        .await
}

/// POST /auth/apple
pub async fn apple_login_handler(
    repo: web::Data<Arc<dyn UserRepository>>,
    sessions: web::Data<Arc<SessionStore>>,
    verifier: web::Data<Arc<FederatedVerifier>>,
    cookie_config: web::Data<CookieConfig>,
    body: web::Json<SocialLoginRequest>,
) -> HttpResponse {
    process_social_login(IdentityProvider::Apple, &body.token, repo, sessions, verifier, cookie_config)
        .await
}

/// POST /auth/facebook
pub async fn facebook_login_handler(
    repo: web::Data<Arc<dyn UserRepository>>,
    sessions: web::Data<Arc<SessionStore>>,
    verifier: web::Data<Arc<FederatedVerifier>>,
    cookie_config: web::Data<CookieConfig>,
    body: web::Json<SocialLoginRequest>,
) -> HttpResponse {
    process_social_login(
        IdentityProvider::Facebook,
        &body.token,
        repo,
        sessions,
        verifier,
        cookie_config,
    )
    .await
}

async fn process_social_login(
    provider: IdentityProvider,
    credential: &str,
    repo: web::Data<Arc<dyn UserRepository>>,
    sessions: web::Data<Arc<SessionStore>>,
    verifier: web::Data<Arc<FederatedVerifier>>,
    cookie_config: web::Data<CookieConfig>,
) -> HttpResponse {
    let verified = match verifier.verify(provider, credential).await {
        Ok(identity) => identity,
        Err(err) => return map_oidc_error_to_response(provider.as_str(), err),
    };

    let user = match provision_federated_user(
        repo.get_ref(),
        provider.as_str(),
        &verified.subject,
        verified.email.as_deref(),
    )
    .await
    {
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
    HttpResponse::Ok().cookie(cookie).json(MessageResponse::with_email(
        format!("Login with {} successful", provider),
        user.email,
    ))
}
