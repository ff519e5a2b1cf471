//! Token issuance handler
//!
//! POST /auth/token - Exchanges a password credential for bearer tokens.

use actix_web::{web, HttpResponse};
use std::sync::Arc;
use std::time::Duration;
use warden_auth::{
    authenticate_password, ClaimSpec, TokenService, TokenType, UserRepository,
};
use warden_configs::AuthSettings;

use super::models::{AuthErrorResponse, LoginRequest, TokenResponse};
use crate::error::map_auth_error_to_response;

/// POST /auth/token
pub async fn token_handler(
    repo: web::Data<Arc<dyn UserRepository>>,
    tokens: web::Data<Arc<TokenService>>,
    settings: web::Data<AuthSettings>,
    body: web::Json<LoginRequest>,
) -> HttpResponse {
    let user = match authenticate_password(repo.get_ref(), &body.email, &body.password).await {
        Ok(user) => user,
        Err(err) => return map_auth_error_to_response(err),
    };

    let access_ttl = Duration::from_secs(settings.access_token_ttl_secs);
    let refresh_ttl = Duration::from_secs(settings.refresh_token_ttl_secs);

    let access = tokens.issue(
        ClaimSpec::new(user.user_id.as_str()).with_email(user.email.clone()),
        access_ttl,
    );
    let refresh = tokens.issue(
        ClaimSpec::new(user.user_id.as_str())
            .with_email(user.email.clone())
            .with_token_type(TokenType::Refresh),
        refresh_ttl,
    );

    match (access, refresh) {
        (Ok((access_token, _)), Ok((refresh_token, _))) => HttpResponse::Ok().json(TokenResponse {
            access_token,
            refresh_token,
            token_type: "bearer".to_string(),
            expires_in: access_ttl.as_secs(),
        }),
        (Err(e), _) | (_, Err(e)) => {
            log::error!("Token issuance failed for {}: {}", user.user_id, e);
            HttpResponse::InternalServerError()
                .json(AuthErrorResponse::new("internal_error", "Failed to generate token"))
        }
    }
}
