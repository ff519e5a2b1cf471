//! Error → HTTP response mapping.
//!
//! Credential failures collapse into one generic 401 regardless of cause
//! (wrong password, unknown user, expired token, revoked token, bad
//! signature) so the response carries no oracle. The specific reason lives
//! only in server logs.

use crate::handlers::auth::models::AuthErrorResponse;
use actix_web::http::header;
use actix_web::HttpResponse;
use warden_auth::AuthError;
use warden_oidc::OidcError;

/// Map authentication errors to HTTP responses.
pub(crate) fn map_auth_error_to_response(err: AuthError) -> HttpResponse {
    match err {
        AuthError::InvalidCredentials(_)
        | AuthError::UserNotFound(_)
        | AuthError::TokenExpired
        | AuthError::InvalidSignature
        | AuthError::MalformedAuthorization(_)
        | AuthError::MissingClaim(_) => HttpResponse::Unauthorized()
            .json(AuthErrorResponse::new("unauthorized", "Incorrect email or password")),

        AuthError::MissingAuthorization(_) => HttpResponse::Unauthorized()
            .insert_header((header::WWW_AUTHENTICATE, "Bearer"))
            .json(AuthErrorResponse::new("unauthorized", "Not authenticated")),

        AuthError::AlreadyExists(_) => HttpResponse::BadRequest()
            .json(AuthErrorResponse::new("bad_request", "Email already registered")),

        AuthError::WeakPassword(message) => {
            HttpResponse::BadRequest().json(AuthErrorResponse::new("weak_password", message))
        }

        AuthError::InvalidEmail(_) => HttpResponse::BadRequest()
            .json(AuthErrorResponse::new("bad_request", "Invalid email address")),

        AuthError::EmailRequired => HttpResponse::BadRequest().json(AuthErrorResponse::new(
            "bad_request",
            "Email not provided by social provider",
        )),

        AuthError::HashingError(_) | AuthError::StoreError(_) => {
            HttpResponse::InternalServerError()
                .json(AuthErrorResponse::new("internal_error", "Authentication failed"))
        }
    }
}

/// Map federated verification errors to HTTP responses.
///
/// Everything the provider rejects is the client's 400; details go to logs.
pub(crate) fn map_oidc_error_to_response(provider: &str, err: OidcError) -> HttpResponse {
    log::warn!("Federated verification failed for {}: {}", provider, err);
    match err {
        OidcError::ProviderDisabled(_) => HttpResponse::BadRequest().json(
            AuthErrorResponse::new("bad_request", format!("Unsupported provider: {}", provider)),
        ),
        _ => HttpResponse::BadRequest().json(AuthErrorResponse::new(
            "bad_request",
            format!("Invalid {} credential", provider),
        )),
    }
}
