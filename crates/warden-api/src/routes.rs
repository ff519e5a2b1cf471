//! API routes configuration.

use crate::handlers;
use actix_web::web;

/// Register all HTTP routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/auth")
            .route("/register", web::post().to(handlers::auth::register_handler))
            .route("/login", web::post().to(handlers::auth::login_handler))
            .route("/token", web::post().to(handlers::auth::token_handler))
            .route("/logout", web::post().to(handlers::auth::logout_handler))
            .route("/me", web::get().to(handlers::auth::me_handler))
            .route("/google", web::post().to(handlers::auth::google_login_handler))
            .route("/apple", web::post().to(handlers::auth::apple_login_handler))
            .route("/facebook", web::post().to(handlers::auth::facebook_login_handler)),
    )
    .route("/health", web::get().to(handlers::healthcheck_handler))
    .route("/", web::get().to(handlers::root_handler));
}
