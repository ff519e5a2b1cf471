//! Registration handler
//!
//! POST /auth/register - Creates a password-credentialed user

use actix_web::{web, HttpResponse};
use std::sync::Arc;
use warden_auth::{register_user, UserRepository};

use super::models::{RegisterRequest, UserResponse};
use crate::error::map_auth_error_to_response;

/// POST /auth/register
pub async fn register_handler(
    repo: web::Data<Arc<dyn UserRepository>>,
    body: web::Json<RegisterRequest>,
) -> HttpResponse {
    match register_user(repo.get_ref(), &body.email, &body.password).await {
        Ok(user) => HttpResponse::Ok().json(UserResponse::from(&user)),
        Err(err) => map_auth_error_to_response(err),
    }
}
