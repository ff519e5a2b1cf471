//! The interceptor chain.
//!
//! Every stage is an Actix `Transform`/`Service` pair. Stages that can
//! reject respond with `EitherBody`: the left body is the downstream
//! response, the right body is the stage's own rejection. Within the chain,
//! a rejecting stage unconditionally short-circuits every later stage.

pub mod auth;
pub mod host_guard;
pub mod logging;
pub mod request_id;
pub mod security_headers;
pub mod size_limit;
pub mod timeout;
pub mod validation;

pub use auth::AuthResolver;
pub use host_guard::HostGuard;
pub use logging::RequestLogging;
pub use request_id::RequestIdMiddleware;
pub use security_headers::SecurityHeaders;
pub use size_limit::SizeLimitGuard;
pub use timeout::TimeoutGuard;
pub use validation::RequestValidation;

use actix_web::dev::ServiceRequest;
use actix_web::HttpMessage;
use warden_commons::RequestId;

/// Request id for log/header use; "unknown" before the request-id stage ran.
pub(crate) fn request_id_of(req: &ServiceRequest) -> String {
    req.extensions()
        .get::<RequestId>()
        .map(|id| id.as_str().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}
