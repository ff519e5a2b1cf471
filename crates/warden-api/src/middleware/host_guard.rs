//! Host header allow-list.
//!
//! Innermost protective stage: requests whose Host does not match the
//! configured allow-list are answered with 400 before any handler runs.
//! An empty list, or a `*` entry, disables the check.

use actix_web::body::{BoxBody, EitherBody};
use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::{Error, HttpResponse};
use futures_util::future::LocalBoxFuture;
use std::future::{ready, Ready};
use std::sync::Arc;

/// Host-guard middleware factory.
pub struct HostGuard {
    allowed: Arc<Vec<String>>,
}

impl HostGuard {
    pub fn new(allowed_hosts: Vec<String>) -> Self {
        Self { allowed: Arc::new(allowed_hosts) }
    }
}

impl<S, B> Transform<S, ServiceRequest> for HostGuard
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B, BoxBody>>;
    type Error = Error;
    type InitError = ();
    type Transform = HostGuardService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(HostGuardService { service, allowed: self.allowed.clone() }))
    }
}

pub struct HostGuardService<S> {
    service: S,
    allowed: Arc<Vec<String>>,
}

impl<S, B> Service<ServiceRequest> for HostGuardService<S>
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
        let open = self.allowed.is_empty() || self.allowed.iter().any(|h| h == "*");
        if !open {
            // Host without any port suffix
            let host_header = req.connection_info().host().to_string();
            let host = host_header.split(':').next().unwrap_or("").to_string();
            if !self.allowed.iter().any(|allowed| allowed.eq_ignore_ascii_case(&host)) {
                log::warn!("Rejected request with untrusted host '{}'", host);
                let response = HttpResponse::BadRequest()
                    .content_type("text/plain; charset=utf-8")
                    .body("Invalid host header");
                return Box::pin(async move {
                    Ok(req.into_response(response).map_into_right_body())
                });
            }
        }

        let fut = self.service.call(req);
        Box::pin(async move { Ok(fut.await?.map_into_left_body()) })
    }
}
