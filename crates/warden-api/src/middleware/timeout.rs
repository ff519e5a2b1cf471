//! Bounded handler execution.
//!
//! Wraps everything downstream in a policy-resolved deadline. On expiry the
//! downstream future is dropped — tokio cancellation propagates through any
//! in-flight store or provider calls, so the timed-out request releases its
//! resources instead of leaking a task — and the client gets a plain 504.
//!
//! A client disconnect simply drops this middleware's own future; nothing
//! is converted into a response for a connection that no longer exists.
//! Downstream errors pass through untouched — the guard never swallows
//! unrelated failures.

use actix_web::body::{BoxBody, EitherBody};
use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::header::{HeaderName, HeaderValue};
use actix_web::{Error, HttpResponse};
use futures_util::future::LocalBoxFuture;
use std::future::{ready, Ready};
use std::sync::Arc;
use std::time::Instant;
use warden_policy::PolicyHandle;

use super::request_id_of;
use crate::metrics::RejectionCounters;

/// Timeout middleware factory.
pub struct TimeoutGuard {
    policies: Arc<PolicyHandle>,
    counters: Arc<RejectionCounters>,
}

impl TimeoutGuard {
    pub fn new(policies: Arc<PolicyHandle>, counters: Arc<RejectionCounters>) -> Self {
        Self { policies, counters }
    }
}

impl<S, B> Transform<S, ServiceRequest> for TimeoutGuard
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B, BoxBody>>;
    type Error = Error;
    type InitError = ();
    type Transform = TimeoutGuardService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(TimeoutGuardService {
            service,
            policies: self.policies.clone(),
            counters: self.counters.clone(),
        }))
    }
}

pub struct TimeoutGuardService<S> {
    service: S,
    policies: Arc<PolicyHandle>,
    counters: Arc<RejectionCounters>,
}

impl<S, B> Service<ServiceRequest> for TimeoutGuardService<S>
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
        let policies = self.policies.load();
        let limit = policies.timeout_for(req.path(), req.method().as_str());
        let method = req.method().to_string();
        let path = req.path().to_string();
        let request_id = request_id_of(&req);
        let http_req = req.request().clone();
        let counters = self.counters.clone();

        let fut = self.service.call(req);
        Box::pin(async move {
            let start = Instant::now();
            match tokio::time::timeout(limit, fut).await {
                Ok(result) => Ok(result?.map_into_left_body()),
                Err(_) => {
                    let duration = start.elapsed();
                    log::warn!(
                        "Request timeout: method={} path={} request_id={} duration={:.3}s limit={}s",
                        method,
                        path,
                        request_id,
                        duration.as_secs_f64(),
                        limit.as_secs(),
                    );
                    counters.record(&path, Some(&method));

                    let mut response = HttpResponse::GatewayTimeout()
                        .content_type("text/plain; charset=utf-8")
                        .body("Request timed out");
                    if let Ok(value) = HeaderValue::from_str(&request_id) {
                        response
                            .headers_mut()
                            .insert(HeaderName::from_static("x-request-id"), value);
                    }
                    Ok(ServiceResponse::new(http_req, response).map_into_right_body())
                }
            }
        })
    }
}
