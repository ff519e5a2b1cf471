//! Declared body-size enforcement.
//!
//! Compares the `Content-Length` header against the policy-resolved limit
//! BEFORE the body is read. No header means the size is unknown ahead of
//! read and the request passes (streaming accounting is out of scope); a
//! header that does not parse as an integer is logged and deliberately
//! fails open — availability wins over strictness for that one malformed
//! case. Oversized requests get 413 with the resolved limit echoed in
//! `X-Max-Content-Length`.

use actix_web::body::{BoxBody, EitherBody};
use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::header::{self, HeaderName, HeaderValue};
use actix_web::{Error, HttpResponse};
use futures_util::future::LocalBoxFuture;
use std::future::{ready, Ready};
use std::sync::Arc;
use warden_policy::PolicyHandle;

use super::request_id_of;
use crate::metrics::RejectionCounters;

pub const MAX_CONTENT_LENGTH_HEADER: &str = "x-max-content-length";

/// Size-limit middleware factory.
pub struct SizeLimitGuard {
    policies: Arc<PolicyHandle>,
    counters: Arc<RejectionCounters>,
}

impl SizeLimitGuard {
    pub fn new(policies: Arc<PolicyHandle>, counters: Arc<RejectionCounters>) -> Self {
        Self { policies, counters }
    }
}

impl<S, B> Transform<S, ServiceRequest> for SizeLimitGuard
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B, BoxBody>>;
    type Error = Error;
    type InitError = ();
    type Transform = SizeLimitGuardService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(SizeLimitGuardService {
            service,
            policies: self.policies.clone(),
            counters: self.counters.clone(),
        }))
    }
}

pub struct SizeLimitGuardService<S> {
    service: S,
    policies: Arc<PolicyHandle>,
    counters: Arc<RejectionCounters>,
}

impl<S, B> Service<ServiceRequest> for SizeLimitGuardService<S>
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
        let limit = policies.size_limit_for(req.path(), req.method().as_str());

        if let Some(raw) = req.headers().get(header::CONTENT_LENGTH) {
            match raw.to_str().ok().and_then(|value| value.parse::<u64>().ok()) {
                Some(content_length) if content_length > limit => {
                    let request_id = request_id_of(&req);
                    log::warn!(
                        "Request rejected by size limit: method={} path={} request_id={} client={} content_length={} limit={}",
                        req.method(),
                        req.path(),
                        request_id,
                        req.connection_info().realip_remote_addr().unwrap_or("unknown"),
                        content_length,
                        limit,
                    );
                    self.counters.record(req.path(), None);

                    let mut builder = HttpResponse::PayloadTooLarge();
                    builder.content_type("text/plain; charset=utf-8");
                    if let Ok(value) = HeaderValue::from_str(&limit.to_string()) {
                        builder.insert_header((
                            HeaderName::from_static(MAX_CONTENT_LENGTH_HEADER),
                            value,
                        ));
                    }
                    if let Ok(value) = HeaderValue::from_str(&request_id) {
                        builder.insert_header((HeaderName::from_static("x-request-id"), value));
                    }
                    let response = builder.body("Request entity too large");
                    return Box::pin(async move {
                        Ok(req.into_response(response).map_into_right_body())
                    });
                }
                Some(_) => {}
                None => {
                    // Malformed header: log and fail open
                    log::warn!(
                        "Invalid Content-Length header: method={} path={} request_id={} value={:?}",
                        req.method(),
                        req.path(),
                        request_id_of(&req),
                        raw,
                    );
                }
            }
        }

        let fut = self.service.call(req);
        Box::pin(async move { Ok(fut.await?.map_into_left_body()) })
    }
}
