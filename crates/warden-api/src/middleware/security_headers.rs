//! Protective response headers.
//!
//! Applied after the response is produced. MIME-sniffing and legacy XSS
//! protection are unconditional; frame, CSP, and permissions values come
//! from the first-matching per-path override else the global defaults;
//! HSTS only when the request is HTTPS (connection scheme or forwarded
//! proto) or HTTPS is globally forced.

use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::header::{self, HeaderName, HeaderValue};
use actix_web::Error;
use futures_util::future::LocalBoxFuture;
use std::future::{ready, Ready};
use std::sync::Arc;
use warden_policy::PolicyHandle;

/// Security-headers middleware factory.
pub struct SecurityHeaders {
    policies: Arc<PolicyHandle>,
}

impl SecurityHeaders {
    pub fn new(policies: Arc<PolicyHandle>) -> Self {
        Self { policies }
    }
}

impl<S, B> Transform<S, ServiceRequest> for SecurityHeaders
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = SecurityHeadersService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(SecurityHeadersService { service, policies: self.policies.clone() }))
    }
}

pub struct SecurityHeadersService<S> {
    service: S,
    policies: Arc<PolicyHandle>,
}

impl<S, B> Service<ServiceRequest> for SecurityHeadersService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let policies = self.policies.load();
        let path = req.path().to_string();
        let is_https = req.connection_info().scheme() == "https"
            || req
                .headers()
                .get("x-forwarded-proto")
                .and_then(|value| value.to_str().ok())
                .map(|proto| proto.eq_ignore_ascii_case("https"))
                .unwrap_or(false);

        let fut = self.service.call(req);
        Box::pin(async move {
            let mut res = fut.await?;
            let effective = policies.headers.effective(&path, is_https);
            let headers = res.headers_mut();

            // Unconditional protections
            headers.insert(header::X_CONTENT_TYPE_OPTIONS, HeaderValue::from_static("nosniff"));
            headers.insert(
                HeaderName::from_static("x-xss-protection"),
                HeaderValue::from_static("1; mode=block"),
            );
            headers.insert(
                header::REFERRER_POLICY,
                HeaderValue::from_static("strict-origin-when-cross-origin"),
            );

            set_header(headers, header::X_FRAME_OPTIONS, &effective.x_frame_options);
            set_header(
                headers,
                header::CONTENT_SECURITY_POLICY,
                &effective.content_security_policy,
            );
            set_header(
                headers,
                HeaderName::from_static("permissions-policy"),
                &effective.permissions_policy,
            );
            if let Some(ref hsts) = effective.strict_transport_security {
                set_header(headers, header::STRICT_TRANSPORT_SECURITY, hsts);
            }

            Ok(res)
        })
    }
}

fn set_header(
    headers: &mut actix_web::http::header::HeaderMap,
    name: impl Into<HeaderName>,
    value: &str,
) {
    match HeaderValue::from_str(value) {
        Ok(value) => {
            headers.insert(name.into(), value);
        }
        Err(e) => log::warn!("Skipping unencodable security header value: {}", e),
    }
}
