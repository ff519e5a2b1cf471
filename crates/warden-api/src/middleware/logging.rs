//! Request/response logging — the outermost stage.
//!
//! Opens a tracing span for the whole request, logs the outcome at a level
//! chosen by status class, stamps `X-Process-Time`, and converts any error
//! escaping the inner stack into a generic 500 carrying only the request
//! id — internal error text never reaches the client.

use actix_web::body::{BoxBody, EitherBody};
use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::header::{self, HeaderName, HeaderValue};
use actix_web::{Error, HttpMessage, HttpResponse};
use futures_util::future::LocalBoxFuture;
use serde_json::json;
use std::future::{ready, Ready};
use std::time::Instant;
use tracing::Instrument;
use warden_auth::RequestIdentity;
use warden_commons::RequestId;

/// Logging middleware factory.
#[derive(Debug, Clone, Default)]
pub struct RequestLogging;

impl<S, B> Transform<S, ServiceRequest> for RequestLogging
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B, BoxBody>>;
    type Error = Error;
    type InitError = ();
    type Transform = RequestLoggingService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequestLoggingService { service }))
    }
}

pub struct RequestLoggingService<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for RequestLoggingService<S>
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
        let method = req.method().to_string();
        let path = req.path().to_string();
        let client = req.connection_info().realip_remote_addr().map(|a| a.to_string());
        let user_agent = req
            .headers()
            .get(header::USER_AGENT)
            .and_then(|value| value.to_str().ok())
            .map(|value| value.to_string());

        // Shares extensions with the ServiceRequest; inner stages populate
        // the request id and identity we read afterwards.
        let http_req = req.request().clone();

        let span = tracing::info_span!("request", method = %method, path = %path);
        let fut = self.service.call(req);

        Box::pin(async move {
            let start = Instant::now();
            let result = fut.instrument(span).await;
            let elapsed = start.elapsed();

            match result {
                Ok(mut res) => {
                    let status = res.status();
                    let request_id = extensions_request_id(&http_req);
                    let user = http_req
                        .extensions()
                        .get::<RequestIdentity>()
                        .and_then(|identity| identity.user_id().map(|id| id.to_string()));

                    if let Ok(value) =
                        HeaderValue::from_str(&format!("{:.6}", elapsed.as_secs_f64()))
                    {
                        res.headers_mut()
                            .insert(HeaderName::from_static("x-process-time"), value);
                    }

                    let line = format!(
                        "Request processed: method={} path={} status={} duration={:.4}s request_id={} user={} client={} user_agent={}",
                        method,
                        path,
                        status.as_u16(),
                        elapsed.as_secs_f64(),
                        request_id,
                        user.as_deref().unwrap_or("anonymous"),
                        client.as_deref().unwrap_or("unknown"),
                        user_agent.as_deref().unwrap_or("unknown"),
                    );
                    if status.is_server_error() {
                        log::error!("{}", line);
                    } else if status.is_client_error() {
                        log::warn!("{}", line);
                    } else {
                        log::info!("{}", line);
                    }

                    Ok(res.map_into_left_body())
                }
                Err(e) => {
                    let request_id = extensions_request_id(&http_req);
                    let status = e.as_response_error().status_code();

                    if status.is_server_error() {
                        // Internal failures: log the cause, return a generic
                        // body — the error text stays on the server.
                        log::error!(
                            "Request failed: method={} path={} duration={:.4}s request_id={} error={}",
                            method,
                            path,
                            elapsed.as_secs_f64(),
                            request_id,
                            e
                        );
                        let response = HttpResponse::InternalServerError().json(json!({
                            "detail": "Internal Server Error",
                            "request_id": request_id,
                            "code": "INTERNAL_ERROR",
                        }));
                        Ok(ServiceResponse::new(http_req, response).map_into_right_body())
                    } else {
                        // Client-class errors (extractor rejections and the
                        // like) keep their own status and body.
                        log::warn!(
                            "Request rejected: method={} path={} status={} request_id={} error={}",
                            method,
                            path,
                            status.as_u16(),
                            request_id,
                            e
                        );
                        let response = e.as_response_error().error_response();
                        Ok(ServiceResponse::new(http_req, response).map_into_right_body())
                    }
                }
            }
        })
    }
}

fn extensions_request_id(req: &actix_web::HttpRequest) -> String {
    req.extensions()
        .get::<RequestId>()
        .map(|id| id.as_str().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}
