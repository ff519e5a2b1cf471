//! Input sanitization and parameter validation.
//!
//! Query parameters are cleaned against the allow-list and validated
//! against the path's declared schema; the sanitized set then REPLACES the
//! request's query string, so handlers never see raw input. JSON bodies are
//! depth-checked first (rejecting adversarial nesting before any cleaning
//! work), sanitized leaf-by-leaf, and re-injected as the request payload.
//!
//! Strict mode refuses parameters on paths that declare no schema.

use actix_http::h1;
use actix_web::body::{BoxBody, EitherBody};
use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::header::{self, HeaderValue};
use actix_web::http::uri::{PathAndQuery, Uri};
use actix_web::http::Method;
use actix_web::web::{Bytes, BytesMut};
use actix_web::{Error, HttpMessage, HttpResponse};
use futures_util::future::LocalBoxFuture;
use futures_util::StreamExt;
use serde_json::Value;
use std::future::{ready, Ready};
use std::rc::Rc;
use std::sync::Arc;
use warden_policy::{PolicyHandle, Sanitizer, SchemaRegistry};

use super::request_id_of;

/// Validation middleware factory.
pub struct RequestValidation {
    policies: Arc<PolicyHandle>,
    schemas: Arc<SchemaRegistry>,
}

impl RequestValidation {
    pub fn new(policies: Arc<PolicyHandle>, schemas: Arc<SchemaRegistry>) -> Self {
        Self { policies, schemas }
    }
}

impl<S, B> Transform<S, ServiceRequest> for RequestValidation
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B, BoxBody>>;
    type Error = Error;
    type InitError = ();
    type Transform = RequestValidationService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequestValidationService {
            service: Rc::new(service),
            policies: self.policies.clone(),
            schemas: self.schemas.clone(),
        }))
    }
}

pub struct RequestValidationService<S> {
    service: Rc<S>,
    policies: Arc<PolicyHandle>,
    schemas: Arc<SchemaRegistry>,
}

impl<S, B> Service<ServiceRequest> for RequestValidationService<S>
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
        let service = Rc::clone(&self.service);
        let policies = self.policies.load();
        let schemas = self.schemas.clone();

        Box::pin(async move {
            let mut req = req;
            let validation = &policies.validation;
            if !validation.enabled || validation.is_excluded(req.path()) {
                return Ok(service.call(req).await?.map_into_left_body());
            }

            let path = req.path().to_string();
            let method = req.method().clone();

            // ── Query parameters ────────────────────────────────────────
            let raw_query = req.query_string().to_string();
            if !raw_query.is_empty() {
                let pairs: Vec<(String, String)> = match serde_urlencoded::from_str(&raw_query) {
                    Ok(pairs) => pairs,
                    Err(e) => {
                        log_violation(&req, "query_parsing_error", &e.to_string());
                        return Ok(reject(req, "Invalid request parameters"));
                    }
                };

                let sanitized = policies.sanitizer.sanitize_query(&pairs);

                match schemas.get(&path) {
                    Some(schema) => {
                        if let Err(e) = schema.validate(&sanitized) {
                            log_violation(&req, "query_validation_error", &e.to_string());
                            return Ok(reject(req, "Invalid request parameters"));
                        }
                    }
                    None if validation.strict_mode => {
                        log_violation(
                            &req,
                            "strict_mode_violation",
                            &format!("No validation schema declared for {}", path),
                        );
                        return Ok(reject(req, "Invalid request parameters"));
                    }
                    None => {}
                }

                // Downstream handlers must only ever see the sanitized set.
                match serde_urlencoded::to_string(&sanitized) {
                    Ok(encoded) => {
                        if encoded != raw_query {
                            rewrite_query(&mut req, &path, &encoded);
                        }
                    }
                    Err(e) => {
                        log_violation(&req, "query_encoding_error", &e.to_string());
                        return Ok(reject(req, "Invalid request parameters"));
                    }
                }
            }

            // ── JSON body ───────────────────────────────────────────────
            let is_json = req
                .headers()
                .get(header::CONTENT_TYPE)
                .and_then(|value| value.to_str().ok())
                .map(|ct| ct.contains("application/json"))
                .unwrap_or(false);

            let mutating = method == Method::POST || method == Method::PUT || method == Method::PATCH;
            if is_json && mutating {
                let mut payload = req.take_payload();
                let mut body = BytesMut::new();
                let mut read_error = None;
                while let Some(chunk) = payload.next().await {
                    match chunk {
                        Ok(chunk) => body.extend_from_slice(&chunk),
                        Err(e) => {
                            read_error = Some(e.to_string());
                            break;
                        }
                    }
                }
                if let Some(e) = read_error {
                    log_violation(&req, "body_read_error", &e);
                    return Ok(reject(req, "Invalid request body"));
                }

                if !body.is_empty() {
                    let parsed: Value = match serde_json::from_slice(&body) {
                        Ok(value) => value,
                        Err(_) => {
                            log_violation(&req, "body_parsing_error", "Invalid JSON body");
                            return Ok(reject(req, "Invalid request body"));
                        }
                    };

                    // Depth first: never pay for sanitizing hostile nesting
                    if let Err(e) = Sanitizer::check_depth(&parsed, validation.max_json_depth) {
                        log_violation(&req, "body_validation_error", &e.to_string());
                        return Ok(reject(req, "Invalid request body"));
                    }

                    let sanitized = policies.sanitizer.sanitize_json(&parsed);
                    let bytes = match serde_json::to_vec(&sanitized) {
                        Ok(bytes) => bytes,
                        Err(e) => {
                            log_violation(&req, "body_processing_error", &e.to_string());
                            return Ok(reject(req, "Invalid request body"));
                        }
                    };

                    req.headers_mut().insert(header::CONTENT_LENGTH, HeaderValue::from(bytes.len()));
                    replace_payload(&mut req, Bytes::from(bytes));
                } else {
                    replace_payload(&mut req, Bytes::new());
                }
            }

            Ok(service.call(req).await?.map_into_left_body())
        })
    }
}

/// Swap in a fresh single-shot payload holding `bytes`.
fn replace_payload(req: &mut ServiceRequest, bytes: Bytes) {
    let (_, mut payload) = h1::Payload::create(true);
    payload.unread_data(bytes);
    req.set_payload(payload.into());
}

/// Replace the request's query string in place.
fn rewrite_query(req: &mut ServiceRequest, path: &str, encoded: &str) {
    let target = if encoded.is_empty() {
        path.to_string()
    } else {
        format!("{}?{}", path, encoded)
    };
    let mut parts = req.head().uri.clone().into_parts();
    match PathAndQuery::from_maybe_shared(target) {
        Ok(paq) => {
            parts.path_and_query = Some(paq);
            match Uri::from_parts(parts) {
                Ok(uri) => req.head_mut().uri = uri,
                Err(e) => log::warn!("Could not rebuild sanitized URI: {}", e),
            }
        }
        Err(e) => log::warn!("Could not encode sanitized query: {}", e),
    }
}

fn reject<B>(req: ServiceRequest, message: &str) -> ServiceResponse<EitherBody<B, BoxBody>> {
    let response = HttpResponse::BadRequest()
        .content_type("text/plain; charset=utf-8")
        .body(message.to_string());
    req.into_response(response).map_into_right_body()
}

fn log_violation(req: &ServiceRequest, violation_type: &str, details: &str) {
    log::warn!(
        "[VALIDATION] {}: method={} path={} request_id={} client={} details={}",
        violation_type,
        req.method(),
        req.path(),
        request_id_of(req),
        req.connection_info().realip_remote_addr().unwrap_or("unknown"),
        details
    );
}
