//! Default values for configuration fields.
//!
//! Each function backs a `#[serde(default = "...")]` attribute in
//! `types.rs`; keeping them here keeps the type definitions readable.

use std::collections::HashMap;

pub fn default_host() -> String {
    "127.0.0.1".to_string()
}

pub fn default_port() -> u16 {
    8030
}

pub fn default_workers() -> usize {
    std::thread::available_parallelism().map(|n| n.get()).unwrap_or(4)
}

pub fn default_log_level() -> String {
    "info".to_string()
}

pub fn default_logs_path() -> String {
    "./logs".to_string()
}

pub fn default_log_format() -> String {
    "compact".to_string()
}

pub fn default_true() -> bool {
    true
}

// ── Auth ────────────────────────────────────────────────────────────────────

pub fn default_jwt_secret() -> String {
    // Development-only fallback; production deployments set this in config.
    "warden-dev-secret-change-me".to_string()
}

pub fn default_jwt_issuer() -> String {
    "warden".to_string()
}

pub fn default_access_token_ttl_secs() -> u64 {
    86_400 // 24 hours
}

pub fn default_refresh_token_ttl_secs() -> u64 {
    7 * 86_400
}

pub fn default_refresh_hint_window_secs() -> u64 {
    300 // warn clients 5 minutes before expiry
}

// ── Sessions ────────────────────────────────────────────────────────────────

pub fn default_session_ttl_secs() -> u64 {
    86_400 // server-side record lives 24 hours
}

pub fn default_session_cookie_max_age_secs() -> u64 {
    7 * 86_400 // the cookie may outlive the session; stale cookies read as absent
}

// ── Governance ──────────────────────────────────────────────────────────────

pub fn default_request_timeout_secs() -> u64 {
    10
}

pub fn default_max_upload_size() -> u64 {
    10_000_000 // 10 MB
}

pub fn default_max_json_depth() -> usize {
    10
}

pub fn default_validation_excluded_paths() -> Vec<String> {
    vec!["/docs".to_string(), "/redoc".to_string(), "/openapi.json".to_string()]
}

pub fn default_allowed_tags() -> Vec<String> {
    [
        "a", "abbr", "acronym", "b", "blockquote", "code", "em", "i", "li", "ol", "strong",
        "ul", "p", "br",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

pub fn default_allowed_attributes() -> HashMap<String, Vec<String>> {
    let mut attrs = HashMap::new();
    attrs.insert("a".to_string(), vec!["href".to_string(), "title".to_string()]);
    attrs.insert("abbr".to_string(), vec!["title".to_string()]);
    attrs.insert("acronym".to_string(), vec!["title".to_string()]);
    attrs
}

// ── Security headers ────────────────────────────────────────────────────────

pub fn default_x_frame_options() -> String {
    "DENY".to_string()
}

pub fn default_content_security_policy() -> String {
    "default-src 'self'".to_string()
}

pub fn default_permissions_policy() -> String {
    "geolocation=(), microphone=(), camera=()".to_string()
}

pub fn default_hsts_max_age() -> u64 {
    31_536_000 // one year
}

// ── Security (hosts / CORS) ─────────────────────────────────────────────────

pub fn default_allowed_hosts() -> Vec<String> {
    vec!["localhost".to_string(), "127.0.0.1".to_string()]
}

pub fn default_cors_methods() -> Vec<String> {
    ["GET", "POST", "PUT", "DELETE", "PATCH", "OPTIONS"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

pub fn default_cors_headers() -> Vec<String> {
    ["Authorization", "Content-Type", "Accept", "Origin", "X-Requested-With"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

pub fn default_cors_max_age() -> u64 {
    3600
}

// ── Federated providers ─────────────────────────────────────────────────────

pub fn default_google_issuers() -> Vec<String> {
    vec!["accounts.google.com".to_string(), "https://accounts.google.com".to_string()]
}

pub fn default_google_jwks_uri() -> String {
    "https://www.googleapis.com/oauth2/v3/certs".to_string()
}

pub fn default_apple_issuer() -> String {
    "https://appleid.apple.com".to_string()
}

pub fn default_apple_jwks_uri() -> String {
    "https://appleid.apple.com/auth/keys".to_string()
}

pub fn default_facebook_graph_url() -> String {
    "https://graph.facebook.com".to_string()
}

pub fn default_provider_http_timeout_secs() -> u64 {
    5
}

// ── KV store ────────────────────────────────────────────────────────────────

pub fn default_kv_op_timeout_ms() -> u64 {
    2000
}
