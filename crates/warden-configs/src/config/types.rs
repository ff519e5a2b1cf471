//! Configuration types.
//!
//! Every section carries serde defaults so a partial `config.toml` (or none
//! at all) still produces a runnable configuration.

use super::defaults::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Main server configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
    #[serde(default, alias = "authentication")]
    pub auth: AuthSettings,
    #[serde(default)]
    pub session: SessionSettings,
    #[serde(default)]
    pub governance: GovernanceSettings,
    #[serde(default)]
    pub security: SecuritySettings,
    #[serde(default)]
    pub federated: FederatedSettings,
    #[serde(default)]
    pub kv: KvSettings,
}

/// Bind address and worker pool.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_workers")]
    pub workers: usize,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            workers: default_workers(),
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_logs_path")]
    pub logs_path: String,
    #[serde(default = "default_true")]
    pub log_to_console: bool,
    /// "compact" or "json"
    #[serde(default = "default_log_format")]
    pub format: String,
    /// Per-target level overrides, e.g. `warden_api = "debug"`
    #[serde(default)]
    pub targets: HashMap<String, String>,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            logs_path: default_logs_path(),
            log_to_console: true,
            format: default_log_format(),
            targets: HashMap::new(),
        }
    }
}

/// Token issuance and validation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthSettings {
    /// HMAC secret for internally issued tokens.
    #[serde(default = "default_jwt_secret")]
    pub jwt_secret: String,
    /// `iss` claim stamped on issued tokens.
    #[serde(default = "default_jwt_issuer")]
    pub jwt_issuer: String,
    /// Access token lifetime in seconds.
    #[serde(default = "default_access_token_ttl_secs")]
    pub access_token_ttl_secs: u64,
    /// Refresh token lifetime in seconds.
    #[serde(default = "default_refresh_token_ttl_secs")]
    pub refresh_token_ttl_secs: u64,
    /// Respond with `X-Token-Expiring-Soon` when a presented token expires
    /// within this window.
    #[serde(default = "default_refresh_hint_window_secs")]
    pub refresh_hint_window_secs: u64,
}

impl Default for AuthSettings {
    fn default() -> Self {
        Self {
            jwt_secret: default_jwt_secret(),
            jwt_issuer: default_jwt_issuer(),
            access_token_ttl_secs: default_access_token_ttl_secs(),
            refresh_token_ttl_secs: default_refresh_token_ttl_secs(),
            refresh_hint_window_secs: default_refresh_hint_window_secs(),
        }
    }
}

/// Server-side session settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSettings {
    /// TTL of the stored session record.
    #[serde(default = "default_session_ttl_secs")]
    pub ttl_secs: u64,
    /// Max-Age of the `session_id` cookie. Deliberately longer than the
    /// record TTL: an outlived cookie simply reads as an absent session.
    #[serde(default = "default_session_cookie_max_age_secs")]
    pub cookie_max_age_secs: u64,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            ttl_secs: default_session_ttl_secs(),
            cookie_max_age_secs: default_session_cookie_max_age_secs(),
        }
    }
}

/// A timeout rule: first start-anchored pattern match wins.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeoutRule {
    pub path_pattern: String,
    /// `None` matches all methods.
    #[serde(default)]
    pub method: Option<String>,
    pub timeout_secs: u64,
}

/// A body-size rule: first start-anchored pattern match wins.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SizeLimitRule {
    pub path_pattern: String,
    #[serde(default)]
    pub method: Option<String>,
    pub limit_bytes: u64,
}

/// Per-path override for the protective response headers. Unset fields fall
/// back to the global defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeaderOverrideRule {
    pub path_pattern: String,
    #[serde(default)]
    pub x_frame_options: Option<String>,
    #[serde(default)]
    pub content_security_policy: Option<String>,
    #[serde(default)]
    pub permissions_policy: Option<String>,
}

/// Request-governance settings: timeouts, size limits, validation,
/// sanitization, and security headers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GovernanceSettings {
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default)]
    pub timeout_rules: Vec<TimeoutRule>,

    #[serde(default = "default_max_upload_size")]
    pub max_upload_size: u64,
    #[serde(default)]
    pub size_limit_rules: Vec<SizeLimitRule>,

    #[serde(default)]
    pub validation: ValidationSettings,
    #[serde(default)]
    pub sanitizer: SanitizerSettings,
    #[serde(default)]
    pub security_headers: SecurityHeaderSettings,
}

impl Default for GovernanceSettings {
    fn default() -> Self {
        Self {
            request_timeout_secs: default_request_timeout_secs(),
            timeout_rules: Vec::new(),
            max_upload_size: default_max_upload_size(),
            size_limit_rules: Vec::new(),
            validation: ValidationSettings::default(),
            sanitizer: SanitizerSettings::default(),
            security_headers: SecurityHeaderSettings::default(),
        }
    }
}

/// Query/body validation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationSettings {
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Reject parameters on paths that declare no schema.
    #[serde(default = "default_true")]
    pub strict_mode: bool,
    #[serde(default = "default_validation_excluded_paths")]
    pub excluded_paths: Vec<String>,
    #[serde(default = "default_max_json_depth")]
    pub max_json_depth: usize,
}

impl Default for ValidationSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            strict_mode: true,
            excluded_paths: default_validation_excluded_paths(),
            max_json_depth: default_max_json_depth(),
        }
    }
}

/// HTML allow-list used when cleaning string inputs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SanitizerSettings {
    #[serde(default = "default_allowed_tags")]
    pub allowed_tags: Vec<String>,
    #[serde(default = "default_allowed_attributes")]
    pub allowed_attributes: HashMap<String, Vec<String>>,
}

impl Default for SanitizerSettings {
    fn default() -> Self {
        Self {
            allowed_tags: default_allowed_tags(),
            allowed_attributes: default_allowed_attributes(),
        }
    }
}

/// Protective response-header settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityHeaderSettings {
    #[serde(default = "default_x_frame_options")]
    pub x_frame_options: String,
    #[serde(default = "default_content_security_policy")]
    pub content_security_policy: String,
    #[serde(default = "default_permissions_policy")]
    pub permissions_policy: String,
    /// Send HSTS even on plain-HTTP requests (the deployment terminates TLS
    /// upstream) and mark cookies Secure.
    #[serde(default)]
    pub force_https: bool,
    #[serde(default = "default_hsts_max_age")]
    pub hsts_max_age: u64,
    #[serde(default = "default_true")]
    pub hsts_include_subdomains: bool,
    #[serde(default)]
    pub hsts_preload: bool,
    #[serde(default)]
    pub overrides: Vec<HeaderOverrideRule>,
}

impl Default for SecurityHeaderSettings {
    fn default() -> Self {
        Self {
            x_frame_options: default_x_frame_options(),
            content_security_policy: default_content_security_policy(),
            permissions_policy: default_permissions_policy(),
            force_https: false,
            hsts_max_age: default_hsts_max_age(),
            hsts_include_subdomains: true,
            hsts_preload: false,
            overrides: Vec::new(),
        }
    }
}

/// CORS configuration mapped onto actix-cors options.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorsSettings {
    /// Empty list = allow any origin.
    #[serde(default)]
    pub allowed_origins: Vec<String>,
    #[serde(default = "default_cors_methods")]
    pub allowed_methods: Vec<String>,
    #[serde(default = "default_cors_headers")]
    pub allowed_headers: Vec<String>,
    #[serde(default = "default_true")]
    pub allow_credentials: bool,
    #[serde(default = "default_cors_max_age")]
    pub max_age: u64,
}

impl Default for CorsSettings {
    fn default() -> Self {
        Self {
            allowed_origins: Vec::new(),
            allowed_methods: default_cors_methods(),
            allowed_headers: default_cors_headers(),
            allow_credentials: true,
            max_age: default_cors_max_age(),
        }
    }
}

/// Host allow-list and CORS.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecuritySettings {
    #[serde(default = "default_allowed_hosts")]
    pub allowed_hosts: Vec<String>,
    #[serde(default)]
    pub cors: CorsSettings,
}

impl Default for SecuritySettings {
    fn default() -> Self {
        Self {
            allowed_hosts: default_allowed_hosts(),
            cors: CorsSettings::default(),
        }
    }
}

/// Federated identity provider settings.
///
/// A provider with no client id configured is disabled; login attempts
/// against it fail cleanly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FederatedSettings {
    #[serde(default)]
    pub google_client_id: Option<String>,
    #[serde(default = "default_google_issuers")]
    pub google_issuers: Vec<String>,
    #[serde(default = "default_google_jwks_uri")]
    pub google_jwks_uri: String,

    #[serde(default)]
    pub apple_client_id: Option<String>,
    #[serde(default = "default_apple_issuer")]
    pub apple_issuer: String,
    #[serde(default = "default_apple_jwks_uri")]
    pub apple_jwks_uri: String,

    #[serde(default = "default_facebook_graph_url")]
    pub facebook_graph_url: String,

    /// Deadline for any outbound provider call (JWKS fetch, profile fetch).
    #[serde(default = "default_provider_http_timeout_secs")]
    pub http_timeout_secs: u64,
}

impl Default for FederatedSettings {
    fn default() -> Self {
        Self {
            google_client_id: None,
            google_issuers: default_google_issuers(),
            google_jwks_uri: default_google_jwks_uri(),
            apple_client_id: None,
            apple_issuer: default_apple_issuer(),
            apple_jwks_uri: default_apple_jwks_uri(),
            facebook_graph_url: default_facebook_graph_url(),
            http_timeout_secs: default_provider_http_timeout_secs(),
        }
    }
}

/// Key-value store client settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KvSettings {
    /// Deadline for a single store operation, composed under the request
    /// timeout.
    #[serde(default = "default_kv_op_timeout_ms")]
    pub op_timeout_ms: u64,
}

impl Default for KvSettings {
    fn default() -> Self {
        Self {
            op_timeout_ms: default_kv_op_timeout_ms(),
        }
    }
}
