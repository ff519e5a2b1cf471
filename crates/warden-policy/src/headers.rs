//! Security response-header policy.
//!
//! Computes the effective protective headers for a response: the
//! first-matching per-path override wins per field, anything unset falls
//! back to the global defaults, and HSTS is emitted only when the request
//! is (or must be treated as) HTTPS.

use crate::resolver::{resolve, CompiledRule};
use warden_configs::SecurityHeaderSettings;

/// Per-path override values; `None` fields fall back to the defaults.
#[derive(Debug, Clone, Default)]
pub struct HeaderOverride {
    pub x_frame_options: Option<String>,
    pub content_security_policy: Option<String>,
    pub permissions_policy: Option<String>,
}

/// Compiled header policy.
#[derive(Debug, Clone)]
pub struct SecurityHeaderPolicy {
    overrides: Vec<CompiledRule<HeaderOverride>>,
    defaults: SecurityHeaderSettings,
    hsts_value: String,
}

/// The headers to attach to one response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EffectiveHeaders {
    pub x_frame_options: String,
    pub content_security_policy: String,
    pub permissions_policy: String,
    /// `None` when HSTS must not be sent for this request.
    pub strict_transport_security: Option<String>,
}

impl SecurityHeaderPolicy {
    pub fn new(
        settings: &SecurityHeaderSettings,
        overrides: Vec<CompiledRule<HeaderOverride>>,
    ) -> Self {
        let mut hsts_value = format!("max-age={}", settings.hsts_max_age);
        if settings.hsts_include_subdomains {
            hsts_value.push_str("; includeSubDomains");
        }
        if settings.hsts_preload {
            hsts_value.push_str("; preload");
        }
        Self {
            overrides,
            defaults: settings.clone(),
            hsts_value,
        }
    }

    pub fn force_https(&self) -> bool {
        self.defaults.force_https
    }

    /// Resolve the effective header set for `(path, is_https)`.
    pub fn effective(&self, path: &str, is_https: bool) -> EffectiveHeaders {
        // Header overrides ignore the request method; resolve with a fixed
        // value so the shared first-match logic applies unchanged.
        let none = HeaderOverride::default();
        let matched = resolve(&self.overrides, path, "GET", &none);

        let strict_transport_security = if self.defaults.force_https || is_https {
            Some(self.hsts_value.clone())
        } else {
            None
        };

        EffectiveHeaders {
            x_frame_options: matched
                .x_frame_options
                .clone()
                .unwrap_or_else(|| self.defaults.x_frame_options.clone()),
            content_security_policy: matched
                .content_security_policy
                .clone()
                .unwrap_or_else(|| self.defaults.content_security_policy.clone()),
            permissions_policy: matched
                .permissions_policy
                .clone()
                .unwrap_or_else(|| self.defaults.permissions_policy.clone()),
            strict_transport_security,
        }
    }
}
