//! Compiled governance policies and the reloadable handle.
//!
//! [`GovernancePolicies`] is the immutable, request-facing form of the
//! `[governance]` config section: rule regexes compiled once, defaults
//! denormalized, the sanitizer allow-list materialized. Middleware never
//! reads raw settings.
//!
//! [`PolicyHandle`] owns the current snapshot behind an atomic pointer.
//! Each request loads the snapshot once and works against it for its whole
//! lifetime; operational reconfiguration goes through [`PolicyHandle::reload`],
//! which compiles a fresh snapshot and swaps it in with a version bump.
//! There is no field-level runtime mutation anywhere.

use crate::error::PolicyError;
use crate::headers::{HeaderOverride, SecurityHeaderPolicy};
use crate::resolver::{resolve, CompiledRule};
use crate::sanitize::Sanitizer;
use crate::validation::ValidationPolicy;
use arc_swap::ArcSwap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use warden_configs::GovernanceSettings;

/// One immutable snapshot of every governance policy.
#[derive(Debug, Clone)]
pub struct GovernancePolicies {
    timeout_rules: Vec<CompiledRule<u64>>,
    default_timeout_secs: u64,
    size_rules: Vec<CompiledRule<u64>>,
    default_size_limit: u64,
    pub headers: SecurityHeaderPolicy,
    pub validation: ValidationPolicy,
    pub sanitizer: Sanitizer,
}

impl GovernancePolicies {
    /// Compile raw settings into a snapshot. Fails on the first invalid
    /// pattern — a bad rule should stop startup/reload, not silently vanish.
    pub fn compile(settings: &GovernanceSettings) -> Result<Self, PolicyError> {
        let timeout_rules = settings
            .timeout_rules
            .iter()
            .map(|rule| {
                CompiledRule::new(&rule.path_pattern, rule.method.as_deref(), rule.timeout_secs)
            })
            .collect::<Result<Vec<_>, _>>()?;

        let size_rules = settings
            .size_limit_rules
            .iter()
            .map(|rule| {
                CompiledRule::new(&rule.path_pattern, rule.method.as_deref(), rule.limit_bytes)
            })
            .collect::<Result<Vec<_>, _>>()?;

        let header_overrides = settings
            .security_headers
            .overrides
            .iter()
            .map(|rule| {
                CompiledRule::new(
                    &rule.path_pattern,
                    None,
                    HeaderOverride {
                        x_frame_options: rule.x_frame_options.clone(),
                        content_security_policy: rule.content_security_policy.clone(),
                        permissions_policy: rule.permissions_policy.clone(),
                    },
                )
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            timeout_rules,
            default_timeout_secs: settings.request_timeout_secs,
            size_rules,
            default_size_limit: settings.max_upload_size,
            headers: SecurityHeaderPolicy::new(&settings.security_headers, header_overrides),
            validation: ValidationPolicy::from(&settings.validation),
            sanitizer: Sanitizer::from_settings(&settings.sanitizer),
        })
    }

    /// Effective handler deadline for this request.
    pub fn timeout_for(&self, path: &str, method: &str) -> Duration {
        let secs = resolve(&self.timeout_rules, path, method, &self.default_timeout_secs);
        Duration::from_secs(*secs)
    }

    /// Effective body-size ceiling for this request, in bytes.
    pub fn size_limit_for(&self, path: &str, method: &str) -> u64 {
        *resolve(&self.size_rules, path, method, &self.default_size_limit)
    }
}

/// Shared, versioned access to the current policy snapshot.
pub struct PolicyHandle {
    current: ArcSwap<GovernancePolicies>,
    version: AtomicU64,
}

impl PolicyHandle {
    pub fn new(policies: GovernancePolicies) -> Self {
        Self {
            current: ArcSwap::from_pointee(policies),
            version: AtomicU64::new(1),
        }
    }

    pub fn compile(settings: &GovernanceSettings) -> Result<Self, PolicyError> {
        Ok(Self::new(GovernancePolicies::compile(settings)?))
    }

    /// The snapshot to use for one request. Cheap (single atomic load).
    pub fn load(&self) -> Arc<GovernancePolicies> {
        self.current.load_full()
    }

    /// Compile and install a new snapshot. Returns the new version number.
    /// In-flight requests keep the snapshot they started with.
    pub fn reload(&self, settings: &GovernanceSettings) -> Result<u64, PolicyError> {
        let fresh = GovernancePolicies::compile(settings)?;
        self.current.store(Arc::new(fresh));
        let version = self.version.fetch_add(1, Ordering::SeqCst) + 1;
        log::info!("Governance policies reloaded (version {})", version);
        Ok(version)
    }

    pub fn version(&self) -> u64 {
        self.version.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use warden_configs::{SizeLimitRule, TimeoutRule};

    fn settings() -> GovernanceSettings {
        let mut settings = GovernanceSettings::default();
        settings.timeout_rules = vec![TimeoutRule {
            path_pattern: "^/slow".to_string(),
            method: None,
            timeout_secs: 30,
        }];
        settings.size_limit_rules = vec![SizeLimitRule {
            path_pattern: "^/upload".to_string(),
            method: Some("POST".to_string()),
            limit_bytes: 50_000_000,
        }];
        settings
    }

    #[test]
    fn test_compiled_resolution() {
        let policies = GovernancePolicies::compile(&settings()).unwrap();
        assert_eq!(policies.timeout_for("/slow/report", "GET"), Duration::from_secs(30));
        assert_eq!(policies.timeout_for("/fast", "GET"), Duration::from_secs(10));
        assert_eq!(policies.size_limit_for("/upload", "POST"), 50_000_000);
        assert_eq!(policies.size_limit_for("/upload", "GET"), 10_000_000);
    }

    #[test]
    fn test_invalid_pattern_fails_compile() {
        let mut bad = settings();
        bad.timeout_rules[0].path_pattern = "([".to_string();
        assert!(GovernancePolicies::compile(&bad).is_err());
    }

    #[test]
    fn test_reload_bumps_version_and_swaps() {
        let handle = PolicyHandle::compile(&settings()).unwrap();
        assert_eq!(handle.version(), 1);
        let before = handle.load();
        assert_eq!(before.timeout_for("/slow", "GET"), Duration::from_secs(30));

        let mut updated = settings();
        updated.timeout_rules[0].timeout_secs = 99;
        let version = handle.reload(&updated).unwrap();
        assert_eq!(version, 2);
        assert_eq!(handle.load().timeout_for("/slow", "GET"), Duration::from_secs(99));
        // The old snapshot is untouched — in-flight requests are unaffected.
        assert_eq!(before.timeout_for("/slow", "GET"), Duration::from_secs(30));
    }

    #[test]
    fn test_failed_reload_keeps_previous_snapshot() {
        let handle = PolicyHandle::compile(&settings()).unwrap();
        let mut bad = settings();
        bad.size_limit_rules[0].path_pattern = "([".to_string();
        assert!(handle.reload(&bad).is_err());
        assert_eq!(handle.version(), 1);
        assert_eq!(handle.load().size_limit_for("/upload", "POST"), 50_000_000);
    }
}
