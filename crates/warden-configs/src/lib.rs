//! # warden-configs
//!
//! Typed configuration for the Warden server.
//!
//! All settings deserialize from a single `config.toml` with serde defaults,
//! so a missing section or field falls back to a safe value instead of
//! failing startup. The raw settings here are plain data; the compiled,
//! request-facing form (regex rule sets, header snapshots) lives in
//! `warden-policy`.

pub mod config;

pub use config::defaults;
pub use config::loader::{ConfigError, load_from_file, load_from_str};
pub use config::types::{
    AuthSettings, CorsSettings, FederatedSettings, GovernanceSettings, HeaderOverrideRule,
    KvSettings, LoggingSettings, SanitizerSettings, SecurityHeaderSettings, SecuritySettings,
    ServerConfig, ServerSettings, SessionSettings, SizeLimitRule, TimeoutRule, ValidationSettings,
};
