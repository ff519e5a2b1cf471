//! # warden-policy
//!
//! The request-governance policy engine.
//!
//! Raw settings from `warden-configs` are compiled here into the immutable,
//! request-facing form: anchored regex rule sets for timeout/size/header
//! resolution, the sanitizer allow-list, and per-path parameter schemas.
//! Middleware reads one [`engine::GovernancePolicies`] snapshot per request
//! through a [`engine::PolicyHandle`]; runtime reconfiguration is a single
//! versioned swap, never field-level mutation.

pub mod engine;
pub mod error;
pub mod headers;
pub mod resolver;
pub mod sanitize;
pub mod validation;

pub use engine::{GovernancePolicies, PolicyHandle};
pub use error::PolicyError;
pub use headers::{EffectiveHeaders, HeaderOverride, SecurityHeaderPolicy};
pub use resolver::{resolve, CompiledRule};
pub use sanitize::Sanitizer;
pub use validation::{FieldKind, FieldSpec, ParamSchema, SchemaRegistry, ValidationPolicy};
