//! # warden-oidc
//!
//! Federated identity verification.
//!
//! A closed set of providers (Google, Apple, Facebook) each turn an
//! external credential into a stable `(subject, email)` pair. Token-based
//! providers are verified against the issuer's published JWKS — full
//! signature verification, always; claims are never trusted without it.
//!
//! Verification runs once per login event. The result is persisted into a
//! session or token; nothing here sits on the per-request hot path.

pub mod claims;
pub mod error;
pub mod provider;
pub mod validator;

pub use claims::{AppleClaims, GoogleClaims};
pub use error::OidcError;
pub use provider::{FederatedVerifier, IdentityProvider, VerifiedIdentity};
pub use validator::{IssuerConfig, JwksValidator};
