// Claim shapes returned by the token-based providers.

use serde::Deserialize;

/// Claims of a Google ID token (the subset Warden consumes).
#[derive(Debug, Clone, Deserialize)]
pub struct GoogleClaims {
    /// Google's stable unique user id
    pub sub: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub email_verified: Option<bool>,
}

/// Claims of an Apple identity token (the subset Warden consumes).
///
/// Apple only includes `email` when the email scope was requested; first
/// party sign-in flows may omit it entirely.
#[derive(Debug, Clone, Deserialize)]
pub struct AppleClaims {
    pub sub: String,
    #[serde(default)]
    pub email: Option<String>,
}

/// Profile returned by the Facebook Graph API `/me` endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct FacebookProfile {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
}
