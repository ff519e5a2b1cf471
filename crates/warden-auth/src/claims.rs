// Token claim definitions shared by issuance, validation, and the auth
// resolver.

use serde::{Deserialize, Serialize};

/// Token type for distinguishing access from refresh tokens.
///
/// Stored in the `token_type` claim so a refresh token can never be used
/// for request authentication.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    Access,
    Refresh,
}

impl std::fmt::Display for TokenType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TokenType::Access => write!(f, "access"),
            TokenType::Refresh => write!(f, "refresh"),
        }
    }
}

/// Claims carried by a signed bearer token.
///
/// `sub`, `exp`, and `jti` are always present on issued tokens; `jti` is
/// what the revocation list keys on.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Subject (user id)
    pub sub: String,
    /// Issuer
    pub iss: String,
    /// Unique token identifier (revocation key)
    pub jti: String,
    /// Expiration time (Unix timestamp seconds)
    pub exp: usize,
    /// Issued at (Unix timestamp seconds)
    pub iat: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
    /// Optional for compatibility with tokens issued before this field
    /// existed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_type: Option<TokenType>,
}

impl TokenClaims {
    /// Seconds until expiry, clamped at zero.
    pub fn remaining_secs(&self) -> u64 {
        let now = chrono::Utc::now().timestamp();
        (self.exp as i64 - now).max(0) as u64
    }
}

/// Caller-supplied claim set for token issuance.
///
/// The service injects `jti` (when absent), `exp`, `iat`, and `iss`;
/// everything here is copied through untouched.
#[derive(Debug, Clone, Default)]
pub struct ClaimSpec {
    pub sub: String,
    pub email: Option<String>,
    pub scope: Option<String>,
    /// Explicit unique id; a random one is generated when `None`.
    pub jti: Option<String>,
    pub token_type: Option<TokenType>,
}

impl ClaimSpec {
    pub fn new(sub: impl Into<String>) -> Self {
        Self {
            sub: sub.into(),
            ..Default::default()
        }
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn with_scope(mut self, scope: impl Into<String>) -> Self {
        self.scope = Some(scope.into());
        self
    }

    pub fn with_token_type(mut self, token_type: TokenType) -> Self {
        self.token_type = Some(token_type);
        self
    }
}
