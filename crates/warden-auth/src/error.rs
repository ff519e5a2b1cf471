//! Authentication error taxonomy.
//!
//! Variants stay fine-grained for internal logging; the HTTP layer
//! deliberately collapses most of them into one uniform 401 so a caller
//! cannot distinguish a revoked token from a malformed or expired one.

/// Errors produced by authentication operations.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Invalid credentials: {0}")]
    InvalidCredentials(String),

    #[error("User not found: {0}")]
    UserNotFound(String),

    #[error("Token expired")]
    TokenExpired,

    #[error("Invalid token signature")]
    InvalidSignature,

    #[error("Malformed authorization: {0}")]
    MalformedAuthorization(String),

    #[error("Missing authorization: {0}")]
    MissingAuthorization(String),

    #[error("Missing claim: {0}")]
    MissingClaim(String),

    #[error("Weak password: {0}")]
    WeakPassword(String),

    #[error("Invalid email address: {0}")]
    InvalidEmail(String),

    #[error("The identity provider supplied no email address")]
    EmailRequired,

    #[error("Already exists: {0}")]
    AlreadyExists(String),

    #[error("Hashing error: {0}")]
    HashingError(String),

    #[error("Store error: {0}")]
    StoreError(String),
}

pub type AuthResult<T> = Result<T, AuthError>;

impl From<warden_kv::KvError> for AuthError {
    fn from(e: warden_kv::KvError) -> Self {
        AuthError::StoreError(e.to_string())
    }
}
