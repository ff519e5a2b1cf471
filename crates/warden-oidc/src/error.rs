/// Errors produced by federated identity verification.
#[derive(Debug, thiserror::Error)]
pub enum OidcError {
    /// The provider is not configured (no client id).
    #[error("Provider '{0}' is not configured")]
    ProviderDisabled(&'static str),

    /// JWKS fetch or parse failed.
    #[error("JWKS fetch failed: {0}")]
    JwksFetchFailed(String),

    /// Token is missing the `kid` header required for key lookup.
    #[error("Token is missing the 'kid' header")]
    MissingKid,

    /// No key with the given `kid` was found in the issuer's JWKS.
    #[error("No key found for kid '{0}'")]
    KeyNotFound(String),

    /// The JWK could not be converted to a decoding key.
    #[error("Invalid JWK format: {0}")]
    InvalidKeyFormat(String),

    /// JWT decode / signature verification / claims validation failed.
    #[error("Credential validation failed: {0}")]
    ValidationFailed(String),

    /// The provider's profile endpoint rejected the credential.
    #[error("Provider rejected the credential: {0}")]
    CredentialRejected(String),

    /// Network failure talking to the provider.
    #[error("Provider request failed: {0}")]
    RequestFailed(String),
}

impl From<jsonwebtoken::errors::Error> for OidcError {
    fn from(e: jsonwebtoken::errors::Error) -> Self {
        use jsonwebtoken::errors::ErrorKind;
        match e.kind() {
            ErrorKind::ExpiredSignature => OidcError::ValidationFailed("Token expired".into()),
            ErrorKind::InvalidSignature => OidcError::ValidationFailed("Invalid signature".into()),
            ErrorKind::InvalidAudience => OidcError::ValidationFailed("Invalid audience".into()),
            ErrorKind::InvalidIssuer => OidcError::ValidationFailed("Invalid issuer".into()),
            ErrorKind::InvalidToken => OidcError::ValidationFailed("Invalid token".into()),
            _ => OidcError::ValidationFailed(e.to_string()),
        }
    }
}
