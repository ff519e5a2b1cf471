//! Token issuance, validation, and revocation.
//!
//! Tokens are self-contained HS256 JWTs (`header.payload.signature`);
//! validity is signature + expiry + absence from the revocation list.
//! Revocation writes the token's `jti` into the key-value store with a TTL
//! equal to the token's remaining lifetime, so the entry self-expires
//! exactly when the token would have anyway and the list never grows past
//! the set of live tokens.

use crate::claims::{ClaimSpec, TokenClaims, TokenType};
use crate::error::{AuthError, AuthResult};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use std::sync::Arc;
use std::time::Duration;
use warden_kv::{with_deadline, KvStore};

/// Key prefix for revocation entries.
const REVOKED_PREFIX: &str = "revoked:";

/// Issues, validates, and revokes bearer tokens.
pub struct TokenService {
    secret: String,
    issuer: String,
    kv: Arc<dyn KvStore>,
    kv_deadline: Duration,
}

impl TokenService {
    pub fn new(
        secret: impl Into<String>,
        issuer: impl Into<String>,
        kv: Arc<dyn KvStore>,
        kv_deadline: Duration,
    ) -> Self {
        Self {
            secret: secret.into(),
            issuer: issuer.into(),
            kv,
            kv_deadline,
        }
    }

    /// Issue a signed token.
    ///
    /// Copies the caller's claims, injects a random `jti` when none was
    /// supplied, stamps `iat`/`exp`/`iss`, and signs with the server secret.
    pub fn issue(&self, spec: ClaimSpec, ttl: Duration) -> AuthResult<(String, TokenClaims)> {
        let now = chrono::Utc::now().timestamp();
        let claims = TokenClaims {
            sub: spec.sub,
            iss: self.issuer.clone(),
            jti: spec.jti.unwrap_or_else(|| uuid::Uuid::new_v4().to_string()),
            exp: (now + ttl.as_secs() as i64) as usize,
            iat: now as usize,
            email: spec.email,
            scope: spec.scope,
            token_type: spec.token_type.or(Some(TokenType::Access)),
        };

        let header = Header::new(Algorithm::HS256);
        let encoding_key = EncodingKey::from_secret(self.secret.as_bytes());
        let token = encode(&header, &claims, &encoding_key)
            .map_err(|e| AuthError::HashingError(format!("Token encoding error: {}", e)))?;
        Ok((token, claims))
    }

    /// Verify signature, expiry, and issuer; return the claim set.
    ///
    /// Does NOT consult the revocation list — identity resolution must go
    /// through [`TokenService::decode_checked`].
    pub fn decode(&self, token: &str) -> AuthResult<TokenClaims> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = 0;
        validation.set_issuer(&[&self.issuer]);

        let decoding_key = DecodingKey::from_secret(self.secret.as_bytes());
        let data = decode::<TokenClaims>(token, &decoding_key, &validation).map_err(|e| {
            match e.kind() {
                ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                ErrorKind::InvalidSignature => AuthError::InvalidSignature,
                ErrorKind::InvalidIssuer => AuthError::InvalidSignature,
                _ => AuthError::MalformedAuthorization(format!("Token decode error: {}", e)),
            }
        })?;

        let claims = data.claims;
        if claims.sub.is_empty() {
            return Err(AuthError::MissingClaim("sub".to_string()));
        }
        if claims.jti.is_empty() {
            return Err(AuthError::MissingClaim("jti".to_string()));
        }
        Ok(claims)
    }

    /// Full validation for identity resolution: decode, reject refresh
    /// tokens, and check the revocation list.
    ///
    /// A revoked token fails exactly like one with a bad signature so the
    /// response never reveals which it was.
    pub async fn decode_checked(&self, token: &str) -> AuthResult<TokenClaims> {
        let claims = self.decode(token)?;

        if claims.token_type == Some(TokenType::Refresh) {
            log::warn!("Refresh token presented as access token for sub={}", claims.sub);
            return Err(AuthError::InvalidSignature);
        }

        if self.is_revoked(&claims.jti).await? {
            log::warn!("Revoked token presented: jti={} sub={}", claims.jti, claims.sub);
            return Err(AuthError::InvalidSignature);
        }

        Ok(claims)
    }

    /// Add a token id to the revocation list for its remaining lifetime.
    ///
    /// A token that already expired needs no entry — time has revoked it.
    pub async fn revoke(&self, jti: &str, remaining: Duration) -> AuthResult<()> {
        if remaining.is_zero() {
            return Ok(());
        }
        let key = revocation_key(jti);
        with_deadline(self.kv_deadline, self.kv.set_ex(&key, "1", remaining)).await?;
        log::info!("Token revoked: jti={} ttl={}s", jti, remaining.as_secs());
        Ok(())
    }

    /// Whether a token id is on the revocation list.
    pub async fn is_revoked(&self, jti: &str) -> AuthResult<bool> {
        let key = revocation_key(jti);
        Ok(with_deadline(self.kv_deadline, self.kv.exists(&key)).await?)
    }
}

fn revocation_key(jti: &str) -> String {
    format!("{}{}", REVOKED_PREFIX, jti)
}
