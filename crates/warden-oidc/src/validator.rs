//! JWKS-backed JWT validation with key caching.
//!
//! Each `JwksValidator` is bound to a single issuer configuration and keeps
//! an in-process cache of that issuer's public keys. A token whose `kid` is
//! not cached triggers a refresh (key rotation); a `kid` that is still
//! unknown after refresh is a hard failure.

use crate::error::OidcError;
use jsonwebtoken::jwk::{Jwk, JwkSet};
use jsonwebtoken::{decode, decode_header, Algorithm, DecodingKey, Validation};
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Issuer binding for a validator.
#[derive(Debug, Clone)]
pub struct IssuerConfig {
    /// Accepted `iss` values (some issuers publish more than one form).
    pub issuers: Vec<String>,
    /// JWKS endpoint URL.
    pub jwks_uri: String,
    /// Expected `aud`; `None` disables the audience check.
    pub audience: Option<String>,
}

/// JWT validator for one external issuer.
#[derive(Clone)]
pub struct JwksValidator {
    config: IssuerConfig,
    http: reqwest::Client,
    jwks_cache: Arc<RwLock<HashMap<String, Jwk>>>,
}

impl JwksValidator {
    /// Create a validator. The supplied client must already carry a bounded
    /// request timeout; the validator never builds its own unbounded one.
    pub fn new(config: IssuerConfig, http: reqwest::Client) -> Self {
        Self {
            config,
            http,
            jwks_cache: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub fn config(&self) -> &IssuerConfig {
        &self.config
    }

    /// Validate a JWT against the issuer's published keys.
    ///
    /// Verifies signature (algorithm pinned to the token header), `iss`,
    /// `aud` (when configured), and `exp`.
    pub async fn validate<T>(&self, token: &str) -> Result<T, OidcError>
    where
        T: DeserializeOwned,
    {
        let header = decode_header(token)?;
        let kid = header.kid.ok_or(OidcError::MissingKid)?;
        log::debug!("Validating federated token, kid={} alg={:?}", kid, header.alg);

        let jwk = self.get_jwk(&kid).await?;
        let decoding_key =
            DecodingKey::from_jwk(&jwk).map_err(|e| OidcError::InvalidKeyFormat(e.to_string()))?;

        // Pin validation to the exact algorithm in the token header;
        // accepting whatever the header says against a fixed key set is
        // safe because the key itself constrains the family.
        let mut validation = Validation::new(header.alg);
        validation.algorithms = vec![header.alg];
        validation.validate_exp = true;

        let issuer_refs: Vec<&str> = self.config.issuers.iter().map(|s| s.as_str()).collect();
        validation.set_issuer(&issuer_refs);

        if let Some(ref audience) = self.config.audience {
            validation.set_audience(&[audience]);
        } else {
            validation.validate_aud = false;
        }

        let data = decode::<T>(token, &decoding_key, &validation).map_err(|e| {
            log::warn!("Federated token rejected: kind={:?}", e.kind());
            OidcError::from(e)
        })?;
        Ok(data.claims)
    }

    /// Look up a JWK by `kid`, refreshing the cache on miss.
    async fn get_jwk(&self, kid: &str) -> Result<Jwk, OidcError> {
        {
            let cache = self.jwks_cache.read().await;
            if let Some(jwk) = cache.get(kid) {
                return Ok(jwk.clone());
            }
        }

        self.refresh_jwks_cache().await?;

        let cache = self.jwks_cache.read().await;
        cache.get(kid).cloned().ok_or_else(|| OidcError::KeyNotFound(kid.to_string()))
    }

    /// Fetch the JWKS from the issuer and replace the cache.
    pub async fn refresh_jwks_cache(&self) -> Result<(), OidcError> {
        log::info!("Refreshing JWKS cache from {}", self.config.jwks_uri);
        let jwks = self.fetch_jwks().await?;

        let mut fresh = HashMap::new();
        for jwk in jwks.keys {
            if let Some(kid) = jwk.common.key_id.clone() {
                fresh.insert(kid, jwk);
            }
        }

        let mut cache = self.jwks_cache.write().await;
        *cache = fresh;
        log::debug!("JWKS cache now holds {} keys", cache.len());
        Ok(())
    }

    async fn fetch_jwks(&self) -> Result<JwkSet, OidcError> {
        let response = self.http.get(&self.config.jwks_uri).send().await.map_err(|e| {
            OidcError::JwksFetchFailed(format!(
                "Failed to fetch JWKS from '{}': {}",
                self.config.jwks_uri, e
            ))
        })?;

        if !response.status().is_success() {
            return Err(OidcError::JwksFetchFailed(format!(
                "JWKS request to '{}' returned status {}",
                self.config.jwks_uri,
                response.status()
            )));
        }

        response.json::<JwkSet>().await.map_err(|e| {
            OidcError::JwksFetchFailed(format!(
                "Failed to parse JWKS JSON from '{}': {}",
                self.config.jwks_uri, e
            ))
        })
    }
}
