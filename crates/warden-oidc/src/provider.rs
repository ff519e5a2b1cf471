//! The closed federated provider set.
//!
//! Providers are an enum, not string tags: adding one is a compile-time
//! event and every dispatch site is an exhaustive match. Each variant
//! verifies its own credential format and yields the same
//! [`VerifiedIdentity`] shape.

use crate::claims::{AppleClaims, FacebookProfile, GoogleClaims};
use crate::error::OidcError;
use crate::validator::{IssuerConfig, JwksValidator};
use std::time::Duration;
use warden_configs::FederatedSettings;

/// The federated identity providers Warden understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IdentityProvider {
    Google,
    Apple,
    Facebook,
}

impl IdentityProvider {
    /// Stable tag stored on federated account links.
    pub fn as_str(&self) -> &'static str {
        match self {
            IdentityProvider::Google => "google",
            IdentityProvider::Apple => "apple",
            IdentityProvider::Facebook => "facebook",
        }
    }
}

impl std::fmt::Display for IdentityProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The outcome of verifying an external credential.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedIdentity {
    pub provider: IdentityProvider,
    /// Provider-assigned stable subject identifier.
    pub subject: String,
    pub email: Option<String>,
}

/// Verifies credentials for every configured provider.
///
/// Token providers (Google, Apple) validate the credential as a signed JWT
/// against the issuer's JWKS — signature verification is never skipped.
/// Facebook resolves the access token through the Graph API profile
/// endpoint. All outbound calls share one HTTP client with a bounded
/// request timeout.
pub struct FederatedVerifier {
    google: Option<JwksValidator>,
    apple: Option<JwksValidator>,
    http: reqwest::Client,
    facebook_graph_url: String,
}

impl FederatedVerifier {
    pub fn new(settings: &FederatedSettings) -> Self {
        let http = match reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.http_timeout_secs))
            .build()
        {
            Ok(client) => client,
            Err(e) => {
                log::warn!("Could not build bounded HTTP client ({}); using default", e);
                reqwest::Client::new()
            }
        };

        let google = settings.google_client_id.as_ref().map(|client_id| {
            JwksValidator::new(
                IssuerConfig {
                    issuers: settings.google_issuers.clone(),
                    jwks_uri: settings.google_jwks_uri.clone(),
                    audience: Some(client_id.clone()),
                },
                http.clone(),
            )
        });

        let apple = settings.apple_client_id.as_ref().map(|client_id| {
            JwksValidator::new(
                IssuerConfig {
                    issuers: vec![settings.apple_issuer.clone()],
                    jwks_uri: settings.apple_jwks_uri.clone(),
                    audience: Some(client_id.clone()),
                },
                http.clone(),
            )
        });

        Self {
            google,
            apple,
            http,
            facebook_graph_url: settings.facebook_graph_url.trim_end_matches('/').to_string(),
        }
    }

    /// Verify an external credential for the given provider.
    pub async fn verify(
        &self,
        provider: IdentityProvider,
        credential: &str,
    ) -> Result<VerifiedIdentity, OidcError> {
        match provider {
            IdentityProvider::Google => self.verify_google(credential).await,
            IdentityProvider::Apple => self.verify_apple(credential).await,
            IdentityProvider::Facebook => self.verify_facebook(credential).await,
        }
    }

    async fn verify_google(&self, id_token: &str) -> Result<VerifiedIdentity, OidcError> {
        let validator = self.google.as_ref().ok_or(OidcError::ProviderDisabled("google"))?;
        let claims: GoogleClaims = validator.validate(id_token).await?;

        // An unverified address must not adopt an existing account.
        let email = match claims.email_verified {
            Some(false) => None,
            _ => claims.email,
        };

        Ok(VerifiedIdentity {
            provider: IdentityProvider::Google,
            subject: claims.sub,
            email,
        })
    }

    async fn verify_apple(&self, identity_token: &str) -> Result<VerifiedIdentity, OidcError> {
        let validator = self.apple.as_ref().ok_or(OidcError::ProviderDisabled("apple"))?;
        let claims: AppleClaims = validator.validate(identity_token).await?;
        Ok(VerifiedIdentity {
            provider: IdentityProvider::Apple,
            subject: claims.sub,
            email: claims.email,
        })
    }

    async fn verify_facebook(&self, access_token: &str) -> Result<VerifiedIdentity, OidcError> {
        let url = format!("{}/me", self.facebook_graph_url);
        let response = self
            .http
            .get(&url)
            .query(&[("fields", "id,email"), ("access_token", access_token)])
            .send()
            .await
            .map_err(|e| OidcError::RequestFailed(e.to_string()))?;

        if !response.status().is_success() {
            return Err(OidcError::CredentialRejected(format!(
                "Graph API returned status {}",
                response.status()
            )));
        }

        let profile: FacebookProfile = response
            .json()
            .await
            .map_err(|e| OidcError::RequestFailed(format!("Invalid profile payload: {}", e)))?;

        Ok(VerifiedIdentity {
            provider: IdentityProvider::Facebook,
            subject: profile.id,
            email: profile.email,
        })
    }
}
