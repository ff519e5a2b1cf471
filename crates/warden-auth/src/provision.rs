//! Just-in-time provisioning for federated logins.
//!
//! Resolution order mirrors the uniqueness invariants: an existing
//! `(provider, subject)` link always wins; otherwise an email match adopts
//! the login into the existing account; otherwise a federation-only user is
//! created. Races with concurrent logins surface as `AlreadyExists` from
//! the store and are resolved by re-reading.

use crate::error::{AuthError, AuthResult};
use crate::user_repo::UserRepository;
use std::sync::Arc;
use warden_commons::{FederatedAccount, User};

/// Find or create the user for a verified federated identity.
pub async fn provision_federated_user(
    repo: &Arc<dyn UserRepository>,
    provider: &str,
    subject: &str,
    email: Option<&str>,
) -> AuthResult<User> {
    // 1. Existing link
    if let Some(user) = repo.get_by_federated(provider, subject).await? {
        return Ok(user);
    }

    // 2. Existing user with the provider-reported email: adopt and link
    if let Some(email) = email {
        if let Some(user) = repo.get_by_email(email).await? {
            let link = FederatedAccount::new(
                user.user_id.clone(),
                provider,
                subject,
                Some(email.to_string()),
            );
            match repo.link_federated(link).await {
                Ok(()) => {
                    log::info!("Linked {} identity to existing user {}", provider, user.user_id);
                    return Ok(user);
                }
                Err(AuthError::AlreadyExists(_)) => {
                    // A concurrent login linked it first; the link is authoritative.
                    return relookup(repo, provider, subject).await;
                }
                Err(e) => return Err(e),
            }
        }
    }

    // 3. Fresh account — requires an email to key the user record
    let email = email.ok_or(AuthError::EmailRequired)?;

    let user = match repo.insert_user(User::federated_only(email)).await {
        Ok(user) => user,
        Err(AuthError::AlreadyExists(_)) => {
            // Raced a concurrent registration with the same email
            match repo.get_by_email(email).await? {
                Some(user) => user,
                None => return Err(AuthError::StoreError("user vanished after insert race".into())),
            }
        }
        Err(e) => return Err(e),
    };

    let link =
        FederatedAccount::new(user.user_id.clone(), provider, subject, Some(email.to_string()));
    match repo.link_federated(link).await {
        Ok(()) => {
            log::info!("Provisioned {} user {} (JIT)", provider, user.user_id);
            Ok(user)
        }
        Err(AuthError::AlreadyExists(_)) => relookup(repo, provider, subject).await,
        Err(e) => Err(e),
    }
}

async fn relookup(
    repo: &Arc<dyn UserRepository>,
    provider: &str,
    subject: &str,
) -> AuthResult<User> {
    repo.get_by_federated(provider, subject)
        .await?
        .ok_or_else(|| AuthError::StoreError("federated link vanished after race".into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::user_repo::MemoryUserRepository;

    fn repo() -> Arc<dyn UserRepository> {
        Arc::new(MemoryUserRepository::new())
    }

    #[tokio::test]
    async fn test_first_login_creates_federation_only_user() {
        let repo = repo();
        let user = provision_federated_user(&repo, "google", "g-sub", Some("g@x.com"))
            .await
            .unwrap();
        assert_eq!(user.email, "g@x.com");
        assert!(!user.has_password());
    }

    #[tokio::test]
    async fn test_second_login_reuses_user() {
        let repo = repo();
        let first = provision_federated_user(&repo, "google", "g-sub", Some("g@x.com"))
            .await
            .unwrap();
        let second = provision_federated_user(&repo, "google", "g-sub", Some("g@x.com"))
            .await
            .unwrap();
        assert_eq!(first.user_id, second.user_id);
    }

    #[tokio::test]
    async fn test_email_match_links_to_existing_account() {
        let repo = repo();
        let existing = crate::service::register_user(&repo, "a@x.com", "secret123")
            .await
            .unwrap();
        let federated = provision_federated_user(&repo, "apple", "a-sub", Some("a@x.com"))
            .await
            .unwrap();
        assert_eq!(existing.user_id, federated.user_id);
        // The account keeps its password credential
        assert!(federated.has_password());
    }

    #[tokio::test]
    async fn test_missing_email_fails_cleanly() {
        let repo = repo();
        let result = provision_federated_user(&repo, "facebook", "f-sub", None).await;
        assert!(matches!(result, Err(AuthError::EmailRequired)));
    }

    #[tokio::test]
    async fn test_same_subject_different_providers_are_distinct() {
        let repo = repo();
        let google = provision_federated_user(&repo, "google", "sub-1", Some("g1@x.com"))
            .await
            .unwrap();
        let apple = provision_federated_user(&repo, "apple", "sub-1", Some("a1@x.com"))
            .await
            .unwrap();
        assert_ne!(google.user_id, apple.user_id);
    }
}
