//! The persistent user store, seen through a repository trait.
//!
//! The real store is an external collaborator; Warden only ever talks to
//! this trait. [`MemoryUserRepository`] implements the same contract
//! in-process for development and tests, including the uniqueness
//! violations a relational store would raise.

use crate::error::{AuthError, AuthResult};
use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use warden_commons::{FederatedAccount, User, UserId};

/// User record store.
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn get_by_id(&self, id: &UserId) -> AuthResult<Option<User>>;

    async fn get_by_email(&self, email: &str) -> AuthResult<Option<User>>;

    /// Look up the user owning a `(provider, subject)` federated link.
    async fn get_by_federated(&self, provider: &str, subject: &str) -> AuthResult<Option<User>>;

    /// Insert a new user. Fails with [`AuthError::AlreadyExists`] when the
    /// email is taken.
    async fn insert_user(&self, user: User) -> AuthResult<User>;

    /// Record a federated link. Fails with [`AuthError::AlreadyExists`]
    /// when `(provider, subject)` is already linked.
    async fn link_federated(&self, link: FederatedAccount) -> AuthResult<()>;
}

fn federated_key(provider: &str, subject: &str) -> String {
    format!("{}:{}", provider, subject)
}

/// In-memory [`UserRepository`] backend.
#[derive(Debug, Default)]
pub struct MemoryUserRepository {
    users: DashMap<String, User>,
    email_index: DashMap<String, String>,
    federated_index: DashMap<String, FederatedAccount>,
}

impl MemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn user_count(&self) -> usize {
        self.users.len()
    }
}

#[async_trait]
impl UserRepository for MemoryUserRepository {
    async fn get_by_id(&self, id: &UserId) -> AuthResult<Option<User>> {
        Ok(self.users.get(id.as_str()).map(|u| u.value().clone()))
    }

    async fn get_by_email(&self, email: &str) -> AuthResult<Option<User>> {
        let user_id = match self.email_index.get(email) {
            Some(id) => id.value().clone(),
            None => return Ok(None),
        };
        Ok(self.users.get(&user_id).map(|u| u.value().clone()))
    }

    async fn get_by_federated(&self, provider: &str, subject: &str) -> AuthResult<Option<User>> {
        let link = match self.federated_index.get(&federated_key(provider, subject)) {
            Some(link) => link.value().clone(),
            None => return Ok(None),
        };
        Ok(self.users.get(link.user_id.as_str()).map(|u| u.value().clone()))
    }

    async fn insert_user(&self, user: User) -> AuthResult<User> {
        // Claim the email first; the index entry is the uniqueness guard.
        match self.email_index.entry(user.email.clone()) {
            Entry::Occupied(_) => {
                return Err(AuthError::AlreadyExists(format!("email '{}'", user.email)))
            }
            Entry::Vacant(slot) => {
                slot.insert(user.user_id.as_str().to_string());
            }
        }
        self.users.insert(user.user_id.as_str().to_string(), user.clone());
        Ok(user)
    }

    async fn link_federated(&self, link: FederatedAccount) -> AuthResult<()> {
        match self.federated_index.entry(federated_key(&link.provider, &link.subject)) {
            Entry::Occupied(_) => Err(AuthError::AlreadyExists(format!(
                "federated link {}:{}",
                link.provider, link.subject
            ))),
            Entry::Vacant(slot) => {
                slot.insert(link);
                Ok(())
            }
        }
    }
}
