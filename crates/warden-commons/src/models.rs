//! Identity records owned by the external user store.
//!
//! Warden never deletes these; it creates them on registration or on first
//! successful federated login (JIT provisioning) and reads them during
//! authentication. Timestamps are epoch milliseconds.

use crate::ids::UserId;
use serde::{Deserialize, Serialize};

/// A user identity record.
///
/// `password_hash` is `None` for federation-only accounts — such users can
/// only authenticate through a linked [`FederatedAccount`], never with a
/// password.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub user_id: UserId,
    pub email: String,
    pub password_hash: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

impl User {
    /// Create a user with a password hash (classic registration).
    pub fn with_password(email: impl Into<String>, password_hash: String) -> Self {
        let now = chrono::Utc::now().timestamp_millis();
        Self {
            user_id: UserId::generate(),
            email: email.into(),
            password_hash: Some(password_hash),
            created_at: now,
            updated_at: now,
        }
    }

    /// Create a federation-only user (no password credential).
    pub fn federated_only(email: impl Into<String>) -> Self {
        let now = chrono::Utc::now().timestamp_millis();
        Self {
            user_id: UserId::generate(),
            email: email.into(),
            password_hash: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Whether this user can authenticate with a password at all.
    pub fn has_password(&self) -> bool {
        self.password_hash.is_some()
    }
}

/// Link between an external identity provider subject and a local user.
///
/// Uniqueness invariant: `(provider, subject)` is globally unique; one user
/// may hold at most one link per provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FederatedAccount {
    pub user_id: UserId,
    /// Provider tag, e.g. "google", "apple", "facebook"
    pub provider: String,
    /// Provider-assigned stable subject identifier
    pub subject: String,
    /// Email reported by the provider at link time, if any
    pub email: Option<String>,
    pub created_at: i64,
}

impl FederatedAccount {
    pub fn new(
        user_id: UserId,
        provider: impl Into<String>,
        subject: impl Into<String>,
        email: Option<String>,
    ) -> Self {
        Self {
            user_id,
            provider: provider.into(),
            subject: subject.into(),
            email,
            created_at: chrono::Utc::now().timestamp_millis(),
        }
    }
}
