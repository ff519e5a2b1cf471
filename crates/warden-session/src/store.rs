//! Session record CRUD.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use warden_commons::UserId;
use warden_kv::{with_deadline, KvStore};

/// Key prefix for session entries in the shared store.
const SESSION_PREFIX: &str = "session:";

/// Bytes of entropy in a session identifier.
const SESSION_ID_BYTES: usize = 32;

/// Errors produced by session operations.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("Session store operation failed: {0}")]
    Store(#[from] warden_kv::KvError),

    #[error("Session record could not be serialized: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// The stored session payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionRecord {
    pub user_id: UserId,
    pub email: String,
    /// Arbitrary extra fields captured at login time.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub extra: HashMap<String, serde_json::Value>,
}

/// Creates, fetches, refreshes, and deletes session records.
pub struct SessionStore {
    kv: Arc<dyn KvStore>,
    ttl: Duration,
    op_deadline: Duration,
}

impl SessionStore {
    pub fn new(kv: Arc<dyn KvStore>, ttl: Duration, op_deadline: Duration) -> Self {
        Self { kv, ttl, op_deadline }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Create a session and return its identifier.
    ///
    /// The identifier is 32 bytes from the OS RNG, base64url-encoded —
    /// never derived from user data.
    pub async fn create(
        &self,
        user_id: UserId,
        email: impl Into<String>,
        extra: HashMap<String, serde_json::Value>,
    ) -> Result<String, SessionError> {
        let session_id = generate_session_id();
        let record = SessionRecord { user_id, email: email.into(), extra };
        let payload = serde_json::to_string(&record)?;

        with_deadline(
            self.op_deadline,
            self.kv.set_ex(&session_key(&session_id), &payload, self.ttl),
        )
        .await?;
        log::debug!("Session created for user {}", record.user_id);
        Ok(session_id)
    }

    /// Fetch a session record.
    ///
    /// Malformed stored data reads as absence — a corrupt record must
    /// behave exactly like an expired one.
    pub async fn get(&self, session_id: &str) -> Result<Option<SessionRecord>, SessionError> {
        if session_id.is_empty() {
            return Ok(None);
        }
        let raw = with_deadline(self.op_deadline, self.kv.get(&session_key(session_id))).await?;
        let raw = match raw {
            Some(raw) => raw,
            None => return Ok(None),
        };
        match serde_json::from_str(&raw) {
            Ok(record) => Ok(Some(record)),
            Err(e) => {
                log::warn!("Discarding malformed session record: {}", e);
                Ok(None)
            }
        }
    }

    /// Reset the TTL of a live session without rewriting the record.
    ///
    /// Returns `false` when the session no longer exists.
    pub async fn refresh(&self, session_id: &str) -> Result<bool, SessionError> {
        if session_id.is_empty() {
            return Ok(false);
        }
        Ok(with_deadline(
            self.op_deadline,
            self.kv.expire(&session_key(session_id), self.ttl),
        )
        .await?)
    }

    /// Remove a session. Idempotent on a missing id.
    pub async fn delete(&self, session_id: &str) -> Result<(), SessionError> {
        if session_id.is_empty() {
            return Ok(());
        }
        with_deadline(self.op_deadline, self.kv.delete(&session_key(session_id))).await?;
        Ok(())
    }
}

fn session_key(session_id: &str) -> String {
    format!("{}{}", SESSION_PREFIX, session_id)
}

fn generate_session_id() -> String {
    let mut bytes = [0u8; SESSION_ID_BYTES];
    rand::rngs::OsRng.fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}
