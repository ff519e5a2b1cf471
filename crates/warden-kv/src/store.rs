//! The store contract and the bounded-call helper.

use crate::error::{KvError, KvResult};
use async_trait::async_trait;
use std::future::Future;
use std::time::Duration;

/// Expiring key-value store.
///
/// Single-key operations only; the backend's own atomicity is the
/// consistency model. Values are opaque strings (callers serialize JSON
/// records themselves).
#[async_trait]
pub trait KvStore: Send + Sync {
    /// Write `value` under `key` with a time-to-live. Overwrites any
    /// existing entry and resets its TTL.
    async fn set_ex(&self, key: &str, value: &str, ttl: Duration) -> KvResult<()>;

    /// Read the value under `key`, or `None` if absent or expired.
    async fn get(&self, key: &str) -> KvResult<Option<String>>;

    /// Reset the TTL of an existing entry without touching its value.
    /// Returns `false` when the key does not exist (or already expired).
    async fn expire(&self, key: &str, ttl: Duration) -> KvResult<bool>;

    /// Remove the entry. Idempotent — deleting a missing key is not an error.
    async fn delete(&self, key: &str) -> KvResult<()>;

    /// Existence check without reading the value.
    async fn exists(&self, key: &str) -> KvResult<bool>;
}

/// Bound a store call with a deadline.
///
/// No component may block indefinitely on the external store: request-path
/// callers wrap every `get`/`set_ex`/`expire`/`delete` in this helper so a
/// stalled backend surfaces as [`KvError::Timeout`] instead of hanging the
/// request. Composes under the pipeline's outer timeout guard.
pub async fn with_deadline<T, F>(limit: Duration, fut: F) -> KvResult<T>
where
    F: Future<Output = KvResult<T>>,
{
    match tokio::time::timeout(limit, fut).await {
        Ok(result) => result,
        Err(_) => Err(KvError::Timeout(limit)),
    }
}
