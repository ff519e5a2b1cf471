//! # warden-kv
//!
//! Expiring key-value store abstraction for Warden.
//!
//! The session store and the token revocation list both sit on top of this
//! trait, so the business crates never care which engine actually holds the
//! data. The store is an external shared service in production; the
//! in-process [`MemoryKv`] backend implements the same contract for
//! development and tests.
//!
//! Consistency relies on the backend's own atomicity for single-key
//! read/write/expire operations — callers never take client-side locks.
//!
//! Every call made from a request path must be bounded; see
//! [`with_deadline`].

pub mod error;
pub mod memory;
pub mod store;

pub use error::{KvError, KvResult};
pub use memory::MemoryKv;
pub use store::{with_deadline, KvStore};
