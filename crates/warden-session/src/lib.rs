//! # warden-session
//!
//! Server-side session records over the expiring key-value store.
//!
//! A session is referenced by an opaque, cryptographically random
//! identifier — the identifier, not the record, is what the client holds
//! (as an HttpOnly cookie). Records carry a fixed TTL; there is no sliding
//! window on the identity-resolution hot path. [`SessionStore::refresh`]
//! exists for explicit renewal only.

pub mod store;

pub use store::{SessionError, SessionRecord, SessionStore};
