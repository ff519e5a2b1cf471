//! # warden-api
//!
//! The HTTP surface of Warden: an ordered middleware chain enforcing the
//! governance policies, the authentication handlers, and route wiring.
//!
//! Chain order (outermost first): request logging → request id → auth
//! resolution → validation/sanitization → timeout guard → size guard →
//! security headers → compression/CORS/host (wired by the server binary).
//! A stage that rejects short-circuits everything after it; no handler code
//! runs behind a rejecting stage.

pub mod error;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod routes;

pub use metrics::RejectionCounters;
