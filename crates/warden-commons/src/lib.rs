// Warden shared library
// Identifiers, error primitives, and identity models used across all crates

pub mod errors;
pub mod ids;
pub mod models;

pub use errors::CommonError;
pub use ids::{RequestId, UserId};
pub use models::{FederatedAccount, User};
