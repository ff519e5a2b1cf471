pub mod auth;
pub mod health;

pub use health::{healthcheck_handler, root_handler};
