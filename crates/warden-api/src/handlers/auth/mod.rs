//! Authentication handlers.
//!
//! ## Endpoints
//! - POST /auth/register  - Create a password-credentialed user
//! - POST /auth/login     - Password login, sets the session cookie
//! - POST /auth/token     - Password login, returns bearer tokens
//! - POST /auth/logout    - Delete the session, revoke a presented token
//! - GET  /auth/me        - Current identity (token or session)
//! - POST /auth/google    - Federated login (Google ID token)
//! - POST /auth/apple     - Federated login (Apple identity token)
//! - POST /auth/facebook  - Federated login (Facebook access token)

pub mod models;

mod login;
mod logout;
mod me;
mod register;
mod social;
mod token;

pub use login::login_handler;
pub use logout::logout_handler;
pub use me::me_handler;
pub use register::register_handler;
pub use social::{apple_login_handler, facebook_login_handler, google_login_handler};
pub use token::token_handler;
