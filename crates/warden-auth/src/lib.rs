// Warden authentication library
// Password hashing, signed revocable tokens, user repository, auth cookies,
// and the request-scoped identity model

pub mod claims;
pub mod cookie;
pub mod error;
pub mod identity;
pub mod password;
pub mod provision;
pub mod service;
pub mod token;
pub mod user_repo;

// Re-export commonly used types
pub use claims::{ClaimSpec, TokenClaims, TokenType};
pub use cookie::{
    create_session_cookie, create_session_logout_cookie, CookieConfig, SESSION_COOKIE_NAME,
    TOKEN_COOKIE_NAME,
};
pub use error::{AuthError, AuthResult};
pub use identity::{RequestIdentity, SessionIdentity, TokenIdentity};
pub use provision::provision_federated_user;
pub use service::{authenticate_password, register_user};
pub use token::TokenService;
pub use user_repo::{MemoryUserRepository, UserRepository};
