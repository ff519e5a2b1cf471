// Cookie handling for HttpOnly authentication cookies

use actix_web::cookie::time::Duration as CookieDuration;
use actix_web::cookie::{Cookie, SameSite};
use std::time::Duration;

/// Cookie carrying the opaque server-side session identifier.
pub const SESSION_COOKIE_NAME: &str = "session_id";

/// Cookie that may carry a bearer token as a fallback to the
/// `Authorization` header.
pub const TOKEN_COOKIE_NAME: &str = "access_token";

/// Configuration for authentication cookies.
#[derive(Debug, Clone)]
pub struct CookieConfig {
    /// Whether to set the Secure flag (true when HTTPS is enforced)
    pub secure: bool,
    /// Cookie path (default: "/")
    pub path: String,
    /// SameSite policy. Lax by default: the session cookie must survive
    /// top-level navigations back to the app.
    pub same_site: SameSite,
    /// Max-Age of the cookie. Longer than the session record TTL on
    /// purpose; a cookie that outlives its session just reads as absent.
    pub max_age: Duration,
}

impl Default for CookieConfig {
    fn default() -> Self {
        Self {
            secure: false,
            path: "/".to_string(),
            same_site: SameSite::Lax,
            max_age: Duration::from_secs(7 * 86_400),
        }
    }
}

/// Create the HttpOnly session cookie for a freshly created session.
pub fn create_session_cookie<'a>(session_id: &str, config: &CookieConfig) -> Cookie<'a> {
    Cookie::build(SESSION_COOKIE_NAME, session_id.to_string())
        .path(config.path.clone())
        .http_only(true)
        .secure(config.secure)
        .same_site(config.same_site)
        .max_age(CookieDuration::seconds(config.max_age.as_secs() as i64))
        .finish()
}

/// Create a cookie that clears the session cookie (logout).
pub fn create_session_logout_cookie<'a>(config: &CookieConfig) -> Cookie<'a> {
    Cookie::build(SESSION_COOKIE_NAME, "")
        .path(config.path.clone())
        .http_only(true)
        .secure(config.secure)
        .same_site(config.same_site)
        .max_age(CookieDuration::ZERO)
        .finish()
}
