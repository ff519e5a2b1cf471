//! Request-scoped identity.
//!
//! The auth resolver walks a request from `Anonymous` to one of the
//! authenticated states and stores the result in the request extensions;
//! handlers and the logger read it from there. Anonymous is a valid
//! terminal state — whether a handler tolerates it is the handler's call,
//! identity resolution is deliberately separate from authorization.

/// Identity attached to a single request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestIdentity {
    /// No credential presented (or only an absent/expired session).
    Anonymous,
    /// Established from a valid, unrevoked bearer token.
    Token(TokenIdentity),
    /// Established from a live server-side session.
    Session(SessionIdentity),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenIdentity {
    pub user_id: String,
    pub email: Option<String>,
    pub jti: String,
    /// Expiry (Unix timestamp seconds), used for the refresh hint.
    pub expires_at: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionIdentity {
    pub user_id: String,
    pub email: String,
    pub session_id: String,
}

impl RequestIdentity {
    pub fn is_authenticated(&self) -> bool {
        !matches!(self, RequestIdentity::Anonymous)
    }

    pub fn user_id(&self) -> Option<&str> {
        match self {
            RequestIdentity::Anonymous => None,
            RequestIdentity::Token(t) => Some(&t.user_id),
            RequestIdentity::Session(s) => Some(&s.user_id),
        }
    }

    pub fn email(&self) -> Option<&str> {
        match self {
            RequestIdentity::Anonymous => None,
            RequestIdentity::Token(t) => t.email.as_deref(),
            RequestIdentity::Session(s) => Some(&s.email),
        }
    }

    /// Short label for structured logs.
    pub fn method_label(&self) -> &'static str {
        match self {
            RequestIdentity::Anonymous => "anonymous",
            RequestIdentity::Token(_) => "token",
            RequestIdentity::Session(_) => "session",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_anonymous_accessors() {
        let identity = RequestIdentity::Anonymous;
        assert!(!identity.is_authenticated());
        assert_eq!(identity.user_id(), None);
        assert_eq!(identity.email(), None);
        assert_eq!(identity.method_label(), "anonymous");
    }

    #[test]
    fn test_token_identity_accessors() {
        let identity = RequestIdentity::Token(TokenIdentity {
            user_id: "u1".to_string(),
            email: Some("u1@x.com".to_string()),
            jti: "j1".to_string(),
            expires_at: 0,
        });
        assert!(identity.is_authenticated());
        assert_eq!(identity.user_id(), Some("u1"));
        assert_eq!(identity.email(), Some("u1@x.com"));
        assert_eq!(identity.method_label(), "token");
    }

    #[test]
    fn test_session_identity_accessors() {
        let identity = RequestIdentity::Session(SessionIdentity {
            user_id: "u2".to_string(),
            email: "u2@x.com".to_string(),
            session_id: "s1".to_string(),
        });
        assert!(identity.is_authenticated());
        assert_eq!(identity.method_label(), "session");
    }
}
