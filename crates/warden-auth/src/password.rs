// Password hashing and validation module

use crate::error::{AuthError, AuthResult};
use bcrypt::{hash, verify, DEFAULT_COST};
use std::collections::HashSet;
use std::sync::OnceLock;

/// Bcrypt cost factor for password hashing.
pub const BCRYPT_COST: u32 = DEFAULT_COST;

/// Minimum password length
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Maximum password length (bcrypt has a 72-byte limit)
pub const MAX_PASSWORD_LENGTH: usize = 72;

/// Common passwords list (loaded once)
static COMMON_PASSWORDS: OnceLock<HashSet<&'static str>> = OnceLock::new();

/// Hash a password using bcrypt.
///
/// Runs on the blocking thread pool — bcrypt is CPU-bound by design and
/// must not stall the async runtime.
///
/// # Arguments
/// * `password` - Plain text password to hash
/// * `cost` - Optional bcrypt cost (defaults to BCRYPT_COST)
///
/// # Errors
/// Returns `AuthError::HashingError` if bcrypt fails
pub async fn hash_password(password: &str, cost: Option<u32>) -> AuthResult<String> {
    let password = password.to_string();
    let cost = cost.unwrap_or(BCRYPT_COST);

    tokio::task::spawn_blocking(move || {
        hash(password, cost).map_err(|e| AuthError::HashingError(e.to_string()))
    })
    .await
    .map_err(|e| AuthError::HashingError(format!("Task join error: {}", e)))?
}

/// Verify a password against a bcrypt hash.
///
/// Runs on the blocking thread pool to avoid blocking the async runtime.
///
/// # Returns
/// `Ok(true)` if the password matches, `Ok(false)` if not, `Err` on failure
pub async fn verify_password(password: &str, hash: &str) -> AuthResult<bool> {
    let password = password.to_string();
    let hash = hash.to_string();

    tokio::task::spawn_blocking(move || {
        verify(password, &hash).map_err(|e| AuthError::HashingError(e.to_string()))
    })
    .await
    .map_err(|e| AuthError::HashingError(format!("Task join error: {}", e)))?
}

/// Validate a password against security requirements.
///
/// Checks minimum/maximum length and the common-passwords list.
///
/// # Errors
/// Returns `AuthError::WeakPassword` with the specific reason
pub fn validate_password(password: &str) -> AuthResult<()> {
    if password.len() < MIN_PASSWORD_LENGTH {
        return Err(AuthError::WeakPassword(format!(
            "Password must be at least {} characters",
            MIN_PASSWORD_LENGTH
        )));
    }

    if password.len() > MAX_PASSWORD_LENGTH {
        return Err(AuthError::WeakPassword(format!(
            "Password must be at most {} characters",
            MAX_PASSWORD_LENGTH
        )));
    }

    if is_common_password(password) {
        return Err(AuthError::WeakPassword("Password is too common".to_string()));
    }

    Ok(())
}

/// Check whether a password appears in the common passwords list.
fn is_common_password(password: &str) -> bool {
    let common_passwords = COMMON_PASSWORDS.get_or_init(|| {
        [
            "password", "12345678", "123456789", "qwertyui", "baseball", "iloveyou",
            "sunshine", "princess", "football", "superman", "trustno1", "passw0rd",
            "letmein1", "11111111", "88888888",
        ]
        .into_iter()
        .collect()
    });

    common_passwords.contains(password)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_hash_and_verify_password() {
        let password = "SecurePassword123!";
        // Low cost keeps the test fast
        let hash = hash_password(password, Some(4)).await.expect("Failed to hash");
        assert!(hash.starts_with("$2"));

        let verified = verify_password(password, &hash).await.expect("Failed to verify");
        assert!(verified);

        let wrong = verify_password("WrongPassword", &hash).await.expect("Failed to verify");
        assert!(!wrong);
    }

    #[test]
    fn test_validate_password_too_short() {
        let result = validate_password("short");
        assert!(matches!(result, Err(AuthError::WeakPassword(_))));
    }

    #[test]
    fn test_validate_password_too_long() {
        let long = "x".repeat(80);
        assert!(matches!(validate_password(&long), Err(AuthError::WeakPassword(_))));
    }

    #[test]
    fn test_validate_password_common() {
        let result = validate_password("password");
        assert!(matches!(result, Err(AuthError::WeakPassword(_))));
    }

    #[test]
    fn test_validate_password_valid() {
        assert!(validate_password("MySecurePassword123!").is_ok());
        assert!(validate_password("secret123").is_ok());
    }
}
