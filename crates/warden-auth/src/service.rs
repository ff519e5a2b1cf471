//! Registration and password authentication flows.

use crate::error::{AuthError, AuthResult};
use crate::password::{hash_password, validate_password, verify_password};
use crate::user_repo::UserRepository;
use std::sync::Arc;
use warden_commons::User;

/// Create a user with a password credential.
///
/// # Errors
/// - `AuthError::InvalidEmail` on an obviously malformed address
/// - `AuthError::WeakPassword` when the password fails strength checks
/// - `AuthError::AlreadyExists` when the email is taken
pub async fn register_user(
    repo: &Arc<dyn UserRepository>,
    email: &str,
    password: &str,
) -> AuthResult<User> {
    check_email(email)?;
    validate_password(password)?;

    let password_hash = hash_password(password, None).await?;
    let user = repo.insert_user(User::with_password(email, password_hash)).await?;
    log::info!("User registered: {}", user.user_id);
    Ok(user)
}

/// Authenticate an email/password pair.
///
/// Every failure path returns the same `InvalidCredentials` error; the
/// distinction (unknown email, federation-only account, wrong password)
/// exists only in the logs.
pub async fn authenticate_password(
    repo: &Arc<dyn UserRepository>,
    email: &str,
    password: &str,
) -> AuthResult<User> {
    let user = match repo.get_by_email(email).await? {
        Some(user) => user,
        None => {
            log::debug!("Login attempt for unknown email");
            return Err(invalid_credentials());
        }
    };

    let password_hash = match &user.password_hash {
        Some(hash) => hash.clone(),
        None => {
            // Federation-only account: a password can never match.
            log::debug!("Password login attempt on federation-only account {}", user.user_id);
            return Err(invalid_credentials());
        }
    };

    if !verify_password(password, &password_hash).await? {
        log::debug!("Wrong password for {}", user.user_id);
        return Err(invalid_credentials());
    }

    Ok(user)
}

fn invalid_credentials() -> AuthError {
    AuthError::InvalidCredentials("Incorrect email or password".to_string())
}

fn check_email(email: &str) -> AuthResult<()> {
    let valid = email
        .split_once('@')
        .map(|(local, domain)| !local.is_empty() && domain.contains('.') && !domain.starts_with('.'))
        .unwrap_or(false);
    if valid {
        Ok(())
    } else {
        Err(AuthError::InvalidEmail(email.to_string()))
    }
}
