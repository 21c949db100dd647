//! Registration and login.

use lazy_regex::regex_is_match;
use sea_orm::ConnectionTrait;
use tracing::{info, warn};

use crate::auth::password::{hash_password, verify_password};
use crate::error::AppError;
use crate::errors::domain::{ConflictKind, DomainError, ValidationKind};
use crate::repos::users::{self as users_repo, User};
use crate::repos::profiles as profiles_repo;

pub const MIN_PASSWORD_LEN: usize = 8;
pub const MAX_PASSWORD_LEN: usize = 128;

pub fn validate_username(username: &str) -> Result<(), DomainError> {
    if regex_is_match!(r"^[A-Za-z0-9_-]{3,32}$", username) {
        Ok(())
    } else {
        Err(DomainError::validation(
            ValidationKind::Username,
            "Username must be 3-32 characters of letters, digits, '_' or '-'",
        ))
    }
}

pub fn validate_password(password: &str) -> Result<(), DomainError> {
    let len = password.chars().count();
    if !(MIN_PASSWORD_LEN..=MAX_PASSWORD_LEN).contains(&len) {
        return Err(DomainError::validation(
            ValidationKind::Password,
            format!("Password must be {MIN_PASSWORD_LEN}-{MAX_PASSWORD_LEN} characters"),
        ));
    }
    Ok(())
}

/// Create a user and their default character sheet.
///
/// The first account ever created becomes an administrator.
pub async fn register_user<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    username: &str,
    password: &str,
) -> Result<User, AppError> {
    validate_username(username)?;
    validate_password(password)?;

    if users_repo::find_user_by_username(conn, username).await?.is_some() {
        return Err(DomainError::conflict(ConflictKind::UsernameTaken, "Username already taken").into());
    }

    let is_admin = users_repo::count_users(conn).await? == 0;
    let hash = hash_password(password)?;
    let user = users_repo::create_user(conn, username, &hash, is_admin).await?;
    profiles_repo::create_default(conn, user.id, username).await?;

    info!(user_id = user.id, is_admin, "User registered");
    Ok(user)
}

pub async fn authenticate<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    username: &str,
    password: &str,
) -> Result<User, AppError> {
    let Some(creds) = users_repo::find_credentials_by_username(conn, username).await? else {
        warn!("Login for unknown username");
        return Err(AppError::invalid_credentials());
    };
    if !verify_password(password, &creds.password_hash) {
        warn!(user_id = creds.user.id, "Login with wrong password");
        return Err(AppError::invalid_credentials());
    }
    Ok(creds.user)
}
