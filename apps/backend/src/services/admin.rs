//! Administrator operations.

use sea_orm::ConnectionTrait;
use tracing::info;

use crate::error::AppError;
use crate::errors::domain::{ConflictKind, DomainError};
use crate::repos::games::{self as games_repo, Game};
use crate::repos::users::{self as users_repo, User};

pub async fn list_users<C: ConnectionTrait + Send + Sync>(conn: &C) -> Result<Vec<User>, AppError> {
    Ok(users_repo::list_users(conn).await?)
}

pub async fn list_games<C: ConnectionTrait + Send + Sync>(conn: &C) -> Result<Vec<Game>, AppError> {
    Ok(games_repo::list_all(conn).await?)
}

/// Set a user's admin flag. Admins cannot demote themselves.
pub async fn set_admin<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    actor_id: i64,
    target_id: i64,
    is_admin: bool,
) -> Result<User, AppError> {
    if actor_id == target_id && !is_admin {
        return Err(DomainError::conflict(
            ConflictKind::CannotDemoteSelf,
            "Administrators cannot remove their own admin flag",
        )
        .into());
    }
    let user = users_repo::set_admin(conn, target_id, is_admin).await?;
    info!(actor_id, target_id, is_admin, "Admin flag changed");
    Ok(user)
}
