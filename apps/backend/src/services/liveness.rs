//! Presence and typing indicators.

use sea_orm::ConnectionTrait;
use serde::Serialize;
use time::OffsetDateTime;

use crate::error::AppError;
use crate::repos::liveness as liveness_repo;
use crate::repos::users as users_repo;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LiveUser {
    pub user_id: i64,
    pub username: String,
}

async fn resolve_names<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    ids: Vec<i64>,
) -> Result<Vec<LiveUser>, AppError> {
    let mut users: Vec<LiveUser> = users_repo::find_users_by_ids(conn, &ids)
        .await?
        .into_iter()
        .map(|u| LiveUser {
            user_id: u.id,
            username: u.username,
        })
        .collect();
    users.sort_by_key(|u| u.user_id);
    Ok(users)
}

pub async fn heartbeat<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
    user_id: i64,
    now: OffsetDateTime,
) -> Result<(), AppError> {
    Ok(liveness_repo::heartbeat(conn, game_id, user_id, now).await?)
}

pub async fn present_users<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
    now: OffsetDateTime,
) -> Result<Vec<LiveUser>, AppError> {
    let ids = liveness_repo::active_users(conn, game_id, now).await?;
    resolve_names(conn, ids).await
}

pub async fn set_typing<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
    user_id: i64,
    is_typing: bool,
    now: OffsetDateTime,
) -> Result<(), AppError> {
    Ok(liveness_repo::set_typing(conn, game_id, user_id, is_typing, now).await?)
}

/// Typing users, excluding the caller.
pub async fn typing_users<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
    caller: i64,
    now: OffsetDateTime,
) -> Result<Vec<LiveUser>, AppError> {
    let ids: Vec<i64> = liveness_repo::typing_users(conn, game_id, now)
        .await?
        .into_iter()
        .filter(|id| *id != caller)
        .collect();
    resolve_names(conn, ids).await
}
