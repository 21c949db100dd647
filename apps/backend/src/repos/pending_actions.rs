//! Staged turn rows backing the turn barrier.

use sea_orm::ConnectionTrait;

use crate::adapters::pending_actions_sea;
use crate::entities::pending_actions;
use crate::errors::domain::DomainError;

pub type PendingAction = pending_actions::Model;

pub async fn upsert<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
    user_id: i64,
    thread: &str,
    content: &str,
) -> Result<(), DomainError> {
    pending_actions_sea::upsert(conn, game_id, user_id, thread, content).await?;
    Ok(())
}

pub async fn list_for_thread<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
    thread: &str,
) -> Result<Vec<PendingAction>, DomainError> {
    Ok(pending_actions_sea::list_for_group(conn, game_id, thread).await?)
}

pub async fn list_for_game<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
) -> Result<Vec<PendingAction>, DomainError> {
    Ok(pending_actions_sea::list_for_game(conn, game_id).await?)
}

pub async fn list_for_user<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
    user_id: i64,
) -> Result<Vec<PendingAction>, DomainError> {
    Ok(pending_actions_sea::list_for_user(conn, game_id, user_id).await?)
}

/// Delete the rows that were read. `true` means this caller owns the turn;
/// on `false` the caller must roll back, never restore.
pub async fn claim<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    rows: &[PendingAction],
) -> Result<bool, DomainError> {
    let ids: Vec<i64> = rows.iter().map(|r| r.id).collect();
    let deleted = pending_actions_sea::delete_ids(conn, &ids).await?;
    Ok(deleted == ids.len() as u64)
}

pub async fn withdraw<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
    user_id: i64,
) -> Result<u64, DomainError> {
    Ok(pending_actions_sea::delete_for_user(conn, game_id, user_id).await?)
}

pub async fn clear_game<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
) -> Result<u64, DomainError> {
    Ok(pending_actions_sea::delete_for_game(conn, game_id).await?)
}

pub async fn restore<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    rows: &[PendingAction],
) -> Result<u64, DomainError> {
    Ok(pending_actions_sea::restore(conn, rows).await?)
}
