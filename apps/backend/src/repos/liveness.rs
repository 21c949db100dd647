//! Presence heartbeats and typing flags.
//!
//! Both are time-window reads: stale rows are pruned before listing.

use sea_orm::ConnectionTrait;
use time::{Duration, OffsetDateTime};

use crate::adapters::{presence_sea, typing_sea};
use crate::errors::domain::DomainError;

pub const PRESENCE_WINDOW: Duration = Duration::seconds(30);
pub const TYPING_WINDOW: Duration = Duration::seconds(8);

pub async fn heartbeat<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
    user_id: i64,
    now: OffsetDateTime,
) -> Result<(), DomainError> {
    presence_sea::heartbeat(conn, game_id, user_id, now).await?;
    Ok(())
}

/// User ids seen within the presence window.
pub async fn active_users<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
    now: OffsetDateTime,
) -> Result<Vec<i64>, DomainError> {
    presence_sea::prune(conn, game_id, now - PRESENCE_WINDOW).await?;
    let rows = presence_sea::list(conn, game_id).await?;
    Ok(rows.into_iter().map(|r| r.user_id).collect())
}

pub async fn set_typing<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
    user_id: i64,
    is_typing: bool,
    now: OffsetDateTime,
) -> Result<(), DomainError> {
    typing_sea::set_typing(conn, game_id, user_id, is_typing, now).await?;
    Ok(())
}

/// User ids whose typing flag is set and fresh.
pub async fn typing_users<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
    now: OffsetDateTime,
) -> Result<Vec<i64>, DomainError> {
    typing_sea::prune(conn, game_id, now - TYPING_WINDOW).await?;
    let rows = typing_sea::list_typing(conn, game_id).await?;
    Ok(rows.into_iter().map(|r| r.user_id).collect())
}
