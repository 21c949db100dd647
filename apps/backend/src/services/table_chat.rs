//! Out-of-character table talk.

use sea_orm::ConnectionTrait;

use crate::error::AppError;
use crate::errors::domain::{DomainError, ValidationKind};
use crate::repos::games as games_repo;
use crate::repos::table_chat::{self as table_chat_repo, TableChatMessage};

pub const MAX_CHAT_LEN: usize = 1000;
pub const PAGE_SIZE: u64 = 100;

pub async fn post_message<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
    user_id: i64,
    content: &str,
) -> Result<TableChatMessage, AppError> {
    let content = content.trim();
    if content.is_empty() || content.chars().count() > MAX_CHAT_LEN {
        return Err(DomainError::validation(
            ValidationKind::Message,
            format!("Message must be 1-{MAX_CHAT_LEN} characters"),
        )
        .into());
    }
    games_repo::require_game(conn, game_id)
        .await?
        .ensure_active()?;
    Ok(table_chat_repo::post(conn, game_id, user_id, content).await?)
}

pub async fn list_messages<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
    after: Option<i64>,
) -> Result<Vec<TableChatMessage>, AppError> {
    Ok(table_chat_repo::list(conn, game_id, after, PAGE_SIZE).await?)
}
