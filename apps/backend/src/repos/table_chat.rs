//! Out-of-character chat between participants.

use sea_orm::ConnectionTrait;
use serde::Serialize;

use crate::adapters::game_chats_sea;
use crate::entities::game_chats;
use crate::errors::domain::DomainError;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableChatMessage {
    pub id: i64,
    pub game_id: i64,
    pub user_id: i64,
    pub content: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: time::OffsetDateTime,
}

pub async fn post<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
    user_id: i64,
    content: &str,
) -> Result<TableChatMessage, DomainError> {
    let model = game_chats_sea::insert(conn, game_id, user_id, content.to_string()).await?;
    Ok(TableChatMessage::from(model))
}

pub async fn list<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
    after: Option<i64>,
    limit: u64,
) -> Result<Vec<TableChatMessage>, DomainError> {
    let rows = game_chats_sea::list(conn, game_id, after, limit).await?;
    Ok(rows.into_iter().map(TableChatMessage::from).collect())
}

impl From<game_chats::Model> for TableChatMessage {
    fn from(model: game_chats::Model) -> Self {
        Self {
            id: model.id,
            game_id: model.game_id,
            user_id: model.user_id,
            content: model.content,
            created_at: model.created_at,
        }
    }
}
