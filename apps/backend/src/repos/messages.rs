//! Narrative log repository.

use sea_orm::ConnectionTrait;
use serde::Serialize;

use crate::adapters::messages_sea::{self, MessageCreate};
use crate::entities::messages::{self, MessageRole};
use crate::errors::domain::DomainError;

/// Page size cap for polling reads.
pub const MAX_PAGE: u64 = 200;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Message {
    pub id: i64,
    pub game_id: i64,
    pub thread: String,
    pub role: MessageRole,
    pub content: String,
    pub author_id: Option<i64>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: time::OffsetDateTime,
}

pub async fn append<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
    thread: &str,
    role: MessageRole,
    content: &str,
    author_id: Option<i64>,
) -> Result<Message, DomainError> {
    let model = messages_sea::insert(
        conn,
        MessageCreate {
            game_id,
            thread: thread.to_string(),
            role,
            content: content.to_string(),
            author_id,
        },
    )
    .await?;
    Ok(Message::from(model))
}

pub async fn list<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
    thread: Option<&str>,
    after: Option<i64>,
    limit: u64,
) -> Result<Vec<Message>, DomainError> {
    let rows = messages_sea::list(conn, game_id, thread, after, limit.min(MAX_PAGE)).await?;
    Ok(rows.into_iter().map(Message::from).collect())
}

/// The tail of a thread in chronological order, used as prompt history.
pub async fn recent_in_thread<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
    thread: &str,
    limit: u64,
) -> Result<Vec<Message>, DomainError> {
    let rows = messages_sea::recent_in_thread(conn, game_id, thread, limit).await?;
    Ok(rows.into_iter().map(Message::from).collect())
}

impl From<messages::Model> for Message {
    fn from(model: messages::Model) -> Self {
        Self {
            id: model.id,
            game_id: model.game_id,
            thread: model.thread,
            role: model.role,
            content: model.content,
            author_id: model.author_id,
            created_at: model.created_at,
        }
    }
}
