//! SeaORM adapter for the narrative log.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, NotSet, QueryFilter, QueryOrder,
    QuerySelect, Set,
};

use crate::entities::messages::{self, MessageRole};

#[derive(Debug, Clone)]
pub struct MessageCreate {
    pub game_id: i64,
    pub thread: String,
    pub role: MessageRole,
    pub content: String,
    pub author_id: Option<i64>,
}

pub async fn insert<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    dto: MessageCreate,
) -> Result<messages::Model, sea_orm::DbErr> {
    messages::ActiveModel {
        id: NotSet,
        game_id: Set(dto.game_id),
        thread: Set(dto.thread),
        role: Set(dto.role),
        content: Set(dto.content),
        author_id: Set(dto.author_id),
        created_at: Set(time::OffsetDateTime::now_utc()),
    }
    .insert(conn)
    .await
}

/// Oldest-first page of messages with id greater than `after`.
pub async fn list<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
    thread: Option<&str>,
    after: Option<i64>,
    limit: u64,
) -> Result<Vec<messages::Model>, sea_orm::DbErr> {
    let mut query = messages::Entity::find().filter(messages::Column::GameId.eq(game_id));
    if let Some(thread) = thread {
        query = query.filter(messages::Column::Thread.eq(thread));
    }
    if let Some(after) = after {
        query = query.filter(messages::Column::Id.gt(after));
    }
    query
        .order_by_asc(messages::Column::Id)
        .limit(limit)
        .all(conn)
        .await
}

/// The last `limit` messages of a thread, returned oldest first.
pub async fn recent_in_thread<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
    thread: &str,
    limit: u64,
) -> Result<Vec<messages::Model>, sea_orm::DbErr> {
    let mut rows = messages::Entity::find()
        .filter(messages::Column::GameId.eq(game_id))
        .filter(messages::Column::Thread.eq(thread))
        .order_by_desc(messages::Column::Id)
        .limit(limit)
        .all(conn)
        .await?;
    rows.reverse();
    Ok(rows)
}
