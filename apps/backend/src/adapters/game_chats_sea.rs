//! SeaORM adapter for out-of-character table chat.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, NotSet, QueryFilter, QueryOrder,
    QuerySelect, Set,
};

use crate::entities::game_chats;

pub async fn insert<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
    user_id: i64,
    content: String,
) -> Result<game_chats::Model, sea_orm::DbErr> {
    game_chats::ActiveModel {
        id: NotSet,
        game_id: Set(game_id),
        user_id: Set(user_id),
        content: Set(content),
        created_at: Set(time::OffsetDateTime::now_utc()),
    }
    .insert(conn)
    .await
}

pub async fn list<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
    after: Option<i64>,
    limit: u64,
) -> Result<Vec<game_chats::Model>, sea_orm::DbErr> {
    let mut query = game_chats::Entity::find().filter(game_chats::Column::GameId.eq(game_id));
    if let Some(after) = after {
        query = query.filter(game_chats::Column::Id.gt(after));
    }
    query
        .order_by_asc(game_chats::Column::Id)
        .limit(limit)
        .all(conn)
        .await
}
