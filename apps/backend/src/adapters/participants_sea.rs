//! SeaORM adapter for game participants.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, NotSet, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set,
};

use crate::entities::game_participants::{self, SyncMode};

pub async fn find<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
    user_id: i64,
) -> Result<Option<game_participants::Model>, sea_orm::DbErr> {
    game_participants::Entity::find()
        .filter(game_participants::Column::GameId.eq(game_id))
        .filter(game_participants::Column::UserId.eq(user_id))
        .one(conn)
        .await
}

/// Participants in join order.
pub async fn list_by_game<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
) -> Result<Vec<game_participants::Model>, sea_orm::DbErr> {
    game_participants::Entity::find()
        .filter(game_participants::Column::GameId.eq(game_id))
        .order_by_asc(game_participants::Column::Id)
        .all(conn)
        .await
}

pub async fn count_by_game<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
) -> Result<u64, sea_orm::DbErr> {
    game_participants::Entity::find()
        .filter(game_participants::Column::GameId.eq(game_id))
        .count(conn)
        .await
}

/// Ids of every game `user_id` participates in.
pub async fn game_ids_for_user<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: i64,
) -> Result<Vec<i64>, sea_orm::DbErr> {
    game_participants::Entity::find()
        .select_only()
        .column(game_participants::Column::GameId)
        .filter(game_participants::Column::UserId.eq(user_id))
        .into_tuple::<i64>()
        .all(conn)
        .await
}

pub async fn create<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
    user_id: i64,
) -> Result<game_participants::Model, sea_orm::DbErr> {
    game_participants::ActiveModel {
        id: NotSet,
        game_id: Set(game_id),
        user_id: Set(user_id),
        sync_mode: Set(SyncMode::Main),
        sync_group: Set(None),
        inventory: Set("[]".to_string()),
        joined_at: Set(time::OffsetDateTime::now_utc()),
    }
    .insert(conn)
    .await
}

pub async fn delete<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
    user_id: i64,
) -> Result<u64, sea_orm::DbErr> {
    let result = game_participants::Entity::delete_many()
        .filter(game_participants::Column::GameId.eq(game_id))
        .filter(game_participants::Column::UserId.eq(user_id))
        .exec(conn)
        .await?;
    Ok(result.rows_affected)
}

pub async fn set_sync<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    participant_id: i64,
    mode: SyncMode,
    group: Option<String>,
) -> Result<game_participants::Model, sea_orm::DbErr> {
    game_participants::ActiveModel {
        id: Set(participant_id),
        sync_mode: Set(mode),
        sync_group: Set(group),
        ..Default::default()
    }
    .update(conn)
    .await
}

pub async fn set_inventory<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    participant_id: i64,
    inventory_json: String,
) -> Result<game_participants::Model, sea_orm::DbErr> {
    game_participants::ActiveModel {
        id: Set(participant_id),
        inventory: Set(inventory_json),
        ..Default::default()
    }
    .update(conn)
    .await
}
