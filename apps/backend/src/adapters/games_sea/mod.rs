//! SeaORM adapter for games.

use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, NotSet, QueryFilter, QueryOrder,
    Set,
};

use crate::entities::games::{self, GameStatus};

pub mod dto;

pub use dto::{GameCreate, GameUpdate};

pub async fn find_by_id<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
) -> Result<Option<games::Model>, sea_orm::DbErr> {
    games::Entity::find_by_id(game_id).one(conn).await
}

pub async fn create_game<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    dto: GameCreate,
) -> Result<games::Model, sea_orm::DbErr> {
    let now = time::OffsetDateTime::now_utc();
    games::ActiveModel {
        id: NotSet,
        owner_id: Set(dto.owner_id),
        title: Set(dto.title),
        setting: Set(dto.setting),
        status: Set(GameStatus::Active),
        level: Set(1),
        alignment: Set(dto.alignment),
        shared_inventory: Set("[]".to_string()),
        sync_groups: Set("[]".to_string()),
        votes: Set("{}".to_string()),
        created_at: Set(now),
        updated_at: Set(now),
        archived_at: Set(None),
    }
    .insert(conn)
    .await
}

/// Games whose id is in `ids`, newest activity first.
pub async fn find_by_ids<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    ids: &[i64],
    status: Option<GameStatus>,
) -> Result<Vec<games::Model>, sea_orm::DbErr> {
    let mut query = games::Entity::find().filter(games::Column::Id.is_in(ids.to_vec()));
    if let Some(status) = status {
        query = query.filter(games::Column::Status.eq(status));
    }
    query
        .order_by_desc(games::Column::UpdatedAt)
        .order_by_desc(games::Column::Id)
        .all(conn)
        .await
}

pub async fn list_all<C: ConnectionTrait + Send + Sync>(
    conn: &C,
) -> Result<Vec<games::Model>, sea_orm::DbErr> {
    games::Entity::find()
        .order_by_desc(games::Column::Id)
        .all(conn)
        .await
}

pub async fn update_game<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    dto: GameUpdate,
) -> Result<games::Model, sea_orm::DbErr> {
    let set_opt = |v: Option<String>| match v {
        Some(v) => Set(v),
        None => NotSet,
    };

    let active = games::ActiveModel {
        id: Set(dto.id),
        level: match dto.level {
            Some(l) => Set(l),
            None => NotSet,
        },
        alignment: set_opt(dto.alignment),
        shared_inventory: set_opt(dto.shared_inventory),
        sync_groups: set_opt(dto.sync_groups),
        votes: set_opt(dto.votes),
        updated_at: Set(time::OffsetDateTime::now_utc()),
        ..Default::default()
    };
    active.update(conn).await
}

/// Bump `updated_at` so listings surface recently played games first.
pub async fn touch<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
) -> Result<u64, sea_orm::DbErr> {
    let result = games::Entity::update_many()
        .col_expr(
            games::Column::UpdatedAt,
            Expr::value(time::OffsetDateTime::now_utc()),
        )
        .filter(games::Column::Id.eq(game_id))
        .exec(conn)
        .await?;
    Ok(result.rows_affected)
}

/// Conditional transition `active -> archived`. Returns rows affected
/// (0 when the game was already archived).
pub async fn archive_if_active<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
) -> Result<u64, sea_orm::DbErr> {
    let now = time::OffsetDateTime::now_utc();
    let result = games::Entity::update_many()
        .col_expr(games::Column::Status, Expr::value(GameStatus::Archived))
        .col_expr(games::Column::ArchivedAt, Expr::value(Some(now)))
        .col_expr(games::Column::UpdatedAt, Expr::value(now))
        .filter(games::Column::Id.eq(game_id))
        .filter(games::Column::Status.eq(GameStatus::Active))
        .exec(conn)
        .await?;
    Ok(result.rows_affected)
}

pub async fn delete_game<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
) -> Result<u64, sea_orm::DbErr> {
    let result = games::Entity::delete_by_id(game_id).exec(conn).await?;
    Ok(result.rows_affected)
}
