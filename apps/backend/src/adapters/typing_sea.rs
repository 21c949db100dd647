//! SeaORM adapter for typing indicators.

use sea_orm::sea_query::OnConflict;
use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, NotSet, QueryFilter, QueryOrder, Set};
use time::OffsetDateTime;

use crate::entities::typing_status;

pub async fn set_typing<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
    user_id: i64,
    is_typing: bool,
    now: OffsetDateTime,
) -> Result<u64, sea_orm::DbErr> {
    let active = typing_status::ActiveModel {
        id: NotSet,
        game_id: Set(game_id),
        user_id: Set(user_id),
        is_typing: Set(is_typing),
        updated_at: Set(now),
    };
    typing_status::Entity::insert(active)
        .on_conflict(
            OnConflict::columns([typing_status::Column::GameId, typing_status::Column::UserId])
                .update_columns([
                    typing_status::Column::IsTyping,
                    typing_status::Column::UpdatedAt,
                ])
                .to_owned(),
        )
        .exec_without_returning(conn)
        .await
}

/// Drop rows not refreshed since `cutoff`.
pub async fn prune<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
    cutoff: OffsetDateTime,
) -> Result<u64, sea_orm::DbErr> {
    let result = typing_status::Entity::delete_many()
        .filter(typing_status::Column::GameId.eq(game_id))
        .filter(typing_status::Column::UpdatedAt.lt(cutoff))
        .exec(conn)
        .await?;
    Ok(result.rows_affected)
}

pub async fn list_typing<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
) -> Result<Vec<typing_status::Model>, sea_orm::DbErr> {
    typing_status::Entity::find()
        .filter(typing_status::Column::GameId.eq(game_id))
        .filter(typing_status::Column::IsTyping.eq(true))
        .order_by_asc(typing_status::Column::UserId)
        .all(conn)
        .await
}
