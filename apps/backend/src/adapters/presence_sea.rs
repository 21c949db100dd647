//! SeaORM adapter for presence heartbeats.

use sea_orm::sea_query::OnConflict;
use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, NotSet, QueryFilter, QueryOrder, Set};
use time::OffsetDateTime;

use crate::entities::presence;

pub async fn heartbeat<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
    user_id: i64,
    now: OffsetDateTime,
) -> Result<u64, sea_orm::DbErr> {
    let active = presence::ActiveModel {
        id: NotSet,
        game_id: Set(game_id),
        user_id: Set(user_id),
        last_seen: Set(now),
    };
    presence::Entity::insert(active)
        .on_conflict(
            OnConflict::columns([presence::Column::GameId, presence::Column::UserId])
                .update_column(presence::Column::LastSeen)
                .to_owned(),
        )
        .exec_without_returning(conn)
        .await
}

/// Drop rows last seen before `cutoff`.
pub async fn prune<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
    cutoff: OffsetDateTime,
) -> Result<u64, sea_orm::DbErr> {
    let result = presence::Entity::delete_many()
        .filter(presence::Column::GameId.eq(game_id))
        .filter(presence::Column::LastSeen.lt(cutoff))
        .exec(conn)
        .await?;
    Ok(result.rows_affected)
}

pub async fn list<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
) -> Result<Vec<presence::Model>, sea_orm::DbErr> {
    presence::Entity::find()
        .filter(presence::Column::GameId.eq(game_id))
        .order_by_asc(presence::Column::UserId)
        .all(conn)
        .await
}
