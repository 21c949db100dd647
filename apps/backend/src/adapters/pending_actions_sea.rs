//! SeaORM adapter for staged turns.

use sea_orm::sea_query::OnConflict;
use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, NotSet, QueryFilter, QueryOrder, Set};

use crate::entities::pending_actions;

fn unique_key() -> OnConflict {
    OnConflict::columns([
        pending_actions::Column::GameId,
        pending_actions::Column::UserId,
        pending_actions::Column::SyncGroup,
    ])
}

/// Insert or overwrite the caller's staged text for `sync_group`.
pub async fn upsert<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
    user_id: i64,
    sync_group: &str,
    content: &str,
) -> Result<u64, sea_orm::DbErr> {
    let active = pending_actions::ActiveModel {
        id: NotSet,
        game_id: Set(game_id),
        user_id: Set(user_id),
        sync_group: Set(sync_group.to_string()),
        content: Set(content.to_string()),
        created_at: Set(time::OffsetDateTime::now_utc()),
    };

    pending_actions::Entity::insert(active)
        .on_conflict(
            unique_key()
                .update_columns([
                    pending_actions::Column::Content,
                    pending_actions::Column::CreatedAt,
                ])
                .to_owned(),
        )
        .exec_without_returning(conn)
        .await
}

/// Rows staged for a barrier group, in submission order.
pub async fn list_for_group<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
    sync_group: &str,
) -> Result<Vec<pending_actions::Model>, sea_orm::DbErr> {
    pending_actions::Entity::find()
        .filter(pending_actions::Column::GameId.eq(game_id))
        .filter(pending_actions::Column::SyncGroup.eq(sync_group))
        .order_by_asc(pending_actions::Column::CreatedAt)
        .order_by_asc(pending_actions::Column::Id)
        .all(conn)
        .await
}

pub async fn list_for_game<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
) -> Result<Vec<pending_actions::Model>, sea_orm::DbErr> {
    pending_actions::Entity::find()
        .filter(pending_actions::Column::GameId.eq(game_id))
        .order_by_asc(pending_actions::Column::Id)
        .all(conn)
        .await
}

pub async fn list_for_user<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
    user_id: i64,
) -> Result<Vec<pending_actions::Model>, sea_orm::DbErr> {
    pending_actions::Entity::find()
        .filter(pending_actions::Column::GameId.eq(game_id))
        .filter(pending_actions::Column::UserId.eq(user_id))
        .all(conn)
        .await
}

/// Delete exactly the given rows; the count tells the caller whether it
/// won the claim.
pub async fn delete_ids<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    ids: &[i64],
) -> Result<u64, sea_orm::DbErr> {
    if ids.is_empty() {
        return Ok(0);
    }
    let result = pending_actions::Entity::delete_many()
        .filter(pending_actions::Column::Id.is_in(ids.to_vec()))
        .exec(conn)
        .await?;
    Ok(result.rows_affected)
}

pub async fn delete_for_user<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
    user_id: i64,
) -> Result<u64, sea_orm::DbErr> {
    let result = pending_actions::Entity::delete_many()
        .filter(pending_actions::Column::GameId.eq(game_id))
        .filter(pending_actions::Column::UserId.eq(user_id))
        .exec(conn)
        .await?;
    Ok(result.rows_affected)
}

pub async fn delete_for_game<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
) -> Result<u64, sea_orm::DbErr> {
    let result = pending_actions::Entity::delete_many()
        .filter(pending_actions::Column::GameId.eq(game_id))
        .exec(conn)
        .await?;
    Ok(result.rows_affected)
}

/// Put claimed rows back. A row whose owner has already resubmitted keeps
/// the newer text.
pub async fn restore<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    rows: &[pending_actions::Model],
) -> Result<u64, sea_orm::DbErr> {
    let mut restored = 0;
    for row in rows {
        let active = pending_actions::ActiveModel {
            id: NotSet,
            game_id: Set(row.game_id),
            user_id: Set(row.user_id),
            sync_group: Set(row.sync_group.clone()),
            content: Set(row.content.clone()),
            created_at: Set(row.created_at),
        };
        restored += pending_actions::Entity::insert(active)
            .on_conflict(unique_key().do_nothing().to_owned())
            .exec_without_returning(conn)
            .await?;
    }
    Ok(restored)
}
