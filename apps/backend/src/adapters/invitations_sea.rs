//! SeaORM adapter for invitations.

use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, NotSet, QueryFilter, QueryOrder,
    Set,
};

use crate::entities::invitations::{self, InvitationStatus};

pub async fn create<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
    inviter_id: i64,
    invitee_id: i64,
) -> Result<invitations::Model, sea_orm::DbErr> {
    invitations::ActiveModel {
        id: NotSet,
        game_id: Set(game_id),
        inviter_id: Set(inviter_id),
        invitee_id: Set(invitee_id),
        status: Set(InvitationStatus::Pending),
        created_at: Set(time::OffsetDateTime::now_utc()),
        responded_at: Set(None),
    }
    .insert(conn)
    .await
}

pub async fn find_by_id<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    id: i64,
) -> Result<Option<invitations::Model>, sea_orm::DbErr> {
    invitations::Entity::find_by_id(id).one(conn).await
}

pub async fn find_pending<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
    invitee_id: i64,
) -> Result<Option<invitations::Model>, sea_orm::DbErr> {
    invitations::Entity::find()
        .filter(invitations::Column::GameId.eq(game_id))
        .filter(invitations::Column::InviteeId.eq(invitee_id))
        .filter(invitations::Column::Status.eq(InvitationStatus::Pending))
        .one(conn)
        .await
}

pub async fn list_pending_for_invitee<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    invitee_id: i64,
) -> Result<Vec<invitations::Model>, sea_orm::DbErr> {
    invitations::Entity::find()
        .filter(invitations::Column::InviteeId.eq(invitee_id))
        .filter(invitations::Column::Status.eq(InvitationStatus::Pending))
        .order_by_desc(invitations::Column::Id)
        .all(conn)
        .await
}

/// Resolve a pending invitation. Returns 0 if it was no longer pending.
pub async fn resolve<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    id: i64,
    status: InvitationStatus,
) -> Result<u64, sea_orm::DbErr> {
    let result = invitations::Entity::update_many()
        .col_expr(invitations::Column::Status, Expr::value(status))
        .col_expr(
            invitations::Column::RespondedAt,
            Expr::value(Some(time::OffsetDateTime::now_utc())),
        )
        .filter(invitations::Column::Id.eq(id))
        .filter(invitations::Column::Status.eq(InvitationStatus::Pending))
        .exec(conn)
        .await?;
    Ok(result.rows_affected)
}
