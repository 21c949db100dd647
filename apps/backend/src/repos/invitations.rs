//! Invitation repository.

use sea_orm::ConnectionTrait;
use serde::Serialize;

use crate::adapters::invitations_sea;
use crate::entities::invitations::{self, InvitationStatus};
use crate::errors::domain::DomainError;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Invitation {
    pub id: i64,
    pub game_id: i64,
    pub inviter_id: i64,
    pub invitee_id: i64,
    pub status: InvitationStatus,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: time::OffsetDateTime,
    #[serde(with = "time::serde::rfc3339::option")]
    pub responded_at: Option<time::OffsetDateTime>,
}

pub async fn create<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
    inviter_id: i64,
    invitee_id: i64,
) -> Result<Invitation, DomainError> {
    let model = invitations_sea::create(conn, game_id, inviter_id, invitee_id).await?;
    Ok(Invitation::from(model))
}

pub async fn find_by_id<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    id: i64,
) -> Result<Option<Invitation>, DomainError> {
    Ok(invitations_sea::find_by_id(conn, id).await?.map(Invitation::from))
}

pub async fn find_pending<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
    invitee_id: i64,
) -> Result<Option<Invitation>, DomainError> {
    Ok(invitations_sea::find_pending(conn, game_id, invitee_id)
        .await?
        .map(Invitation::from))
}

pub async fn list_pending_for<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    invitee_id: i64,
) -> Result<Vec<Invitation>, DomainError> {
    let rows = invitations_sea::list_pending_for_invitee(conn, invitee_id).await?;
    Ok(rows.into_iter().map(Invitation::from).collect())
}

/// `false` when the invitation had already been answered.
pub async fn resolve<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    id: i64,
    status: InvitationStatus,
) -> Result<bool, DomainError> {
    Ok(invitations_sea::resolve(conn, id, status).await? == 1)
}

impl From<invitations::Model> for Invitation {
    fn from(model: invitations::Model) -> Self {
        Self {
            id: model.id,
            game_id: model.game_id,
            inviter_id: model.inviter_id,
            invitee_id: model.invitee_id,
            status: model.status,
            created_at: model.created_at,
            responded_at: model.responded_at,
        }
    }
}
