//! Invitations: owner invites by username; invitee accepts or declines.

use std::collections::HashMap;

use sea_orm::ConnectionTrait;
use serde::Serialize;
use tracing::info;

use crate::entities::invitations::InvitationStatus;
use crate::error::AppError;
use crate::errors::domain::{ConflictKind, DomainError, NotFoundKind, ValidationKind};
use crate::repos::games as games_repo;
use crate::repos::invitations::{self as invitations_repo, Invitation};
use crate::repos::participants as participants_repo;
use crate::repos::users as users_repo;
use crate::services::games::{ensure_owner, MAX_PARTICIPANTS};

#[derive(Debug, Clone, Serialize)]
pub struct InvitationView {
    #[serde(flatten)]
    pub invitation: Invitation,
    pub game_title: String,
    pub inviter_username: String,
}

fn not_found(id: i64) -> AppError {
    DomainError::not_found(NotFoundKind::Invitation, format!("Invitation {id} not found")).into()
}

async fn ensure_room<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
) -> Result<(), AppError> {
    if participants_repo::count_by_game(conn, game_id).await? >= MAX_PARTICIPANTS {
        return Err(DomainError::validation(
            ValidationKind::GameFull,
            format!("Game already has {MAX_PARTICIPANTS} participants"),
        )
        .into());
    }
    Ok(())
}

pub async fn invite<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
    inviter_id: i64,
    username: &str,
) -> Result<Invitation, AppError> {
    let game = games_repo::require_game(conn, game_id).await?;
    ensure_owner(&game, inviter_id)?;
    game.ensure_active()?;

    let invitee = users_repo::find_user_by_username(conn, username.trim())
        .await?
        .ok_or_else(|| {
            DomainError::not_found(NotFoundKind::User, format!("No user named '{}'", username.trim()))
        })?;
    if participants_repo::find(conn, game_id, invitee.id).await?.is_some() {
        return Err(DomainError::conflict(
            ConflictKind::AlreadyParticipant,
            "User already participates in this game",
        )
        .into());
    }
    if invitations_repo::find_pending(conn, game_id, invitee.id).await?.is_some() {
        return Err(DomainError::conflict(
            ConflictKind::Other("AlreadyInvited".into()),
            "User already has a pending invitation to this game",
        )
        .into());
    }
    ensure_room(conn, game_id).await?;

    let invitation = invitations_repo::create(conn, game_id, inviter_id, invitee.id).await?;
    info!(game_id, invitee_id = invitee.id, invitation_id = invitation.id, "Invitation sent");
    Ok(invitation)
}

pub async fn list_pending<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: i64,
) -> Result<Vec<InvitationView>, AppError> {
    let invitations = invitations_repo::list_pending_for(conn, user_id).await?;

    let game_ids: Vec<i64> = invitations.iter().map(|i| i.game_id).collect();
    let titles: HashMap<i64, String> = games_repo::find_by_ids(conn, &game_ids, None)
        .await?
        .into_iter()
        .map(|g| (g.id, g.title))
        .collect();
    let inviter_ids: Vec<i64> = invitations.iter().map(|i| i.inviter_id).collect();
    let inviters: HashMap<i64, String> = users_repo::find_users_by_ids(conn, &inviter_ids)
        .await?
        .into_iter()
        .map(|u| (u.id, u.username))
        .collect();

    Ok(invitations
        .into_iter()
        .map(|invitation| InvitationView {
            game_title: titles.get(&invitation.game_id).cloned().unwrap_or_default(),
            inviter_username: inviters
                .get(&invitation.inviter_id)
                .cloned()
                .unwrap_or_default(),
            invitation,
        })
        .collect())
}

/// Answer an invitation addressed to `user_id`. Run inside a transaction.
pub async fn respond<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    invitation_id: i64,
    user_id: i64,
    accept: bool,
) -> Result<Invitation, AppError> {
    let invitation = invitations_repo::find_by_id(conn, invitation_id)
        .await?
        .filter(|i| i.invitee_id == user_id)
        .ok_or_else(|| not_found(invitation_id))?;
    if invitation.status != InvitationStatus::Pending {
        return Err(DomainError::conflict(
            ConflictKind::InvitationResolved,
            "Invitation was already answered",
        )
        .into());
    }

    if accept {
        let game = games_repo::require_game(conn, invitation.game_id).await?;
        game.ensure_active()?;
        ensure_room(conn, game.id).await?;
    }

    let status = if accept {
        InvitationStatus::Accepted
    } else {
        InvitationStatus::Declined
    };
    if !invitations_repo::resolve(conn, invitation_id, status).await? {
        return Err(DomainError::conflict(
            ConflictKind::InvitationResolved,
            "Invitation was already answered",
        )
        .into());
    }
    if accept {
        participants_repo::add(conn, invitation.game_id, user_id).await?;
    }

    info!(invitation_id, game_id = invitation.game_id, user_id, accept, "Invitation answered");
    invitations_repo::find_by_id(conn, invitation_id)
        .await?
        .ok_or_else(|| not_found(invitation_id))
}
