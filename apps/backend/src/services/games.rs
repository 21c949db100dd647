//! Game lifecycle: create, list, archive, leave, delete and sync setup.

use std::collections::HashSet;

use sea_orm::ConnectionTrait;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::domain::sync::validate_group_name;
use crate::domain::votes::retain_voters;
use crate::entities::game_participants::SyncMode;
use crate::entities::games::GameStatus;
use crate::error::AppError;
use crate::errors::domain::{ConflictKind, DomainError, ForbiddenKind, ValidationKind};
use crate::repos::games::{self as games_repo, Game, GameChanges};
use crate::repos::participants::{self as participants_repo, ParticipantSummary};
use crate::repos::pending_actions as pending_repo;

pub const MAX_PARTICIPANTS: u64 = 6;
pub const MAX_TITLE: usize = 100;
pub const MAX_SETTING: usize = 4000;
pub const MAX_SYNC_GROUPS: usize = 6;
pub const DEFAULT_ALIGNMENT: &str = "neutral";

#[derive(Debug, Clone, Deserialize)]
pub struct CreateGameRequest {
    pub title: String,
    #[serde(default)]
    pub setting: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct GameDetail {
    #[serde(flatten)]
    pub game: Game,
    pub participants: Vec<ParticipantSummary>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SyncAssignment {
    pub user_id: i64,
    pub mode: SyncMode,
    #[serde(default)]
    pub group: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SyncConfigRequest {
    pub groups: Vec<String>,
    #[serde(default)]
    pub assignments: Vec<SyncAssignment>,
}

pub fn ensure_owner(game: &Game, user_id: i64) -> Result<(), DomainError> {
    if game.owner_id == user_id {
        Ok(())
    } else {
        Err(DomainError::forbidden(
            ForbiddenKind::NotOwner,
            "Only the game owner can do that",
        ))
    }
}

/// Create a game with the caller as owner and first participant.
pub async fn create_game<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    owner_id: i64,
    req: CreateGameRequest,
) -> Result<GameDetail, AppError> {
    let title = req.title.trim();
    if title.is_empty() || title.chars().count() > MAX_TITLE {
        return Err(DomainError::validation(
            ValidationKind::Game,
            format!("Title must be 1-{MAX_TITLE} characters"),
        )
        .into());
    }
    if req.setting.chars().count() > MAX_SETTING {
        return Err(DomainError::validation(
            ValidationKind::Game,
            format!("Setting must be at most {MAX_SETTING} characters"),
        )
        .into());
    }

    let game =
        games_repo::create_game(conn, owner_id, title, req.setting.trim(), DEFAULT_ALIGNMENT).await?;
    participants_repo::add(conn, game.id, owner_id).await?;
    info!(game_id = game.id, owner_id, "Game created");

    game_detail(conn, game.id).await
}

/// Games the user participates in, optionally filtered by status.
pub async fn list_games<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: i64,
    status: Option<GameStatus>,
) -> Result<Vec<Game>, AppError> {
    let ids = participants_repo::game_ids_for_user(conn, user_id).await?;
    Ok(games_repo::find_by_ids(conn, &ids, status).await?)
}

pub async fn game_detail<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
) -> Result<GameDetail, AppError> {
    let game = games_repo::require_game(conn, game_id).await?;
    let participants = participants_repo::list_summaries(conn, game_id).await?;
    Ok(GameDetail { game, participants })
}

/// Owner deletes the game; child rows cascade.
pub async fn delete_game<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
    caller: i64,
) -> Result<(), AppError> {
    let game = games_repo::require_game(conn, game_id).await?;
    ensure_owner(&game, caller)?;
    games_repo::delete_game(conn, game_id).await?;
    info!(game_id, "Game deleted");
    Ok(())
}

/// Owner archives the game. A second archive is a conflict.
pub async fn archive_game<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
    caller: i64,
) -> Result<Game, AppError> {
    let game = games_repo::require_game(conn, game_id).await?;
    ensure_owner(&game, caller)?;
    if !games_repo::archive_if_active(conn, game_id).await? {
        return Err(DomainError::game_archived(game_id).into());
    }
    pending_repo::clear_game(conn, game_id).await?;
    info!(game_id, "Game archived by owner");
    Ok(games_repo::require_game(conn, game_id).await?)
}

/// A non-owner leaves; their staged turn and ballots go with them.
pub async fn leave_game<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
    caller: i64,
) -> Result<(), AppError> {
    let game = games_repo::require_game(conn, game_id).await?;
    if game.owner_id == caller {
        return Err(DomainError::conflict(
            ConflictKind::OwnerCannotLeave,
            "The owner cannot leave; delete or archive the game instead",
        )
        .into());
    }
    if !participants_repo::remove(conn, game_id, caller).await? {
        return Err(DomainError::forbidden(
            ForbiddenKind::NotAMember,
            "Not a participant in this game",
        )
        .into());
    }
    pending_repo::withdraw(conn, game_id, caller).await?;

    let remaining: Vec<i64> = participants_repo::list_by_game(conn, game_id)
        .await?
        .into_iter()
        .map(|p| p.user_id)
        .collect();
    let mut votes = game.votes;
    retain_voters(&mut votes, &remaining);
    games_repo::update_game(
        conn,
        game_id,
        GameChanges {
            votes: Some(votes),
            ..GameChanges::default()
        },
    )
    .await?;

    info!(game_id, user_id = caller, "Participant left game");
    Ok(())
}

fn validate_sync_request(req: &SyncConfigRequest) -> Result<HashSet<&str>, DomainError> {
    if req.groups.len() > MAX_SYNC_GROUPS {
        return Err(DomainError::validation(
            ValidationKind::SyncConfig,
            format!("At most {MAX_SYNC_GROUPS} sync groups"),
        ));
    }
    let mut names = HashSet::new();
    for name in &req.groups {
        validate_group_name(name)?;
        if !names.insert(name.as_str()) {
            return Err(DomainError::validation(
                ValidationKind::SyncConfig,
                format!("Duplicate group '{name}'"),
            ));
        }
    }
    let mut seen = HashSet::new();
    for a in &req.assignments {
        if !seen.insert(a.user_id) {
            return Err(DomainError::validation(
                ValidationKind::SyncConfig,
                format!("User {} assigned twice", a.user_id),
            ));
        }
        if let (SyncMode::Group, Some(group)) = (a.mode, a.group.as_deref()) {
            if !names.contains(group) {
                return Err(DomainError::validation(
                    ValidationKind::SyncConfig,
                    format!("Unknown group '{group}'"),
                ));
            }
        }
    }
    Ok(names)
}

/// Owner replaces the sync groups and per-participant modes.
///
/// Staged turns are discarded because barrier membership may change.
/// Participants left pointing at a removed group fall back to `main`.
pub async fn set_sync<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
    caller: i64,
    req: SyncConfigRequest,
) -> Result<GameDetail, AppError> {
    let game = games_repo::require_game(conn, game_id).await?;
    ensure_owner(&game, caller)?;
    game.ensure_active()?;
    let names = validate_sync_request(&req)?;

    let participants = participants_repo::list_by_game(conn, game_id).await?;
    for a in &req.assignments {
        if !participants.iter().any(|p| p.user_id == a.user_id) {
            return Err(DomainError::validation(
                ValidationKind::SyncConfig,
                format!("User {} is not a participant", a.user_id),
            )
            .into());
        }
    }

    for p in &participants {
        let (mode, group) = match req.assignments.iter().find(|a| a.user_id == p.user_id) {
            Some(a) if a.mode == SyncMode::Group => (SyncMode::Group, a.group.clone()),
            Some(a) => (a.mode, None),
            None => match (p.sync_mode, p.sync_group.as_deref()) {
                (SyncMode::Group, Some(g)) if !names.contains(g) => (SyncMode::Main, None),
                _ => (p.sync_mode, p.sync_group.clone()),
            },
        };
        if mode != p.sync_mode || group != p.sync_group {
            participants_repo::set_sync(conn, p.id, mode, group).await?;
        }
    }

    games_repo::update_game(
        conn,
        game_id,
        GameChanges {
            sync_groups: Some(req.groups.clone()),
            ..GameChanges::default()
        },
    )
    .await?;
    let cleared = pending_repo::clear_game(conn, game_id).await?;
    info!(game_id, groups = req.groups.len(), cleared, "Sync configuration updated");

    game_detail(conn, game_id).await
}
