//! Game repository functions for domain layer (generic over ConnectionTrait).

use sea_orm::ConnectionTrait;
use serde::Serialize;

use super::{decode_json, encode_json};
use crate::adapters::games_sea::{self as games_adapter, GameCreate, GameUpdate};
use crate::entities::games::{self, GameStatus};
use crate::errors::domain::{DomainError, NotFoundKind};

pub use crate::domain::votes::VoteBook;

/// Game domain model with its JSON columns decoded.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Game {
    pub id: i64,
    pub owner_id: i64,
    pub title: String,
    pub setting: String,
    pub status: GameStatus,
    pub level: i32,
    pub alignment: String,
    pub shared_inventory: Vec<String>,
    pub sync_groups: Vec<String>,
    pub votes: VoteBook,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: time::OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: time::OffsetDateTime,
    #[serde(with = "time::serde::rfc3339::option")]
    pub archived_at: Option<time::OffsetDateTime>,
}

impl Game {
    pub fn is_active(&self) -> bool {
        self.status == GameStatus::Active
    }

    /// Fail with `GameArchived` unless the game still accepts writes.
    pub fn ensure_active(&self) -> Result<(), DomainError> {
        if self.is_active() {
            Ok(())
        } else {
            Err(DomainError::game_archived(self.id))
        }
    }
}

/// Typed partial update; `None` leaves the column untouched.
#[derive(Debug, Clone, Default)]
pub struct GameChanges {
    pub level: Option<i32>,
    pub alignment: Option<String>,
    pub shared_inventory: Option<Vec<String>>,
    pub sync_groups: Option<Vec<String>>,
    pub votes: Option<VoteBook>,
}

impl GameChanges {
    fn into_update(self, game_id: i64) -> Result<GameUpdate, DomainError> {
        let mut dto = GameUpdate::new(game_id);
        if let Some(level) = self.level {
            dto = dto.with_level(level);
        }
        if let Some(alignment) = self.alignment {
            dto = dto.with_alignment(alignment);
        }
        if let Some(items) = self.shared_inventory {
            dto = dto.with_shared_inventory(encode_json(&items, "shared_inventory")?);
        }
        if let Some(groups) = self.sync_groups {
            dto = dto.with_sync_groups(encode_json(&groups, "sync_groups")?);
        }
        if let Some(votes) = self.votes {
            dto = dto.with_votes(encode_json(&votes, "votes")?);
        }
        Ok(dto)
    }
}

pub async fn find_by_id<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
) -> Result<Option<Game>, DomainError> {
    match games_adapter::find_by_id(conn, game_id).await? {
        Some(model) => Ok(Some(Game::try_from(model)?)),
        None => Ok(None),
    }
}

/// Like `find_by_id` but a missing game is an error.
pub async fn require_game<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
) -> Result<Game, DomainError> {
    find_by_id(conn, game_id).await?.ok_or_else(|| {
        DomainError::not_found(NotFoundKind::Game, format!("Game {game_id} not found"))
    })
}

pub async fn create_game<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    owner_id: i64,
    title: &str,
    setting: &str,
    alignment: &str,
) -> Result<Game, DomainError> {
    let model = games_adapter::create_game(
        conn,
        GameCreate {
            owner_id,
            title: title.to_string(),
            setting: setting.to_string(),
            alignment: alignment.to_string(),
        },
    )
    .await?;
    Game::try_from(model)
}

pub async fn find_by_ids<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    ids: &[i64],
    status: Option<GameStatus>,
) -> Result<Vec<Game>, DomainError> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }
    games_adapter::find_by_ids(conn, ids, status)
        .await?
        .into_iter()
        .map(Game::try_from)
        .collect()
}

pub async fn list_all<C: ConnectionTrait + Send + Sync>(conn: &C) -> Result<Vec<Game>, DomainError> {
    games_adapter::list_all(conn)
        .await?
        .into_iter()
        .map(Game::try_from)
        .collect()
}

pub async fn update_game<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
    changes: GameChanges,
) -> Result<Game, DomainError> {
    let dto = changes.into_update(game_id)?;
    let model = games_adapter::update_game(conn, dto).await?;
    Game::try_from(model)
}

pub async fn touch<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
) -> Result<(), DomainError> {
    games_adapter::touch(conn, game_id).await?;
    Ok(())
}

/// Returns `true` only for the call that performed the transition.
pub async fn archive_if_active<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
) -> Result<bool, DomainError> {
    let rows = games_adapter::archive_if_active(conn, game_id).await?;
    Ok(rows == 1)
}

pub async fn delete_game<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
) -> Result<(), DomainError> {
    let rows = games_adapter::delete_game(conn, game_id).await?;
    if rows == 0 {
        return Err(DomainError::not_found(
            NotFoundKind::Game,
            format!("Game {game_id} not found"),
        ));
    }
    Ok(())
}

impl TryFrom<games::Model> for Game {
    type Error = DomainError;

    fn try_from(model: games::Model) -> Result<Self, Self::Error> {
        Ok(Self {
            shared_inventory: decode_json(&model.shared_inventory, "games.shared_inventory")?,
            sync_groups: decode_json(&model.sync_groups, "games.sync_groups")?,
            votes: decode_json(&model.votes, "games.votes")?,
            id: model.id,
            owner_id: model.owner_id,
            title: model.title,
            setting: model.setting,
            status: model.status,
            level: model.level,
            alignment: model.alignment,
            created_at: model.created_at,
            updated_at: model.updated_at,
            archived_at: model.archived_at,
        })
    }
}
