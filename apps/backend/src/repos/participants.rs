//! Participant list of a game.

use std::collections::HashMap;

use sea_orm::ConnectionTrait;
use serde::Serialize;

use super::{decode_json, encode_json};
use crate::adapters::{participants_sea, profiles_sea, users_sea};
use crate::entities::game_participants::{self, SyncMode};
use crate::errors::domain::DomainError;

#[derive(Debug, Clone, PartialEq)]
pub struct Participant {
    pub id: i64,
    pub game_id: i64,
    pub user_id: i64,
    pub sync_mode: SyncMode,
    pub sync_group: Option<String>,
    pub inventory: Vec<String>,
    pub joined_at: time::OffsetDateTime,
}

/// Participant joined with the names players see.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParticipantSummary {
    pub user_id: i64,
    pub username: String,
    pub character_name: String,
    pub sync_mode: SyncMode,
    pub sync_group: Option<String>,
    pub inventory: Vec<String>,
}

impl ParticipantSummary {
    /// Name used in prompts and waiting lists.
    pub fn display_name(&self) -> &str {
        if self.character_name.trim().is_empty() {
            &self.username
        } else {
            &self.character_name
        }
    }
}

pub async fn find<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
    user_id: i64,
) -> Result<Option<Participant>, DomainError> {
    match participants_sea::find(conn, game_id, user_id).await? {
        Some(model) => Ok(Some(Participant::try_from(model)?)),
        None => Ok(None),
    }
}

pub async fn list_by_game<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
) -> Result<Vec<Participant>, DomainError> {
    participants_sea::list_by_game(conn, game_id)
        .await?
        .into_iter()
        .map(Participant::try_from)
        .collect()
}

/// Participants in join order, with usernames and character names.
pub async fn list_summaries<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
) -> Result<Vec<ParticipantSummary>, DomainError> {
    let participants = list_by_game(conn, game_id).await?;
    let ids: Vec<i64> = participants.iter().map(|p| p.user_id).collect();

    let usernames: HashMap<i64, String> = users_sea::find_by_ids(conn, &ids)
        .await?
        .into_iter()
        .map(|u| (u.id, u.username))
        .collect();
    let characters: HashMap<i64, String> = profiles_sea::find_by_user_ids(conn, &ids)
        .await?
        .into_iter()
        .map(|p| (p.user_id, p.character_name))
        .collect();

    Ok(participants
        .into_iter()
        .map(|p| ParticipantSummary {
            username: usernames.get(&p.user_id).cloned().unwrap_or_default(),
            character_name: characters.get(&p.user_id).cloned().unwrap_or_default(),
            user_id: p.user_id,
            sync_mode: p.sync_mode,
            sync_group: p.sync_group,
            inventory: p.inventory,
        })
        .collect())
}

pub async fn count_by_game<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
) -> Result<u64, DomainError> {
    Ok(participants_sea::count_by_game(conn, game_id).await?)
}

pub async fn game_ids_for_user<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: i64,
) -> Result<Vec<i64>, DomainError> {
    Ok(participants_sea::game_ids_for_user(conn, user_id).await?)
}

/// Add a participant; a duplicate surfaces as `AlreadyParticipant`.
pub async fn add<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
    user_id: i64,
) -> Result<Participant, DomainError> {
    let model = participants_sea::create(conn, game_id, user_id).await?;
    Participant::try_from(model)
}

pub async fn remove<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
    user_id: i64,
) -> Result<bool, DomainError> {
    Ok(participants_sea::delete(conn, game_id, user_id).await? > 0)
}

pub async fn set_sync<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    participant_id: i64,
    mode: SyncMode,
    group: Option<String>,
) -> Result<Participant, DomainError> {
    let model = participants_sea::set_sync(conn, participant_id, mode, group).await?;
    Participant::try_from(model)
}

pub async fn set_inventory<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    participant_id: i64,
    inventory: &[String],
) -> Result<Participant, DomainError> {
    let json = encode_json(&inventory, "inventory")?;
    let model = participants_sea::set_inventory(conn, participant_id, json).await?;
    Participant::try_from(model)
}

impl TryFrom<game_participants::Model> for Participant {
    type Error = DomainError;

    fn try_from(model: game_participants::Model) -> Result<Self, Self::Error> {
        Ok(Self {
            inventory: decode_json(&model.inventory, "game_participants.inventory")?,
            id: model.id,
            game_id: model.game_id,
            user_id: model.user_id,
            sync_mode: model.sync_mode,
            sync_group: model.sync_group,
            joined_at: model.joined_at,
        })
    }
}
