//! Character sheet repository.

use sea_orm::ConnectionTrait;
use serde::{Deserialize, Serialize};

use crate::adapters::profiles_sea as profiles_adapter;
use crate::errors::domain::{DomainError, NotFoundKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attributes {
    pub strength: i32,
    pub dexterity: i32,
    pub constitution: i32,
    pub intelligence: i32,
    pub wisdom: i32,
    pub charisma: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Profile {
    pub user_id: i64,
    pub character_name: String,
    pub attributes: Attributes,
    pub preferences: String,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: time::OffsetDateTime,
}

#[derive(Debug, Clone)]
pub struct ProfileChanges {
    pub character_name: String,
    pub attributes: Attributes,
    pub preferences: String,
}

pub async fn find_by_user_id<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: i64,
) -> Result<Option<Profile>, DomainError> {
    let profile = profiles_adapter::find_by_user_id(conn, user_id).await?;
    Ok(profile.map(Profile::from))
}

pub async fn find_by_user_ids<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_ids: &[i64],
) -> Result<Vec<Profile>, DomainError> {
    let profiles = profiles_adapter::find_by_user_ids(conn, user_ids).await?;
    Ok(profiles.into_iter().map(Profile::from).collect())
}

pub async fn create_default<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: i64,
    character_name: &str,
) -> Result<Profile, DomainError> {
    let profile = profiles_adapter::create_default(conn, user_id, character_name).await?;
    Ok(Profile::from(profile))
}

pub async fn update_profile<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: i64,
    changes: ProfileChanges,
) -> Result<Profile, DomainError> {
    let existing = profiles_adapter::find_by_user_id(conn, user_id)
        .await?
        .ok_or_else(|| {
            DomainError::not_found(NotFoundKind::Profile, format!("No profile for user {user_id}"))
        })?;
    let dto = profiles_adapter::ProfileUpdate {
        character_name: changes.character_name,
        strength: changes.attributes.strength,
        dexterity: changes.attributes.dexterity,
        constitution: changes.attributes.constitution,
        intelligence: changes.attributes.intelligence,
        wisdom: changes.attributes.wisdom,
        charisma: changes.attributes.charisma,
        preferences: changes.preferences,
    };
    let updated = profiles_adapter::update_profile(conn, existing, dto).await?;
    Ok(Profile::from(updated))
}

impl From<crate::entities::profiles::Model> for Profile {
    fn from(model: crate::entities::profiles::Model) -> Self {
        Self {
            user_id: model.user_id,
            character_name: model.character_name,
            attributes: Attributes {
                strength: model.strength,
                dexterity: model.dexterity,
                constitution: model.constitution,
                intelligence: model.intelligence,
                wisdom: model.wisdom,
                charisma: model.charisma,
            },
            preferences: model.preferences,
            updated_at: model.updated_at,
        }
    }
}
