//! Character sheet reads and updates.

use sea_orm::ConnectionTrait;
use serde::Deserialize;

use crate::error::AppError;
use crate::errors::domain::{DomainError, NotFoundKind, ValidationKind};
use crate::repos::profiles::{self as profiles_repo, Attributes, Profile, ProfileChanges};

pub const MIN_ATTRIBUTE: i32 = 1;
pub const MAX_ATTRIBUTE: i32 = 20;
pub const MAX_CHARACTER_NAME: usize = 64;
pub const MAX_PREFERENCES: usize = 2000;

#[derive(Debug, Clone, Deserialize)]
pub struct ProfileUpdateRequest {
    pub character_name: String,
    pub attributes: Attributes,
    #[serde(default)]
    pub preferences: String,
}

fn validate(req: &ProfileUpdateRequest) -> Result<(), DomainError> {
    let name_len = req.character_name.trim().chars().count();
    if name_len == 0 || name_len > MAX_CHARACTER_NAME {
        return Err(DomainError::validation(
            ValidationKind::Profile,
            format!("Character name must be 1-{MAX_CHARACTER_NAME} characters"),
        ));
    }
    let a = req.attributes;
    let values = [
        ("strength", a.strength),
        ("dexterity", a.dexterity),
        ("constitution", a.constitution),
        ("intelligence", a.intelligence),
        ("wisdom", a.wisdom),
        ("charisma", a.charisma),
    ];
    for (name, value) in values {
        if !(MIN_ATTRIBUTE..=MAX_ATTRIBUTE).contains(&value) {
            return Err(DomainError::validation(
                ValidationKind::Profile,
                format!("{name} must be between {MIN_ATTRIBUTE} and {MAX_ATTRIBUTE}"),
            ));
        }
    }
    if req.preferences.chars().count() > MAX_PREFERENCES {
        return Err(DomainError::validation(
            ValidationKind::Profile,
            format!("Preferences must be at most {MAX_PREFERENCES} characters"),
        ));
    }
    Ok(())
}

pub async fn get_profile<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: i64,
) -> Result<Profile, AppError> {
    profiles_repo::find_by_user_id(conn, user_id)
        .await?
        .ok_or_else(|| {
            DomainError::not_found(NotFoundKind::Profile, format!("No profile for user {user_id}"))
                .into()
        })
}

pub async fn update_profile<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: i64,
    req: ProfileUpdateRequest,
) -> Result<Profile, AppError> {
    validate(&req)?;
    let changes = ProfileChanges {
        character_name: req.character_name.trim().to_string(),
        attributes: req.attributes,
        preferences: req.preferences,
    };
    Ok(profiles_repo::update_profile(conn, user_id, changes).await?)
}
