//! SeaORM adapter for profiles.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, NotSet, QueryFilter, Set,
};

use crate::entities::profiles;

/// Starting value for every attribute.
pub const DEFAULT_ATTRIBUTE: i32 = 10;

#[derive(Debug, Clone)]
pub struct ProfileUpdate {
    pub character_name: String,
    pub strength: i32,
    pub dexterity: i32,
    pub constitution: i32,
    pub intelligence: i32,
    pub wisdom: i32,
    pub charisma: i32,
    pub preferences: String,
}

pub async fn find_by_user_id<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: i64,
) -> Result<Option<profiles::Model>, sea_orm::DbErr> {
    profiles::Entity::find()
        .filter(profiles::Column::UserId.eq(user_id))
        .one(conn)
        .await
}

pub async fn find_by_user_ids<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_ids: &[i64],
) -> Result<Vec<profiles::Model>, sea_orm::DbErr> {
    profiles::Entity::find()
        .filter(profiles::Column::UserId.is_in(user_ids.to_vec()))
        .all(conn)
        .await
}

pub async fn create_default<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: i64,
    character_name: &str,
) -> Result<profiles::Model, sea_orm::DbErr> {
    profiles::ActiveModel {
        id: NotSet,
        user_id: Set(user_id),
        character_name: Set(character_name.to_string()),
        strength: Set(DEFAULT_ATTRIBUTE),
        dexterity: Set(DEFAULT_ATTRIBUTE),
        constitution: Set(DEFAULT_ATTRIBUTE),
        intelligence: Set(DEFAULT_ATTRIBUTE),
        wisdom: Set(DEFAULT_ATTRIBUTE),
        charisma: Set(DEFAULT_ATTRIBUTE),
        preferences: Set(String::new()),
        updated_at: Set(time::OffsetDateTime::now_utc()),
    }
    .insert(conn)
    .await
}

pub async fn update_profile<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    existing: profiles::Model,
    dto: ProfileUpdate,
) -> Result<profiles::Model, sea_orm::DbErr> {
    let mut active: profiles::ActiveModel = existing.into();
    active.character_name = Set(dto.character_name);
    active.strength = Set(dto.strength);
    active.dexterity = Set(dto.dexterity);
    active.constitution = Set(dto.constitution);
    active.intelligence = Set(dto.intelligence);
    active.wisdom = Set(dto.wisdom);
    active.charisma = Set(dto.charisma);
    active.preferences = Set(dto.preferences);
    active.updated_at = Set(time::OffsetDateTime::now_utc());
    active.update(conn).await
}
