//! User repository functions for domain layer (generic over ConnectionTrait).

use sea_orm::ConnectionTrait;
use serde::Serialize;

use crate::adapters::users_sea as users_adapter;
use crate::errors::domain::{DomainError, NotFoundKind};

/// User domain model (never carries the password hash)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub is_admin: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: time::OffsetDateTime,
}

/// Login lookup result
#[derive(Debug, Clone)]
pub struct UserCredentials {
    pub user: User,
    pub password_hash: String,
}

pub async fn find_user_by_id<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: i64,
) -> Result<Option<User>, DomainError> {
    let user = users_adapter::find_by_id(conn, user_id).await?;
    Ok(user.map(User::from))
}

pub async fn find_user_by_username<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    username: &str,
) -> Result<Option<User>, DomainError> {
    let user = users_adapter::find_by_username(conn, username).await?;
    Ok(user.map(User::from))
}

pub async fn find_credentials_by_username<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    username: &str,
) -> Result<Option<UserCredentials>, DomainError> {
    let user = users_adapter::find_by_username(conn, username).await?;
    Ok(user.map(|model| UserCredentials {
        password_hash: model.password_hash.clone(),
        user: User::from(model),
    }))
}

pub async fn find_users_by_ids<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    ids: &[i64],
) -> Result<Vec<User>, DomainError> {
    let users = users_adapter::find_by_ids(conn, ids).await?;
    Ok(users.into_iter().map(User::from).collect())
}

pub async fn count_users<C: ConnectionTrait + Send + Sync>(conn: &C) -> Result<u64, DomainError> {
    Ok(users_adapter::count_users(conn).await?)
}

pub async fn create_user<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    username: &str,
    password_hash: &str,
    is_admin: bool,
) -> Result<User, DomainError> {
    let user = users_adapter::create_user(
        conn,
        users_adapter::UserCreate {
            username: username.to_string(),
            password_hash: password_hash.to_string(),
            is_admin,
        },
    )
    .await?;
    Ok(User::from(user))
}

pub async fn list_users<C: ConnectionTrait + Send + Sync>(
    conn: &C,
) -> Result<Vec<User>, DomainError> {
    let users = users_adapter::list_users(conn).await?;
    Ok(users.into_iter().map(User::from).collect())
}

pub async fn set_admin<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: i64,
    is_admin: bool,
) -> Result<User, DomainError> {
    let model = users_adapter::find_by_id(conn, user_id)
        .await?
        .ok_or_else(|| DomainError::not_found(NotFoundKind::User, format!("User {user_id} not found")))?;
    let updated = users_adapter::set_admin(conn, model, is_admin).await?;
    Ok(User::from(updated))
}

impl From<crate::entities::users::Model> for User {
    fn from(model: crate::entities::users::Model) -> Self {
        Self {
            id: model.id,
            username: model.username,
            is_admin: model.is_admin,
            created_at: model.created_at,
        }
    }
}
