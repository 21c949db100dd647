//! SeaORM adapter for users.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, NotSet, PaginatorTrait,
    QueryFilter, QueryOrder, Set,
};

use crate::entities::users;

pub struct UserCreate {
    pub username: String,
    pub password_hash: String,
    pub is_admin: bool,
}

pub async fn find_by_id<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: i64,
) -> Result<Option<users::Model>, sea_orm::DbErr> {
    users::Entity::find_by_id(user_id).one(conn).await
}

pub async fn find_by_username<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    username: &str,
) -> Result<Option<users::Model>, sea_orm::DbErr> {
    users::Entity::find()
        .filter(users::Column::Username.eq(username))
        .one(conn)
        .await
}

pub async fn find_by_ids<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    ids: &[i64],
) -> Result<Vec<users::Model>, sea_orm::DbErr> {
    users::Entity::find()
        .filter(users::Column::Id.is_in(ids.to_vec()))
        .all(conn)
        .await
}

pub async fn count_users<C: ConnectionTrait + Send + Sync>(
    conn: &C,
) -> Result<u64, sea_orm::DbErr> {
    users::Entity::find().count(conn).await
}

pub async fn create_user<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    dto: UserCreate,
) -> Result<users::Model, sea_orm::DbErr> {
    let now = time::OffsetDateTime::now_utc();
    users::ActiveModel {
        id: NotSet,
        username: Set(dto.username),
        password_hash: Set(dto.password_hash),
        is_admin: Set(dto.is_admin),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(conn)
    .await
}

pub async fn list_users<C: ConnectionTrait + Send + Sync>(
    conn: &C,
) -> Result<Vec<users::Model>, sea_orm::DbErr> {
    users::Entity::find()
        .order_by_asc(users::Column::Id)
        .all(conn)
        .await
}

pub async fn set_admin<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user: users::Model,
    is_admin: bool,
) -> Result<users::Model, sea_orm::DbErr> {
    let mut active: users::ActiveModel = user.into();
    active.is_admin = Set(is_admin);
    active.updated_at = Set(time::OffsetDateTime::now_utc());
    active.update(conn).await
}
