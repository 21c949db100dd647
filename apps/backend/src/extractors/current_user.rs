use actix_web::dev::Payload;
use actix_web::{FromRequest, HttpMessage, HttpRequest};
use serde::{Deserialize, Serialize};

use super::app_state;
use crate::auth::claims::BackendClaims;
use crate::db::require_db;
use crate::error::AppError;
use crate::errors::ErrorCode;
use crate::repos::users;

/// Current user record from the database.
///
/// Built from the `BackendClaims` the JwtExtract middleware stored in
/// request extensions. The database lookup makes deleted users and admin
/// flag changes take effect without waiting for token expiry.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct CurrentUser {
    pub id: i64,
    pub username: String,
    pub is_admin: bool,
}

async fn resolve_user(req: HttpRequest) -> Result<CurrentUser, AppError> {
    let claims = req
        .extensions()
        .get::<BackendClaims>()
        .ok_or_else(AppError::unauthorized_missing_bearer)?
        .clone();

    let state = app_state(&req)?;
    let db = require_db(&state)?;
    let user = users::find_user_by_id(db, claims.user_id)
        .await?
        .ok_or_else(AppError::forbidden_user_not_found)?;

    Ok(CurrentUser {
        id: user.id,
        username: user.username,
        is_admin: user.is_admin,
    })
}

impl FromRequest for CurrentUser {
    type Error = AppError;
    type Future = std::pin::Pin<Box<dyn std::future::Future<Output = Result<Self, Self::Error>>>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let req = req.clone();
        Box::pin(async move { resolve_user(req).await })
    }
}

/// A `CurrentUser` whose admin flag is set.
#[derive(Debug, Clone)]
pub struct AdminUser(pub CurrentUser);

impl FromRequest for AdminUser {
    type Error = AppError;
    type Future = std::pin::Pin<Box<dyn std::future::Future<Output = Result<Self, Self::Error>>>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let req = req.clone();
        Box::pin(async move {
            let user = resolve_user(req).await?;
            if !user.is_admin {
                return Err(AppError::forbidden(
                    ErrorCode::AdminRequired,
                    "Administrator access required",
                ));
            }
            Ok(AdminUser(user))
        })
    }
}
