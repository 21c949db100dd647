use actix_web::dev::Payload;
use actix_web::{FromRequest, HttpMessage, HttpRequest};

use super::{app_state, parse_game_id};
use crate::auth::claims::BackendClaims;
use crate::db::require_db;
use crate::error::AppError;
use crate::errors::ErrorCode;
use crate::repos::{games, participants};

/// The caller's participation in the game named by the `game_id` path
/// segment.
///
/// Missing game is 404; an existing game the caller does not play in is
/// 403 `NOT_A_MEMBER`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameMember {
    pub game_id: i64,
    pub user_id: i64,
    pub is_owner: bool,
}

async fn resolve_member(req: HttpRequest) -> Result<GameMember, AppError> {
    let claims = req
        .extensions()
        .get::<BackendClaims>()
        .ok_or_else(AppError::unauthorized_missing_bearer)?
        .clone();
    let game_id = parse_game_id(&req)?;

    let state = app_state(&req)?;
    let db = require_db(&state)?;

    let game = games::find_by_id(db, game_id).await?.ok_or_else(|| {
        AppError::not_found(ErrorCode::GameNotFound, format!("Game {game_id} not found"))
    })?;

    if participants::find(db, game_id, claims.user_id).await?.is_none() {
        return Err(AppError::forbidden(
            ErrorCode::NotAMember,
            format!("User is not a member of game {game_id}"),
        ));
    }

    Ok(GameMember {
        game_id,
        user_id: claims.user_id,
        is_owner: game.owner_id == claims.user_id,
    })
}

impl FromRequest for GameMember {
    type Error = AppError;
    type Future = std::pin::Pin<Box<dyn std::future::Future<Output = Result<Self, Self::Error>>>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let req = req.clone();
        Box::pin(async move { resolve_member(req).await })
    }
}
