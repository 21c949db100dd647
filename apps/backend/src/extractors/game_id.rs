use actix_web::dev::Payload;
use actix_web::{FromRequest, HttpRequest};
use serde::{Deserialize, Serialize};

use super::{app_state, parse_game_id};
use crate::db::require_db;
use crate::error::AppError;
use crate::errors::ErrorCode;
use crate::repos::games;

/// Game ID extracted from the route path parameter
/// Validates that the game exists in the database
#[derive(Debug, Serialize, Deserialize, Clone, Copy)]
pub struct GameId(pub i64);

impl FromRequest for GameId {
    type Error = AppError;
    type Future = std::pin::Pin<Box<dyn std::future::Future<Output = Result<Self, Self::Error>>>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let req = req.clone();

        Box::pin(async move {
            let game_id = parse_game_id(&req)?;

            let state = app_state(&req)?;
            let db = require_db(&state)?;
            if games::find_by_id(db, game_id).await?.is_none() {
                return Err(AppError::not_found(
                    ErrorCode::GameNotFound,
                    format!("Game {game_id} not found"),
                ));
            }

            Ok(GameId(game_id))
        })
    }
}
