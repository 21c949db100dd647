pub mod current_user;
pub mod game_id;
pub mod game_member;

pub use current_user::{AdminUser, CurrentUser};
pub use game_id::GameId;
pub use game_member::GameMember;

use actix_web::{web, HttpRequest};

use crate::error::AppError;
use crate::state::app_state::AppState;

pub(crate) fn app_state(req: &HttpRequest) -> Result<web::Data<AppState>, AppError> {
    req.app_data::<web::Data<AppState>>()
        .cloned()
        .ok_or_else(|| AppError::internal("AppState not available"))
}

/// Parse the `game_id` path segment as a positive id.
pub(crate) fn parse_game_id(req: &HttpRequest) -> Result<i64, AppError> {
    use crate::errors::ErrorCode;

    let raw = req.match_info().get("game_id").ok_or_else(|| {
        AppError::bad_request(ErrorCode::InvalidGameId, "Missing game_id parameter")
    })?;
    let game_id = raw.parse::<i64>().map_err(|_| {
        AppError::bad_request(ErrorCode::InvalidGameId, format!("Invalid game id: {raw}"))
    })?;
    if game_id <= 0 {
        return Err(AppError::bad_request(
            ErrorCode::InvalidGameId,
            format!("Game id must be positive, got: {game_id}"),
        ));
    }
    Ok(game_id)
}
