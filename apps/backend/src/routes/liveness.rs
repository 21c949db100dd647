use actix_web::{web, HttpResponse, Result};
use serde::Deserialize;
use time::OffsetDateTime;

use crate::db::require_db;
use crate::error::AppError;
use crate::extractors::GameMember;
use crate::services::liveness;
use crate::state::app_state::AppState;

#[derive(Debug, Deserialize)]
pub struct TypingRequest {
    pub is_typing: bool,
}

async fn present(
    member: GameMember,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let db = require_db(&app_state)?;
    let users = liveness::present_users(db, member.game_id, OffsetDateTime::now_utc()).await?;
    Ok(HttpResponse::Ok().json(users))
}

async fn heartbeat(
    member: GameMember,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let db = require_db(&app_state)?;
    liveness::heartbeat(db, member.game_id, member.user_id, OffsetDateTime::now_utc()).await?;
    Ok(HttpResponse::NoContent().finish())
}

async fn typing(
    member: GameMember,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let db = require_db(&app_state)?;
    let users = liveness::typing_users(
        db,
        member.game_id,
        member.user_id,
        OffsetDateTime::now_utc(),
    )
    .await?;
    Ok(HttpResponse::Ok().json(users))
}

async fn set_typing(
    member: GameMember,
    body: web::Json<TypingRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let db = require_db(&app_state)?;
    liveness::set_typing(
        db,
        member.game_id,
        member.user_id,
        body.is_typing,
        OffsetDateTime::now_utc(),
    )
    .await?;
    Ok(HttpResponse::NoContent().finish())
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/games/{game_id}/presence")
            .route(web::get().to(present))
            .route(web::post().to(heartbeat)),
    )
    .service(
        web::resource("/games/{game_id}/typing")
            .route(web::get().to(typing))
            .route(web::post().to(set_typing)),
    );
}
