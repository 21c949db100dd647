use actix_web::{web, HttpResponse, Result};
use serde::Deserialize;
use tracing::warn;

use crate::db::require_db;
use crate::db::txn::with_txn;
use crate::entities::games::GameStatus;
use crate::error::AppError;
use crate::extractors::{CurrentUser, GameMember};
use crate::services::games::{self, CreateGameRequest, SyncConfigRequest};
use crate::services::{chat, invitations};
use crate::state::app_state::AppState;

#[derive(Debug, Deserialize)]
pub struct ListGamesQuery {
    pub status: Option<GameStatus>,
}

#[derive(Debug, Deserialize)]
pub struct InviteRequest {
    pub username: String,
}

async fn list_games(
    user: CurrentUser,
    query: web::Query<ListGamesQuery>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let db = require_db(&app_state)?;
    let list = games::list_games(db, user.id, query.status).await?;
    Ok(HttpResponse::Ok().json(list))
}

async fn create_game(
    user: CurrentUser,
    body: web::Json<CreateGameRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let req = body.into_inner();
    let detail = with_txn(&app_state, move |txn| {
        Box::pin(async move { games::create_game(txn, user.id, req).await })
    })
    .await?;
    Ok(HttpResponse::Created().json(detail))
}

async fn game_detail(
    member: GameMember,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let db = require_db(&app_state)?;
    Ok(HttpResponse::Ok().json(games::game_detail(db, member.game_id).await?))
}

async fn delete_game(
    member: GameMember,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    with_txn(&app_state, move |txn| {
        Box::pin(async move { games::delete_game(txn, member.game_id, member.user_id).await })
    })
    .await?;
    Ok(HttpResponse::NoContent().finish())
}

async fn archive_game(
    member: GameMember,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let game = with_txn(&app_state, move |txn| {
        Box::pin(async move { games::archive_game(txn, member.game_id, member.user_id).await })
    })
    .await?;
    Ok(HttpResponse::Ok().json(game))
}

async fn leave_game(
    member: GameMember,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let game_id = member.game_id;
    with_txn(&app_state, move |txn| {
        Box::pin(async move { games::leave_game(txn, game_id, member.user_id).await })
    })
    .await?;
    if let Err(err) = chat::settle_after_leave(&app_state, game_id).await {
        warn!(game_id, error = %err, "Could not settle staged turns after leave");
    }
    Ok(HttpResponse::NoContent().finish())
}

async fn set_sync(
    member: GameMember,
    body: web::Json<SyncConfigRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let req = body.into_inner();
    let detail = with_txn(&app_state, move |txn| {
        Box::pin(async move { games::set_sync(txn, member.game_id, member.user_id, req).await })
    })
    .await?;
    Ok(HttpResponse::Ok().json(detail))
}

async fn invite(
    member: GameMember,
    body: web::Json<InviteRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let username = body.into_inner().username;
    let invitation = with_txn(&app_state, move |txn| {
        Box::pin(async move {
            invitations::invite(txn, member.game_id, member.user_id, username.trim()).await
        })
    })
    .await?;
    Ok(HttpResponse::Created().json(invitation))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/games")
            .route(web::get().to(list_games))
            .route(web::post().to(create_game)),
    )
    .service(
        web::resource("/games/{game_id}")
            .route(web::get().to(game_detail))
            .route(web::delete().to(delete_game)),
    )
    .service(web::resource("/games/{game_id}/archive").route(web::post().to(archive_game)))
    .service(web::resource("/games/{game_id}/leave").route(web::post().to(leave_game)))
    .service(web::resource("/games/{game_id}/sync").route(web::put().to(set_sync)))
    .service(web::resource("/games/{game_id}/invitations").route(web::post().to(invite)));
}
