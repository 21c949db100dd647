//! In-game traffic: the story log, chat dispatch, the turn barrier,
//! table chat, inventory transfers and votes.

use actix_web::{web, HttpResponse, Result};
use serde::Deserialize;
use serde_json::json;

use crate::db::require_db;
use crate::db::txn::with_txn;
use crate::error::AppError;
use crate::extractors::GameMember;
use crate::repos::messages::{self, MAX_PAGE};
use crate::services::inventory::{transfer_item, TransferRequest};
use crate::services::votes::{cast_vote, get_votes, CastVoteRequest};
use crate::services::{chat, table_chat};
use crate::state::app_state::AppState;

#[derive(Debug, Deserialize)]
pub struct MessagesQuery {
    pub thread: Option<String>,
    pub after: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct AfterQuery {
    pub after: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct ContentRequest {
    pub content: String,
}

async fn list_messages(
    member: GameMember,
    query: web::Query<MessagesQuery>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let db = require_db(&app_state)?;
    let list = messages::list(
        db,
        member.game_id,
        query.thread.as_deref(),
        query.after,
        MAX_PAGE,
    )
    .await?;
    Ok(HttpResponse::Ok().json(list))
}

async fn submit_chat(
    member: GameMember,
    body: web::Json<ContentRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let outcome =
        chat::submit_turn(&app_state, member.game_id, member.user_id, &body.content).await?;
    Ok(HttpResponse::Ok().json(outcome))
}

async fn turn_status(
    member: GameMember,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let db = require_db(&app_state)?;
    let status = chat::turn_status(db, member.game_id, member.user_id).await?;
    Ok(HttpResponse::Ok().json(status))
}

async fn withdraw_turn(
    member: GameMember,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let db = require_db(&app_state)?;
    let withdrawn = chat::withdraw_turn(db, member.game_id, member.user_id).await?;
    Ok(HttpResponse::Ok().json(json!({ "withdrawn": withdrawn })))
}

async fn list_table_chat(
    member: GameMember,
    query: web::Query<AfterQuery>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let db = require_db(&app_state)?;
    let list = table_chat::list_messages(db, member.game_id, query.after).await?;
    Ok(HttpResponse::Ok().json(list))
}

async fn post_table_chat(
    member: GameMember,
    body: web::Json<ContentRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let db = require_db(&app_state)?;
    let message =
        table_chat::post_message(db, member.game_id, member.user_id, &body.content).await?;
    Ok(HttpResponse::Created().json(message))
}

async fn transfer(
    member: GameMember,
    body: web::Json<TransferRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let req = body.into_inner();
    let state = with_txn(&app_state, move |txn| {
        Box::pin(async move { transfer_item(txn, member.game_id, member.user_id, req).await })
    })
    .await?;
    Ok(HttpResponse::Ok().json(state))
}

async fn read_votes(
    member: GameMember,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let db = require_db(&app_state)?;
    Ok(HttpResponse::Ok().json(get_votes(db, member.game_id).await?))
}

async fn vote(
    member: GameMember,
    body: web::Json<CastVoteRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let req = body.into_inner();
    let summary = with_txn(&app_state, move |txn| {
        Box::pin(async move { cast_vote(txn, member.game_id, member.user_id, req).await })
    })
    .await?;
    Ok(HttpResponse::Ok().json(summary))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/games/{game_id}/messages").route(web::get().to(list_messages)))
        .service(web::resource("/games/{game_id}/chat").route(web::post().to(submit_chat)))
        .service(
            web::resource("/games/{game_id}/turn")
                .route(web::get().to(turn_status))
                .route(web::delete().to(withdraw_turn)),
        )
        .service(
            web::resource("/games/{game_id}/table-chat")
                .route(web::get().to(list_table_chat))
                .route(web::post().to(post_table_chat)),
        )
        .service(
            web::resource("/games/{game_id}/inventory/transfer").route(web::post().to(transfer)),
        )
        .service(
            web::resource("/games/{game_id}/votes")
                .route(web::get().to(read_votes))
                .route(web::post().to(vote)),
        );
}
