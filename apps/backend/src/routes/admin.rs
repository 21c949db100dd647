use actix_web::{web, HttpResponse, Result};
use serde::Deserialize;

use crate::db::require_db;
use crate::db::txn::with_txn;
use crate::error::AppError;
use crate::extractors::AdminUser;
use crate::services::admin;
use crate::state::app_state::AppState;

#[derive(Debug, Deserialize)]
pub struct AdminFlagRequest {
    pub is_admin: bool,
}

async fn list_users(
    _admin: AdminUser,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let db = require_db(&app_state)?;
    Ok(HttpResponse::Ok().json(admin::list_users(db).await?))
}

async fn list_games(
    _admin: AdminUser,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let db = require_db(&app_state)?;
    Ok(HttpResponse::Ok().json(admin::list_games(db).await?))
}

async fn set_admin(
    AdminUser(actor): AdminUser,
    path: web::Path<i64>,
    body: web::Json<AdminFlagRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let target = path.into_inner();
    let flag = body.is_admin;
    let user = with_txn(&app_state, move |txn| {
        Box::pin(async move { admin::set_admin(txn, actor.id, target, flag).await })
    })
    .await?;
    Ok(HttpResponse::Ok().json(user))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/users").route(web::get().to(list_users)))
        .service(web::resource("/users/{id}/admin").route(web::post().to(set_admin)))
        .service(web::resource("/games").route(web::get().to(list_games)));
}
