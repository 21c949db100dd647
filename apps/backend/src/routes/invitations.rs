use actix_web::{web, HttpResponse, Result};

use crate::db::require_db;
use crate::db::txn::with_txn;
use crate::error::AppError;
use crate::extractors::CurrentUser;
use crate::services::invitations::{list_pending, respond};
use crate::state::app_state::AppState;

async fn pending(
    user: CurrentUser,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let db = require_db(&app_state)?;
    Ok(HttpResponse::Ok().json(list_pending(db, user.id).await?))
}

async fn answer(
    user: CurrentUser,
    invitation_id: i64,
    accept: bool,
    app_state: &AppState,
) -> Result<HttpResponse, AppError> {
    let invitation = with_txn(app_state, move |txn| {
        Box::pin(async move { respond(txn, invitation_id, user.id, accept).await })
    })
    .await?;
    Ok(HttpResponse::Ok().json(invitation))
}

async fn accept(
    user: CurrentUser,
    path: web::Path<i64>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    answer(user, path.into_inner(), true, &app_state).await
}

async fn decline(
    user: CurrentUser,
    path: web::Path<i64>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    answer(user, path.into_inner(), false, &app_state).await
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/invitations").route(web::get().to(pending)))
        .service(web::resource("/invitations/{id}/accept").route(web::post().to(accept)))
        .service(web::resource("/invitations/{id}/decline").route(web::post().to(decline)));
}
