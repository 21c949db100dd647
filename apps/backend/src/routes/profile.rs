use actix_web::{web, HttpResponse, Result};

use crate::db::require_db;
use crate::db::txn::with_txn;
use crate::error::AppError;
use crate::extractors::CurrentUser;
use crate::services::profiles::{get_profile, update_profile, ProfileUpdateRequest};
use crate::state::app_state::AppState;

async fn me(user: CurrentUser) -> Result<HttpResponse, AppError> {
    Ok(HttpResponse::Ok().json(user))
}

async fn read_profile(
    user: CurrentUser,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let db = require_db(&app_state)?;
    Ok(HttpResponse::Ok().json(get_profile(db, user.id).await?))
}

async fn write_profile(
    user: CurrentUser,
    body: web::Json<ProfileUpdateRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let req = body.into_inner();
    let profile = with_txn(&app_state, move |txn| {
        Box::pin(async move { update_profile(txn, user.id, req).await })
    })
    .await?;
    Ok(HttpResponse::Ok().json(profile))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/me").route(web::get().to(me)))
        .service(
            web::resource("/profile")
                .route(web::get().to(read_profile))
                .route(web::put().to(write_profile)),
        );
}
