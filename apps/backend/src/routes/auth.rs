use std::time::SystemTime;

use actix_web::{web, HttpResponse, Result};
use serde::{Deserialize, Serialize};

use crate::auth::jwt::mint_access_token;
use crate::db::require_db;
use crate::db::txn::with_txn;
use crate::error::AppError;
use crate::repos::users::User;
use crate::services::users::{authenticate, register_user};
use crate::state::app_state::AppState;

#[derive(Debug, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: User,
}

fn issue(user: User, app_state: &AppState) -> Result<AuthResponse, AppError> {
    let token = mint_access_token(user.id, &user.username, SystemTime::now(), &app_state.security)?;
    Ok(AuthResponse { token, user })
}

async fn register(
    req: web::Json<Credentials>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let Credentials { username, password } = req.into_inner();
    let user = with_txn(&app_state, move |txn| {
        Box::pin(async move { register_user(txn, &username, &password).await })
    })
    .await?;

    Ok(HttpResponse::Created().json(issue(user, &app_state)?))
}

async fn login(
    req: web::Json<Credentials>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let db = require_db(&app_state)?;
    let user = authenticate(db, req.username.trim(), &req.password).await?;
    Ok(HttpResponse::Ok().json(issue(user, &app_state)?))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/register").route(web::post().to(register)))
        .service(web::resource("/login").route(web::post().to(login)));
}
