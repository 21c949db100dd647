use actix_web::http::header::{self, HeaderMap};
use actix_web::web::Bytes;
use actix_web::{web, HttpRequest, HttpResponse, Result};
use serde::Deserialize;
use serde_json::json;

use crate::error::AppError;
use crate::extractors::CurrentUser;
use crate::services::media;
use crate::state::app_state::AppState;

/// Upper bound for raw audio bodies accepted by `/transcribe`.
const AUDIO_PAYLOAD_LIMIT: usize = media::MAX_AUDIO_BYTES + 1;

#[derive(Debug, Deserialize)]
pub struct ImageRequest {
    pub prompt: String,
    pub size: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SpeechRequest {
    pub text: String,
    pub voice: Option<String>,
}

async fn image(
    _user: CurrentUser,
    body: web::Json<ImageRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let generated = media::generate_image(&app_state, &body.prompt, body.size.as_deref()).await?;
    Ok(HttpResponse::Ok().json(generated))
}

async fn speech(
    _user: CurrentUser,
    body: web::Json<SpeechRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let audio = media::synthesize_speech(&app_state, &body.text, body.voice.as_deref()).await?;
    Ok(HttpResponse::Ok().content_type("audio/mpeg").body(audio))
}

fn content_type(headers: &HeaderMap) -> &str {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("application/octet-stream")
}

async fn transcribe(
    _user: CurrentUser,
    req: HttpRequest,
    body: Bytes,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let mime = content_type(req.headers()).to_string();
    let text = media::transcribe(&app_state, body, &mime).await?;
    Ok(HttpResponse::Ok().json(json!({ "text": text })))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/image").route(web::post().to(image)))
        .service(web::resource("/speech").route(web::post().to(speech)))
        .service(
            web::resource("/transcribe")
                .app_data(web::PayloadConfig::new(AUDIO_PAYLOAD_LIMIT))
                .route(web::post().to(transcribe)),
        );
}
