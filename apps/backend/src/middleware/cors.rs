use std::env;

use actix_cors::Cors;
use actix_web::http::header;

/// Dev server of the web client.
const DEFAULT_ORIGINS: [&str; 2] = ["http://localhost:5173", "http://127.0.0.1:5173"];

/// Origins from a comma-separated `CORS_ALLOWED_ORIGINS` value. Entries that
/// are not http(s) URLs (including `null`) are dropped, as is a trailing `/`.
pub fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().trim_end_matches('/'))
        .filter(|s| s.starts_with("http://") || s.starts_with("https://"))
        .map(str::to_string)
        .collect()
}

/// CORS for the browser client. Bearer auth only, so no credentials mode;
/// `x-trace-id` is exposed so the client can quote it in bug reports, and
/// `content-disposition` for the speech endpoint's audio downloads.
pub fn cors_middleware() -> Cors {
    let mut origins = parse_origins(&env::var("CORS_ALLOWED_ORIGINS").unwrap_or_default());
    if origins.is_empty() {
        origins = DEFAULT_ORIGINS.iter().map(|o| o.to_string()).collect();
    }

    let cors = Cors::default()
        .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
        .allowed_headers(vec![
            header::AUTHORIZATION,
            header::CONTENT_TYPE,
            header::ACCEPT,
        ])
        .expose_headers(vec![
            header::HeaderName::from_static("x-trace-id"),
            header::CONTENT_DISPOSITION,
        ])
        .max_age(3600);

    origins
        .iter()
        .fold(cors, |cors, origin| cors.allowed_origin(origin))
}
