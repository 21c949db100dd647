//! Process configuration for the server binary, loaded from the environment.

use std::env;

use crate::config::ai::AiConfig;
use crate::config::db::DbKind;
use crate::error::AppError;

const MIN_JWT_SECRET_LEN: usize = 32;

#[derive(Debug, Clone)]
pub struct Config {
    // Server
    pub host: String,
    pub port: u16,

    // Database
    pub db_kind: DbKind,

    // Security
    pub jwt_secret: String,

    // AI provider
    pub ai: AiConfig,
}

impl Config {
    /// Load and validate all configuration from environment variables
    pub fn from_env() -> Result<Self, AppError> {
        let jwt_secret = match env::var("BACKEND_JWT_SECRET") {
            Ok(secret) if secret.len() >= MIN_JWT_SECRET_LEN => secret,
            Ok(_) => {
                return Err(AppError::config(format!(
                    "BACKEND_JWT_SECRET must be at least {MIN_JWT_SECRET_LEN} characters"
                )))
            }
            Err(_) => return Err(AppError::config("BACKEND_JWT_SECRET must be set")),
        };

        let host = env::var("BACKEND_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port_str = env::var("BACKEND_PORT").unwrap_or_else(|_| "3001".to_string());
        let port = port_str.parse::<u16>().map_err(|_| {
            AppError::config(format!(
                "BACKEND_PORT must be a valid port number, got '{port_str}'"
            ))
        })?;

        let db_kind = match env::var("DB_KIND") {
            Ok(raw) => raw.parse::<DbKind>()?,
            Err(_) => DbKind::Postgres,
        };

        Ok(Config {
            host,
            port,
            db_kind,
            jwt_secret,
            ai: AiConfig::from_env(),
        })
    }
}
