use std::env;
use std::str::FromStr;

use crate::error::AppError;

/// Which database backend to connect to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DbKind {
    /// PostgreSQL, URL from `DATABASE_URL`
    Postgres,
    /// SQLite file, path from `DATABASE_URL` (default `taleforge.db`)
    SqliteFile,
    /// Private in-memory SQLite, used by tests and throwaway runs
    SqliteMemory,
}

impl FromStr for DbKind {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(DbKind::Postgres),
            "sqlite-file" | "sqlite" => Ok(DbKind::SqliteFile),
            "sqlite-memory" | "memory" => Ok(DbKind::SqliteMemory),
            other => Err(AppError::config(format!(
                "DB_KIND must be one of postgres, sqlite-file, sqlite-memory; got '{other}'"
            ))),
        }
    }
}

/// Builds the connection URL for `kind` from the environment.
pub fn db_url(kind: DbKind) -> Result<String, AppError> {
    match kind {
        DbKind::Postgres => {
            let url = must_var("DATABASE_URL")?;
            if !(url.starts_with("postgres://") || url.starts_with("postgresql://")) {
                return Err(AppError::config(
                    "DATABASE_URL must be a postgres:// URL when DB_KIND=postgres",
                ));
            }
            Ok(url)
        }
        DbKind::SqliteFile => {
            let path = env::var("DATABASE_URL").unwrap_or_else(|_| "taleforge.db".to_string());
            if path.starts_with("sqlite:") {
                Ok(path)
            } else {
                Ok(format!("sqlite://{path}?mode=rwc"))
            }
        }
        DbKind::SqliteMemory => Ok("sqlite::memory:".to_string()),
    }
}

fn must_var(name: &str) -> Result<String, AppError> {
    env::var(name)
        .map_err(|_| AppError::config(format!("Required environment variable '{name}' is not set")))
}
