use migration::{migrate, MigrationCommand};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use tracing::info;

use crate::config::db::{db_url, DbKind};
use crate::error::AppError;

/// Open a pool for `kind`. Does NOT run migrations.
pub async fn connect_db(kind: DbKind) -> Result<DatabaseConnection, AppError> {
    let url = db_url(kind)?;
    let mut opts = ConnectOptions::new(url);
    opts.sqlx_logging(false);

    // Every pooled connection to `sqlite::memory:` is its own database.
    if kind == DbKind::SqliteMemory {
        opts.max_connections(1).min_connections(1);
    }

    let conn = Database::connect(opts).await?;
    Ok(conn)
}

/// Connect and bring the schema up to date.
pub async fn bootstrap_db(kind: DbKind) -> Result<DatabaseConnection, AppError> {
    let conn = connect_db(kind).await?;
    migrate(&conn, MigrationCommand::Up)
        .await
        .map_err(|e| AppError::config(format!("migration failed: {e}")))?;
    info!(db_kind = ?kind, "database ready");
    Ok(conn)
}
