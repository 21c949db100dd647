//! SeaORM -> DomainError translation helpers.
//!
//! Adapters return raw `sea_orm::DbErr`; repos and services convert through
//! `map_db_err` so that constraint violations surface as domain conflicts.

use tracing::{error, warn};

use crate::errors::domain::{ConflictKind, DomainError, InfraErrorKind, NotFoundKind};
use crate::trace_ctx;

fn mentions_sqlstate(msg: &str, code: &str) -> bool {
    msg.contains(code) || msg.contains(&format!("SQLSTATE({code})"))
}

/// Extract `table.column` from SQLite "UNIQUE constraint failed: table.column".
fn extract_sqlite_table_column(error_msg: &str) -> Option<&str> {
    let marker = "UNIQUE constraint failed: ";
    let start = error_msg.find(marker)? + marker.len();
    error_msg[start..]
        .split(|c: char| c.is_whitespace() || c == ',' || c == '"')
        .next()
        .filter(|s| !s.is_empty())
}

fn map_unique_to_conflict(error_msg: &str) -> Option<(ConflictKind, &'static str)> {
    if error_msg.contains("users.username") || error_msg.contains("users_username_key") {
        return Some((ConflictKind::UsernameTaken, "Username already taken"));
    }
    if error_msg.contains("ux_game_participants_game_user")
        || extract_sqlite_table_column(error_msg) == Some("game_participants.game_id")
    {
        return Some((
            ConflictKind::AlreadyParticipant,
            "User already participates in this game",
        ));
    }
    None
}

/// Translate a `DbErr` into a `DomainError` with a sanitized detail.
pub fn map_db_err(e: sea_orm::DbErr) -> DomainError {
    let error_msg = e.to_string();
    let trace_id = trace_ctx::trace_id();

    match &e {
        sea_orm::DbErr::RecordNotFound(_) => {
            return DomainError::not_found(
                NotFoundKind::Other("Record".into()),
                "Record not found",
            );
        }
        sea_orm::DbErr::ConnectionAcquire(_) | sea_orm::DbErr::Conn(_) => {
            warn!(trace_id = %trace_id, raw_error = %error_msg, "Database unavailable");
            return DomainError::infra(InfraErrorKind::DbUnavailable, "Database unavailable");
        }
        sea_orm::DbErr::Json(_) | sea_orm::DbErr::Type(_) => {
            error!(trace_id = %trace_id, raw_error = %error_msg, "Stored value failed to decode");
            return DomainError::corrupt("Stored value failed to decode");
        }
        _ => {}
    }

    if mentions_sqlstate(&error_msg, "23505")
        || error_msg.contains("duplicate key value violates unique constraint")
        || error_msg.contains("UNIQUE constraint failed")
    {
        warn!(trace_id = %trace_id, raw_error = %error_msg, "Unique constraint violation");
        if let Some((kind, detail)) = map_unique_to_conflict(&error_msg) {
            return DomainError::conflict(kind, detail);
        }
        return DomainError::conflict(ConflictKind::Unique, "Unique constraint violation");
    }

    if mentions_sqlstate(&error_msg, "23503") || error_msg.contains("FOREIGN KEY constraint failed")
    {
        warn!(trace_id = %trace_id, raw_error = %error_msg, "Foreign key constraint violation");
        return DomainError::validation(
            crate::errors::domain::ValidationKind::Other("ForeignKey".into()),
            "Referenced row does not exist",
        );
    }

    error!(trace_id = %trace_id, raw_error = %error_msg, "Unhandled database error");
    DomainError::infra(
        InfraErrorKind::Other("DbErr".into()),
        "Database operation failed",
    )
}
