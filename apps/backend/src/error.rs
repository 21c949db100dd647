use actix_web::error::ResponseError;
use actix_web::http::header::{HeaderValue, WWW_AUTHENTICATE};
use actix_web::http::StatusCode;
use actix_web::HttpResponse;
use serde::Serialize;
use thiserror::Error;

use crate::ai::AiError;
use crate::errors::domain::{
    ConflictKind, DomainError, ForbiddenKind, InfraErrorKind, NotFoundKind, ValidationKind,
};
use crate::errors::ErrorCode;
use crate::trace_ctx;

#[derive(Serialize)]
pub struct ProblemDetails {
    #[serde(rename = "type")]
    pub type_: String,
    pub title: String,
    pub status: u16,
    pub detail: String,
    pub code: String,
    pub trace_id: String,
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Validation error: {detail}")]
    Validation {
        code: ErrorCode,
        detail: String,
        status: StatusCode,
    },
    #[error("Database error: {detail}")]
    Db { detail: String },
    #[error("Not found: {detail}")]
    NotFound { code: ErrorCode, detail: String },
    #[error("Unauthorized: {detail}")]
    Unauthorized { code: ErrorCode, detail: String },
    #[error("Forbidden: {detail}")]
    Forbidden { code: ErrorCode, detail: String },
    #[error("Bad request: {detail}")]
    BadRequest { code: ErrorCode, detail: String },
    #[error("Internal error: {detail}")]
    Internal { code: ErrorCode, detail: String },
    #[error("Configuration error: {detail}")]
    Config { detail: String },
    #[error("Conflict: {detail}")]
    Conflict { code: ErrorCode, detail: String },
    #[error("Database unavailable")]
    DbUnavailable,
    #[error("Upstream error: {detail}")]
    Upstream {
        code: ErrorCode,
        detail: String,
        status: StatusCode,
    },
}

impl AppError {
    /// Machine-readable code for the problem body
    pub fn code(&self) -> ErrorCode {
        match self {
            AppError::Validation { code, .. } => *code,
            AppError::Db { .. } => ErrorCode::DbError,
            AppError::NotFound { code, .. } => *code,
            AppError::Unauthorized { code, .. } => *code,
            AppError::Forbidden { code, .. } => *code,
            AppError::BadRequest { code, .. } => *code,
            AppError::Internal { code, .. } => *code,
            AppError::Config { .. } => ErrorCode::ConfigError,
            AppError::Conflict { code, .. } => *code,
            AppError::DbUnavailable => ErrorCode::DbUnavailable,
            AppError::Upstream { code, .. } => *code,
        }
    }

    fn detail(&self) -> String {
        match self {
            AppError::Validation { detail, .. } => detail.clone(),
            AppError::Db { detail } => detail.clone(),
            AppError::NotFound { detail, .. } => detail.clone(),
            AppError::Unauthorized { detail, .. } => detail.clone(),
            AppError::Forbidden { detail, .. } => detail.clone(),
            AppError::BadRequest { detail, .. } => detail.clone(),
            AppError::Internal { detail, .. } => detail.clone(),
            AppError::Config { detail } => detail.clone(),
            AppError::Conflict { detail, .. } => detail.clone(),
            AppError::DbUnavailable => "Database unavailable".to_string(),
            AppError::Upstream { detail, .. } => detail.clone(),
        }
    }

    /// Get the HTTP status code for this error
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation { status, .. } => *status,
            AppError::Db { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
            AppError::Forbidden { .. } => StatusCode::FORBIDDEN,
            AppError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            AppError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Config { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Conflict { .. } => StatusCode::CONFLICT,
            AppError::DbUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Upstream { status, .. } => *status,
        }
    }

    pub fn invalid(code: ErrorCode, detail: impl Into<String>) -> Self {
        Self::Validation {
            code,
            detail: detail.into(),
            status: StatusCode::BAD_REQUEST,
        }
    }

    pub fn internal(detail: impl Into<String>) -> Self {
        Self::Internal {
            code: ErrorCode::Internal,
            detail: detail.into(),
        }
    }

    pub fn bad_request(code: ErrorCode, detail: impl Into<String>) -> Self {
        Self::BadRequest {
            code,
            detail: detail.into(),
        }
    }

    pub fn not_found(code: ErrorCode, detail: impl Into<String>) -> Self {
        Self::NotFound {
            code,
            detail: detail.into(),
        }
    }

    pub fn db(detail: impl Into<String>) -> Self {
        Self::Db {
            detail: detail.into(),
        }
    }

    pub fn unauthorized() -> Self {
        Self::Unauthorized {
            code: ErrorCode::Unauthorized,
            detail: "Authentication required".to_string(),
        }
    }

    pub fn unauthorized_missing_bearer() -> Self {
        Self::Unauthorized {
            code: ErrorCode::UnauthorizedMissingBearer,
            detail: "Missing or malformed Bearer token".to_string(),
        }
    }

    pub fn unauthorized_invalid_jwt() -> Self {
        Self::Unauthorized {
            code: ErrorCode::UnauthorizedInvalidJwt,
            detail: "Invalid JWT".to_string(),
        }
    }

    pub fn unauthorized_expired_jwt() -> Self {
        Self::Unauthorized {
            code: ErrorCode::UnauthorizedExpiredJwt,
            detail: "Token expired".to_string(),
        }
    }

    pub fn invalid_credentials() -> Self {
        Self::Unauthorized {
            code: ErrorCode::InvalidCredentials,
            detail: "Invalid username or password".to_string(),
        }
    }

    pub fn forbidden(code: ErrorCode, detail: impl Into<String>) -> Self {
        Self::Forbidden {
            code,
            detail: detail.into(),
        }
    }

    pub fn forbidden_user_not_found() -> Self {
        Self::forbidden(ErrorCode::ForbiddenUserNotFound, "User not found in database")
    }

    pub fn config(detail: impl Into<String>) -> Self {
        Self::Config {
            detail: detail.into(),
        }
    }

    pub fn conflict(code: ErrorCode, detail: impl Into<String>) -> Self {
        Self::Conflict {
            code,
            detail: detail.into(),
        }
    }

    pub fn db_unavailable() -> Self {
        Self::DbUnavailable
    }

    pub fn ai_upstream(detail: impl Into<String>) -> Self {
        Self::Upstream {
            code: ErrorCode::AiUpstream,
            detail: detail.into(),
            status: StatusCode::BAD_GATEWAY,
        }
    }

    pub fn ai_not_configured() -> Self {
        Self::Upstream {
            code: ErrorCode::AiNotConfigured,
            detail: "AI provider is not configured".to_string(),
            status: StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    fn humanize_code(code: &str) -> String {
        code.split('_')
            .map(|word| {
                let lower = word.to_lowercase();
                let mut chars = lower.chars();
                match chars.next() {
                    None => String::new(),
                    Some(first) => first.to_uppercase().chain(chars).collect(),
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::Validation(kind, detail) => {
                let code = match kind {
                    ValidationKind::Username => ErrorCode::InvalidUsername,
                    ValidationKind::Password => ErrorCode::InvalidPassword,
                    ValidationKind::Profile => ErrorCode::InvalidProfile,
                    ValidationKind::Game => ErrorCode::InvalidGame,
                    ValidationKind::SyncConfig => ErrorCode::InvalidSyncConfig,
                    ValidationKind::Action => ErrorCode::InvalidAction,
                    ValidationKind::Vote => ErrorCode::InvalidVote,
                    ValidationKind::Message => ErrorCode::InvalidMessage,
                    ValidationKind::GameArchived => {
                        return AppError::conflict(ErrorCode::GameArchived, detail)
                    }
                    ValidationKind::GameFull => {
                        return AppError::conflict(ErrorCode::GameFull, detail)
                    }
                    ValidationKind::Other(_) => ErrorCode::ValidationError,
                };
                AppError::Validation {
                    code,
                    detail,
                    status: StatusCode::UNPROCESSABLE_ENTITY,
                }
            }
            DomainError::Conflict(kind, detail) => {
                let code = match kind {
                    ConflictKind::UsernameTaken => ErrorCode::UsernameTaken,
                    ConflictKind::AlreadyParticipant => ErrorCode::AlreadyParticipant,
                    ConflictKind::InvitationResolved => ErrorCode::InvitationAlreadyResolved,
                    ConflictKind::OwnerCannotLeave => ErrorCode::OwnerCannotLeave,
                    ConflictKind::CannotDemoteSelf => ErrorCode::CannotDemoteSelf,
                    ConflictKind::Unique => ErrorCode::UniqueViolation,
                    ConflictKind::Other(_) => ErrorCode::Conflict,
                };
                AppError::conflict(code, detail)
            }
            DomainError::NotFound(kind, detail) => {
                let code = match kind {
                    NotFoundKind::User => ErrorCode::UserNotFound,
                    NotFoundKind::Profile => ErrorCode::ProfileNotFound,
                    NotFoundKind::Game => ErrorCode::GameNotFound,
                    NotFoundKind::Invitation => ErrorCode::InvitationNotFound,
                    NotFoundKind::Item => ErrorCode::ItemNotFound,
                    NotFoundKind::Other(_) => ErrorCode::NotFound,
                };
                AppError::not_found(code, detail)
            }
            DomainError::Forbidden(kind, detail) => {
                let code = match kind {
                    ForbiddenKind::NotAMember => ErrorCode::NotAMember,
                    ForbiddenKind::NotOwner => ErrorCode::NotGameOwner,
                    ForbiddenKind::AdminRequired => ErrorCode::AdminRequired,
                    ForbiddenKind::Other(_) => ErrorCode::Forbidden,
                };
                AppError::forbidden(code, detail)
            }
            DomainError::Infra(kind, detail) => match kind {
                InfraErrorKind::DbUnavailable => AppError::DbUnavailable,
                InfraErrorKind::DataCorruption => AppError::Internal {
                    code: ErrorCode::DataCorruption,
                    detail,
                },
                InfraErrorKind::Other(_) => AppError::db(detail),
            },
        }
    }
}

impl From<sea_orm::DbErr> for AppError {
    fn from(e: sea_orm::DbErr) -> Self {
        AppError::from(crate::infra::db_errors::map_db_err(e))
    }
}

impl From<AiError> for AppError {
    fn from(err: AiError) -> Self {
        match err {
            AiError::NotConfigured => AppError::ai_not_configured(),
            other => AppError::ai_upstream(other.to_string()),
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        self.status()
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status();
        let code = self.code().as_str().to_string();
        let detail = self.detail();
        let trace_id = trace_ctx::trace_id();

        let problem_details = ProblemDetails {
            type_: format!("https://taleforge.app/errors/{code}"),
            title: Self::humanize_code(&code),
            status: status.as_u16(),
            detail,
            code,
            trace_id: trace_id.clone(),
        };

        let mut builder = HttpResponse::build(status);
        builder
            .content_type("application/problem+json")
            .insert_header(("x-trace-id", trace_id));
        if status == StatusCode::UNAUTHORIZED {
            builder.insert_header((WWW_AUTHENTICATE, HeaderValue::from_static("Bearer")));
        }
        builder.json(problem_details)
    }
}
