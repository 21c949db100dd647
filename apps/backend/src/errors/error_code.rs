//! Error codes for the Taleforge backend API.
//!
//! Every code that can appear in a problem+json body lives here. Add new
//! codes to this enum; never pass ad-hoc strings as error codes.

use core::fmt;

/// Centralized error codes. Each variant maps to a SCREAMING_SNAKE_CASE
/// string that appears verbatim in HTTP responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Authentication & Authorization
    Unauthorized,
    UnauthorizedMissingBearer,
    UnauthorizedInvalidJwt,
    UnauthorizedExpiredJwt,
    /// Username/password pair did not match
    InvalidCredentials,
    Forbidden,
    ForbiddenUserNotFound,
    /// Caller does not participate in the game
    NotAMember,
    /// Operation restricted to the game owner
    NotGameOwner,
    /// Operation restricted to administrators
    AdminRequired,

    // Request Validation
    InvalidGameId,
    InvalidUsername,
    InvalidPassword,
    InvalidProfile,
    InvalidGame,
    InvalidSyncConfig,
    /// Empty or oversized player action
    InvalidAction,
    InvalidVote,
    InvalidMessage,
    ValidationError,
    BadRequest,

    // Game state
    GameArchived,
    GameFull,

    // Resource Not Found
    GameNotFound,
    UserNotFound,
    ProfileNotFound,
    InvitationNotFound,
    ItemNotFound,
    NotFound,

    // Business Logic Conflicts
    UsernameTaken,
    AlreadyParticipant,
    InvitationAlreadyResolved,
    /// Another request already claimed the staged turn set
    TurnClaimed,
    OwnerCannotLeave,
    CannotDemoteSelf,
    Conflict,

    // System Errors
    DbError,
    DbUnavailable,
    UniqueViolation,
    RecordNotFound,
    /// AI provider returned an error or was unreachable
    AiUpstream,
    /// No AI provider credentials configured
    AiNotConfigured,
    Internal,
    ConfigError,
    DataCorruption,
}

impl ErrorCode {
    /// Returns the canonical string for this error code.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Unauthorized => "UNAUTHORIZED",
            Self::UnauthorizedMissingBearer => "UNAUTHORIZED_MISSING_BEARER",
            Self::UnauthorizedInvalidJwt => "UNAUTHORIZED_INVALID_JWT",
            Self::UnauthorizedExpiredJwt => "UNAUTHORIZED_EXPIRED_JWT",
            Self::InvalidCredentials => "INVALID_CREDENTIALS",
            Self::Forbidden => "FORBIDDEN",
            Self::ForbiddenUserNotFound => "FORBIDDEN_USER_NOT_FOUND",
            Self::NotAMember => "NOT_A_MEMBER",
            Self::NotGameOwner => "NOT_GAME_OWNER",
            Self::AdminRequired => "ADMIN_REQUIRED",

            Self::InvalidGameId => "INVALID_GAME_ID",
            Self::InvalidUsername => "INVALID_USERNAME",
            Self::InvalidPassword => "INVALID_PASSWORD",
            Self::InvalidProfile => "INVALID_PROFILE",
            Self::InvalidGame => "INVALID_GAME",
            Self::InvalidSyncConfig => "INVALID_SYNC_CONFIG",
            Self::InvalidAction => "INVALID_ACTION",
            Self::InvalidVote => "INVALID_VOTE",
            Self::InvalidMessage => "INVALID_MESSAGE",
            Self::ValidationError => "VALIDATION_ERROR",
            Self::BadRequest => "BAD_REQUEST",

            Self::GameArchived => "GAME_ARCHIVED",
            Self::GameFull => "GAME_FULL",

            Self::GameNotFound => "GAME_NOT_FOUND",
            Self::UserNotFound => "USER_NOT_FOUND",
            Self::ProfileNotFound => "PROFILE_NOT_FOUND",
            Self::InvitationNotFound => "INVITATION_NOT_FOUND",
            Self::ItemNotFound => "ITEM_NOT_FOUND",
            Self::NotFound => "NOT_FOUND",

            Self::UsernameTaken => "USERNAME_TAKEN",
            Self::AlreadyParticipant => "ALREADY_PARTICIPANT",
            Self::InvitationAlreadyResolved => "INVITATION_ALREADY_RESOLVED",
            Self::TurnClaimed => "TURN_CLAIMED",
            Self::OwnerCannotLeave => "OWNER_CANNOT_LEAVE",
            Self::CannotDemoteSelf => "CANNOT_DEMOTE_SELF",
            Self::Conflict => "CONFLICT",

            Self::DbError => "DB_ERROR",
            Self::DbUnavailable => "DB_UNAVAILABLE",
            Self::UniqueViolation => "UNIQUE_VIOLATION",
            Self::RecordNotFound => "RECORD_NOT_FOUND",
            Self::AiUpstream => "AI_UPSTREAM",
            Self::AiNotConfigured => "AI_NOT_CONFIGURED",
            Self::Internal => "INTERNAL",
            Self::ConfigError => "CONFIG_ERROR",
            Self::DataCorruption => "DATA_CORRUPTION",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
