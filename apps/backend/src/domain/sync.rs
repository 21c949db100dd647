//! Turn routing across sync modes.
//!
//! Every turn lands on a thread. `main` and `group:<name>` threads are
//! shared and resolve behind the barrier; `solo:<user_id>` threads resolve
//! on submission.

use crate::entities::game_participants::SyncMode;
use crate::errors::domain::{DomainError, ForbiddenKind, ValidationKind};

pub const MAIN_THREAD: &str = "main";
pub const MAX_GROUP_NAME: usize = 32;

pub fn group_thread(name: &str) -> String {
    format!("group:{name}")
}

pub fn solo_thread(user_id: i64) -> String {
    format!("solo:{user_id}")
}

/// The routing-relevant part of a participant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncSlot {
    pub user_id: i64,
    pub mode: SyncMode,
    pub group: Option<String>,
}

impl SyncSlot {
    /// Shared thread this slot waits on; `None` for independent play.
    /// A group member without a group name falls back to the main thread.
    pub fn shared_thread(&self) -> Option<String> {
        match (self.mode, self.group.as_deref()) {
            (SyncMode::Independent, _) => None,
            (SyncMode::Group, Some(name)) => Some(group_thread(name)),
            (SyncMode::Group, None) | (SyncMode::Main, _) => Some(MAIN_THREAD.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnRoute {
    /// Resolve now on `thread` with only the caller's action.
    Immediate { thread: String },
    /// Stage the action; resolve when every user in `eligible` has one.
    Barrier { thread: String, eligible: Vec<i64> },
}

impl TurnRoute {
    pub fn thread(&self) -> &str {
        match self {
            TurnRoute::Immediate { thread } | TurnRoute::Barrier { thread, .. } => thread,
        }
    }
}

/// Decide how `caller`'s turn resolves given every participant of the game.
pub fn route_turn(slots: &[SyncSlot], caller: i64) -> Result<TurnRoute, DomainError> {
    let me = slots.iter().find(|s| s.user_id == caller).ok_or_else(|| {
        DomainError::forbidden(ForbiddenKind::NotAMember, "Not a participant in this game")
    })?;

    if slots.len() == 1 {
        return Ok(TurnRoute::Immediate {
            thread: MAIN_THREAD.to_string(),
        });
    }

    match me.shared_thread() {
        None => Ok(TurnRoute::Immediate {
            thread: solo_thread(caller),
        }),
        Some(thread) => {
            let eligible = slots
                .iter()
                .filter(|s| s.shared_thread().as_deref() == Some(thread.as_str()))
                .map(|s| s.user_id)
                .collect();
            Ok(TurnRoute::Barrier { thread, eligible })
        }
    }
}

/// Group names: 1-32 characters of letters, digits, space, `_` or `-`.
pub fn validate_group_name(name: &str) -> Result<(), DomainError> {
    let trimmed = name.trim();
    if trimmed.is_empty() || trimmed.len() > MAX_GROUP_NAME || trimmed != name {
        return Err(DomainError::validation(
            ValidationKind::SyncConfig,
            format!("Invalid group name '{name}'"),
        ));
    }
    if !name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == ' ' || c == '_' || c == '-')
    {
        return Err(DomainError::validation(
            ValidationKind::SyncConfig,
            format!("Group name '{name}' contains unsupported characters"),
        ));
    }
    Ok(())
}
