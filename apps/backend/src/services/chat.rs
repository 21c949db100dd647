//! Chat dispatch and the multiplayer turn barrier.
//!
//! A turn either resolves immediately (single participant, independent
//! mode) or is staged in `pending_actions` until every eligible participant
//! of its thread has submitted. The request that completes the set claims
//! the rows by deleting exactly what it read, calls the narrator once, and
//! records one user message per participant plus the narration. If the
//! narrator fails the claimed rows are put back. A claim that finds rows
//! already gone rolls back and reports `claimed_elsewhere`.

use std::collections::{HashMap, HashSet};

use sea_orm::ConnectionTrait;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::ai::CompletionRequest;
use crate::db::require_db;
use crate::db::txn::with_txn;
use crate::domain::prompt::{
    build_messages, HistoryEntry, PartyMember, StoryContext, TurnAction, HISTORY_LIMIT,
};
use crate::domain::sync::{route_turn, SyncSlot, TurnRoute};
use crate::domain::tags::parse_narration;
use crate::entities::messages::MessageRole;
use crate::error::AppError;
use crate::errors::domain::{DomainError, ValidationKind};
use crate::errors::ErrorCode;
use crate::repos::games::{self as games_repo, Game};
use crate::repos::messages::{self as messages_repo, Message};
use crate::repos::participants::{self as participants_repo, ParticipantSummary};
use crate::repos::pending_actions::{self as pending_repo, PendingAction};
use crate::repos::profiles as profiles_repo;
use crate::services::narration::{apply_narration, InventoryTarget, NarrationEffects};
use crate::state::app_state::AppState;

pub const MAX_ACTION_LEN: usize = 2000;

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ChatOutcome {
    /// Staged; the barrier is still open.
    Waiting {
        thread: String,
        submitted: usize,
        expected: usize,
        waiting_on: Vec<String>,
    },
    /// The set was complete but a concurrent request resolved it.
    ClaimedElsewhere { thread: String },
    Resolved {
        thread: String,
        message: Message,
        effects: NarrationEffects,
    },
}

/// Barrier view for one participant.
#[derive(Debug, Clone, Serialize)]
pub struct TurnStatus {
    pub thread: String,
    /// `false` when turns resolve without waiting
    pub barrier: bool,
    pub has_submitted: bool,
    pub submitted: usize,
    pub expected: usize,
    pub waiting_on: Vec<String>,
}

enum Stage {
    Waiting {
        submitted: usize,
        waiting_on: Vec<i64>,
    },
    Claimed(Vec<PendingAction>),
}

fn validate_action(text: &str) -> Result<String, DomainError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(DomainError::validation(
            ValidationKind::Action,
            "Action cannot be empty",
        ));
    }
    if trimmed.chars().count() > MAX_ACTION_LEN {
        return Err(DomainError::validation(
            ValidationKind::Action,
            format!("Action must be at most {MAX_ACTION_LEN} characters"),
        ));
    }
    Ok(trimmed.to_string())
}

fn slots(party: &[ParticipantSummary]) -> Vec<SyncSlot> {
    party
        .iter()
        .map(|p| SyncSlot {
            user_id: p.user_id,
            mode: p.sync_mode,
            group: p.sync_group.clone(),
        })
        .collect()
}

fn name_of(party: &[ParticipantSummary], user_id: i64) -> String {
    party
        .iter()
        .find(|p| p.user_id == user_id)
        .map(|p| p.display_name().to_string())
        .unwrap_or_else(|| format!("Player {user_id}"))
}

fn names_of(party: &[ParticipantSummary], ids: &[i64]) -> Vec<String> {
    ids.iter().map(|id| name_of(party, *id)).collect()
}

/// Assemble the prompt for `actors` resolving on `thread`.
async fn build_completion<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game: &Game,
    party: &[ParticipantSummary],
    actors: &[i64],
    thread: &str,
    actions: &[TurnAction],
) -> Result<CompletionRequest, AppError> {
    let profiles: HashMap<i64, _> = profiles_repo::find_by_user_ids(conn, actors)
        .await?
        .into_iter()
        .map(|p| (p.user_id, p))
        .collect();

    let members: Vec<PartyMember<'_>> = party
        .iter()
        .filter(|p| actors.contains(&p.user_id))
        .map(|p| {
            let profile = profiles.get(&p.user_id);
            PartyMember {
                name: p.display_name(),
                attributes: profile.map(|pr| pr.attributes),
                preferences: profile.map(|pr| pr.preferences.as_str()).unwrap_or(""),
                inventory: &p.inventory,
            }
        })
        .collect();

    let history = messages_repo::recent_in_thread(conn, game.id, thread, HISTORY_LIMIT).await?;
    let names: HashMap<i64, String> = party
        .iter()
        .map(|p| (p.user_id, p.display_name().to_string()))
        .collect();
    let entries: Vec<HistoryEntry<'_>> = history
        .iter()
        .map(|m| HistoryEntry {
            role: m.role,
            author: m.author_id.and_then(|id| names.get(&id)).map(String::as_str),
            content: &m.content,
        })
        .collect();

    let story = StoryContext {
        title: &game.title,
        setting: &game.setting,
        level: game.level,
        alignment: &game.alignment,
        shared_inventory: &game.shared_inventory,
    };
    Ok(CompletionRequest::new(build_messages(
        &story, &members, &entries, actions,
    )))
}

/// Handle one chat submission from `user_id`.
pub async fn submit_turn(
    state: &AppState,
    game_id: i64,
    user_id: i64,
    text: &str,
) -> Result<ChatOutcome, AppError> {
    let text = validate_action(text)?;
    let db = require_db(state)?;

    let game = games_repo::require_game(db, game_id).await?;
    game.ensure_active()?;
    let party = participants_repo::list_summaries(db, game_id).await?;

    match route_turn(&slots(&party), user_id)? {
        TurnRoute::Immediate { thread } => {
            resolve_immediate(state, &game, &party, user_id, thread, text).await
        }
        TurnRoute::Barrier { thread, eligible } => {
            resolve_barrier(state, &game, &party, user_id, thread, eligible, text).await
        }
    }
}

async fn resolve_immediate(
    state: &AppState,
    game: &Game,
    party: &[ParticipantSummary],
    user_id: i64,
    thread: String,
    text: String,
) -> Result<ChatOutcome, AppError> {
    let db = require_db(state)?;
    let actions = [TurnAction {
        name: name_of(party, user_id),
        text: text.clone(),
    }];
    let request = build_completion(db, game, party, &[user_id], &thread, &actions).await?;

    debug!(game_id = game.id, thread = %thread, "Resolving turn immediately");
    let raw = state.ai.complete(request).await?;
    let (narration, tags) = parse_narration(&raw);

    let game_id = game.id;
    with_txn(state, move |txn| {
        Box::pin(async move {
            let game = games_repo::require_game(txn, game_id).await?;
            game.ensure_active()?;

            messages_repo::append(txn, game_id, &thread, MessageRole::User, &text, Some(user_id))
                .await?;
            let message = messages_repo::append(
                txn,
                game_id,
                &thread,
                MessageRole::Assistant,
                &narration,
                None,
            )
            .await?;
            let effects =
                apply_narration(txn, &game, InventoryTarget::Personal(user_id), &tags).await?;
            games_repo::touch(txn, game_id).await?;

            Ok(ChatOutcome::Resolved {
                thread,
                message,
                effects,
            })
        })
    })
    .await
}

async fn resolve_barrier(
    state: &AppState,
    game: &Game,
    party: &[ParticipantSummary],
    user_id: i64,
    thread: String,
    eligible: Vec<i64>,
    text: String,
) -> Result<ChatOutcome, AppError> {
    settle_thread(state, game, party, thread, eligible, Some((user_id, text))).await
}

/// Delete exactly `rows`, failing with `TurnClaimed` when some are already
/// gone. Run it inside `with_txn` so a lost claim rolls back whatever this
/// request did delete.
pub async fn claim_staged<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    rows: &[PendingAction],
) -> Result<(), AppError> {
    if pending_repo::claim(conn, rows).await? {
        Ok(())
    } else {
        Err(AppError::conflict(
            ErrorCode::TurnClaimed,
            "Turn already claimed by another request",
        ))
    }
}

/// Stage `submission` on `thread` if given, then resolve the thread once
/// every eligible participant has an action staged.
async fn settle_thread(
    state: &AppState,
    game: &Game,
    party: &[ParticipantSummary],
    thread: String,
    eligible: Vec<i64>,
    submission: Option<(i64, String)>,
) -> Result<ChatOutcome, AppError> {
    let game_id = game.id;
    let expected = eligible.len();

    let staged = {
        let thread = thread.clone();
        let eligible = eligible.clone();
        with_txn(state, move |txn| {
            Box::pin(async move {
                games_repo::require_game(txn, game_id)
                    .await?
                    .ensure_active()?;
                if let Some((user_id, text)) = &submission {
                    pending_repo::upsert(txn, game_id, *user_id, &thread, text).await?;
                }

                let rows: Vec<PendingAction> = pending_repo::list_for_thread(txn, game_id, &thread)
                    .await?
                    .into_iter()
                    .filter(|r| eligible.contains(&r.user_id))
                    .collect();
                let submitted: HashSet<i64> = rows.iter().map(|r| r.user_id).collect();
                let waiting_on: Vec<i64> = eligible
                    .iter()
                    .copied()
                    .filter(|id| !submitted.contains(id))
                    .collect();

                if !waiting_on.is_empty() || rows.is_empty() {
                    return Ok(Stage::Waiting {
                        submitted: submitted.len(),
                        waiting_on,
                    });
                }
                claim_staged(txn, &rows).await?;
                Ok(Stage::Claimed(rows))
            })
        })
        .await
    };

    let rows = match staged {
        Ok(Stage::Claimed(rows)) => rows,
        Ok(Stage::Waiting {
            submitted,
            waiting_on,
        }) => {
            debug!(game_id, thread = %thread, submitted, expected, "Turn staged");
            return Ok(ChatOutcome::Waiting {
                thread,
                submitted,
                expected,
                waiting_on: names_of(party, &waiting_on),
            });
        }
        Err(err) if err.code() == ErrorCode::TurnClaimed => {
            info!(game_id, thread = %thread, "Turn already claimed by another request");
            return Ok(ChatOutcome::ClaimedElsewhere { thread });
        }
        Err(err) => return Err(err),
    };

    let db = require_db(state)?;
    let actions: Vec<TurnAction> = rows
        .iter()
        .map(|r| TurnAction {
            name: name_of(party, r.user_id),
            text: r.content.clone(),
        })
        .collect();

    let completion = match build_completion(db, game, party, &eligible, &thread, &actions).await {
        Ok(request) => state.ai.complete(request).await.map_err(AppError::from),
        Err(e) => Err(e),
    };
    let raw = match completion {
        Ok(raw) => raw,
        Err(err) => {
            let restored = pending_repo::restore(db, &rows).await?;
            warn!(game_id, thread = %thread, restored, error = %err, "Narration failed; staged turns restored");
            return Err(err);
        }
    };

    info!(game_id, thread = %thread, players = rows.len(), "Resolving shared turn");
    let (narration, tags) = parse_narration(&raw);

    with_txn(state, move |txn| {
        Box::pin(async move {
            let game = games_repo::require_game(txn, game_id).await?;
            game.ensure_active()?;

            for row in &rows {
                messages_repo::append(
                    txn,
                    game_id,
                    &thread,
                    MessageRole::User,
                    &row.content,
                    Some(row.user_id),
                )
                .await?;
            }
            let message = messages_repo::append(
                txn,
                game_id,
                &thread,
                MessageRole::Assistant,
                &narration,
                None,
            )
            .await?;
            let effects = apply_narration(txn, &game, InventoryTarget::Shared, &tags).await?;
            games_repo::touch(txn, game_id).await?;

            Ok(ChatOutcome::Resolved {
                thread,
                message,
                effects,
            })
        })
    })
    .await
}

/// Resolve staged turn sets that a departure left complete.
///
/// Narrator or storage failures are logged and left for the next
/// submission to retry; the departure itself has already committed.
pub async fn settle_after_leave(state: &AppState, game_id: i64) -> Result<(), AppError> {
    let db = require_db(state)?;
    let game = games_repo::require_game(db, game_id).await?;
    if !game.is_active() {
        return Ok(());
    }
    let party = participants_repo::list_summaries(db, game_id).await?;
    let staged: HashSet<String> = pending_repo::list_for_game(db, game_id)
        .await?
        .into_iter()
        .map(|r| r.sync_group)
        .collect();

    let slots = slots(&party);
    let mut threads: Vec<(String, Vec<i64>)> = Vec::new();
    for p in &party {
        let (thread, eligible) = match route_turn(&slots, p.user_id)? {
            TurnRoute::Barrier { thread, eligible } => (thread, eligible),
            TurnRoute::Immediate { thread } => (thread, vec![p.user_id]),
        };
        if staged.contains(&thread) && !threads.iter().any(|(t, _)| *t == thread) {
            threads.push((thread, eligible));
        }
    }

    for (thread, eligible) in threads {
        match settle_thread(state, &game, &party, thread.clone(), eligible, None).await {
            Ok(ChatOutcome::Resolved { effects, .. }) => {
                info!(game_id, thread = %thread, "Staged turn resolved after a departure");
                if effects.archived {
                    break;
                }
            }
            Ok(_) => {}
            Err(err) => {
                warn!(game_id, thread = %thread, error = %err, "Staged turn left unresolved after a departure");
            }
        }
    }
    Ok(())
}

/// Where the caller's next turn goes and who the barrier still waits on.
pub async fn turn_status<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
    user_id: i64,
) -> Result<TurnStatus, AppError> {
    let party = participants_repo::list_summaries(conn, game_id).await?;
    match route_turn(&slots(&party), user_id)? {
        TurnRoute::Immediate { thread } => Ok(TurnStatus {
            thread,
            barrier: false,
            has_submitted: false,
            submitted: 0,
            expected: 1,
            waiting_on: Vec::new(),
        }),
        TurnRoute::Barrier { thread, eligible } => {
            let submitted: HashSet<i64> = pending_repo::list_for_thread(conn, game_id, &thread)
                .await?
                .into_iter()
                .map(|r| r.user_id)
                .filter(|id| eligible.contains(id))
                .collect();
            let waiting: Vec<i64> = eligible
                .iter()
                .copied()
                .filter(|id| !submitted.contains(id))
                .collect();
            Ok(TurnStatus {
                thread,
                barrier: true,
                has_submitted: submitted.contains(&user_id),
                submitted: submitted.len(),
                expected: eligible.len(),
                waiting_on: names_of(&party, &waiting),
            })
        }
    }
}

/// Withdraw the caller's staged action. Returns whether anything was removed.
pub async fn withdraw_turn<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
    user_id: i64,
) -> Result<bool, AppError> {
    games_repo::require_game(conn, game_id)
        .await?
        .ensure_active()?;
    Ok(pending_repo::withdraw(conn, game_id, user_id).await? > 0)
}
