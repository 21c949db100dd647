//! Game votes. A unanimous "yes" on `archive` ends the game.

use std::collections::BTreeMap;

use sea_orm::ConnectionTrait;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::domain::votes::{cast, is_unanimous_yes, tally, VoteBook, ARCHIVE_TOPIC};
use crate::error::AppError;
use crate::repos::games::{self as games_repo, GameChanges};
use crate::repos::participants as participants_repo;
use crate::repos::pending_actions as pending_repo;

#[derive(Debug, Clone, Deserialize)]
pub struct CastVoteRequest {
    pub topic: String,
    pub choice: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct TopicTally {
    pub ballots: BTreeMap<i64, String>,
    pub counts: BTreeMap<String, usize>,
}

#[derive(Debug, Clone, Serialize)]
pub struct VoteSummary {
    pub topics: BTreeMap<String, TopicTally>,
    pub voters: usize,
    /// Set when this vote archived the game
    pub archived: bool,
}

fn summarize(book: &VoteBook, voters: usize, archived: bool) -> VoteSummary {
    let topics = book
        .iter()
        .map(|(topic, ballots)| {
            (
                topic.clone(),
                TopicTally {
                    ballots: ballots.clone(),
                    counts: tally(book, topic),
                },
            )
        })
        .collect();
    VoteSummary {
        topics,
        voters,
        archived,
    }
}

pub async fn get_votes<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
) -> Result<VoteSummary, AppError> {
    let game = games_repo::require_game(conn, game_id).await?;
    let voters = participants_repo::count_by_game(conn, game_id).await? as usize;
    Ok(summarize(&game.votes, voters, false))
}

/// Record a ballot. Run inside a transaction.
pub async fn cast_vote<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
    user_id: i64,
    req: CastVoteRequest,
) -> Result<VoteSummary, AppError> {
    let game = games_repo::require_game(conn, game_id).await?;
    game.ensure_active()?;

    let mut book = game.votes;
    cast(&mut book, &req.topic, user_id, &req.choice)?;
    games_repo::update_game(
        conn,
        game_id,
        GameChanges {
            votes: Some(book.clone()),
            ..GameChanges::default()
        },
    )
    .await?;

    let voters: Vec<i64> = participants_repo::list_by_game(conn, game_id)
        .await?
        .into_iter()
        .map(|p| p.user_id)
        .collect();

    let mut archived = false;
    if is_unanimous_yes(&book, ARCHIVE_TOPIC, &voters) {
        archived = games_repo::archive_if_active(conn, game_id).await?;
        if archived {
            pending_repo::clear_game(conn, game_id).await?;
            info!(game_id, "Game archived by unanimous vote");
        }
    }

    Ok(summarize(&book, voters.len(), archived))
}
