//! Per-game votes: `topic -> { user_id -> choice }`.

use std::collections::BTreeMap;

use crate::errors::domain::{DomainError, ValidationKind};

pub const ARCHIVE_TOPIC: &str = "archive";
pub const MAX_TOPIC_LEN: usize = 64;
pub const MAX_CHOICE_LEN: usize = 64;

pub type VoteBook = BTreeMap<String, BTreeMap<i64, String>>;

fn normalize(value: &str, what: &str, max: usize) -> Result<String, DomainError> {
    let v = value.trim().to_lowercase();
    if v.is_empty() || v.chars().count() > max {
        return Err(DomainError::validation(
            ValidationKind::Vote,
            format!("{what} must be 1-{max} characters"),
        ));
    }
    Ok(v)
}

/// Record (or replace) `user_id`'s choice on `topic`.
pub fn cast(book: &mut VoteBook, topic: &str, user_id: i64, choice: &str) -> Result<(), DomainError> {
    let topic = normalize(topic, "Topic", MAX_TOPIC_LEN)?;
    let choice = normalize(choice, "Choice", MAX_CHOICE_LEN)?;
    book.entry(topic).or_default().insert(user_id, choice);
    Ok(())
}

/// choice -> count for one topic.
pub fn tally(book: &VoteBook, topic: &str) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    if let Some(ballots) = book.get(topic) {
        for choice in ballots.values() {
            *counts.entry(choice.clone()).or_insert(0) += 1;
        }
    }
    counts
}

/// Every listed voter chose "yes" on `topic`.
pub fn is_unanimous_yes(book: &VoteBook, topic: &str, voters: &[i64]) -> bool {
    let Some(ballots) = book.get(topic) else {
        return false;
    };
    !voters.is_empty()
        && voters
            .iter()
            .all(|id| ballots.get(id).map(String::as_str) == Some("yes"))
}

/// Drop ballots of users no longer in the game.
pub fn retain_voters(book: &mut VoteBook, voters: &[i64]) {
    for ballots in book.values_mut() {
        ballots.retain(|id, _| voters.contains(id));
    }
    book.retain(|_, ballots| !ballots.is_empty());
}
