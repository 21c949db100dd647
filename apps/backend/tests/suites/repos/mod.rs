pub mod games;
pub mod pending_actions;

use taleforge::db::require_db;
use taleforge::repos::{games as games_repo, participants, users};
use taleforge::state::app_state::AppState;

use crate::support::{build_test_state, ScriptedAi};

/// A migrated database holding one game with `players` participants.
/// Returns the state, the game id and the participant user ids.
pub async fn seeded_game(players: usize) -> (AppState, i64, Vec<i64>) {
    let state = build_test_state(ScriptedAi::new()).await;
    let db = require_db(&state).unwrap();

    let mut ids = Vec::with_capacity(players);
    for i in 0..players {
        let user = users::create_user(db, &format!("player{i}"), "not-a-real-hash", false)
            .await
            .unwrap();
        ids.push(user.id);
    }
    let game = games_repo::create_game(db, ids[0], "Seeded", "A quiet inn", "neutral")
        .await
        .unwrap();
    for id in &ids {
        participants::add(db, game.id, *id).await.unwrap();
    }
    (state, game.id, ids)
}
