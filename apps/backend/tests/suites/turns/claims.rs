use taleforge::db::require_db;
use taleforge::db::txn::with_txn;
use taleforge::errors::ErrorCode;
use taleforge::repos::pending_actions::{self, PendingAction};
use taleforge::services::chat::claim_staged;
use taleforge::AppState;

use crate::support::{build_test_state, create_test_app, Api, ScriptedAi};

async fn claim_in_txn(state: &AppState, rows: &[PendingAction]) -> Result<(), ErrorCode> {
    let rows = rows.to_vec();
    with_txn(state, move |txn| {
        Box::pin(async move { claim_staged(txn, &rows).await })
    })
    .await
    .map_err(|e| e.code())
}

#[actix_web::test]
async fn test_second_claim_leaves_nothing_behind() {
    let ai = ScriptedAi::new();
    let state = build_test_state(ai.clone()).await;
    let api = Api::new(create_test_app(state.clone()).await);
    let owner = api.register("owner").await;
    let guest = api.register("guest").await;
    let third = api.register("third").await;
    let game_id = api.create_game(&owner, "Race").await;
    api.join(game_id, &owner, &guest).await;
    api.join(game_id, &owner, &third).await;

    api.chat(game_id, &owner, "I go left").await;
    api.chat(game_id, &guest, "I go right").await;
    let db = require_db(&state).unwrap();
    let rows = pending_actions::list_for_thread(db, game_id, "main")
        .await
        .unwrap();
    assert_eq!(rows.len(), 2);

    assert_eq!(claim_in_txn(&state, &rows).await, Ok(()));
    assert_eq!(
        claim_in_txn(&state, &rows).await,
        Err(ErrorCode::TurnClaimed)
    );
    assert!(pending_actions::list_for_game(db, game_id)
        .await
        .unwrap()
        .is_empty());

    // The claimed set stays claimed; nothing fires on stale text
    let reply = api.chat(game_id, &third, "I wait").await;
    assert_eq!(reply.body["status"], "waiting", "{}", reply.body);
    assert_eq!(reply.body["submitted"], 1);
    assert_eq!(ai.completions(), 0);
}

#[actix_web::test]
async fn test_claim_after_withdraw_rolls_back() {
    let ai = ScriptedAi::new();
    let state = build_test_state(ai.clone()).await;
    let api = Api::new(create_test_app(state.clone()).await);
    let owner = api.register("owner").await;
    let guest = api.register("guest").await;
    let game_id = api.create_game(&owner, "Cold Feet").await;
    api.join(game_id, &owner, &guest).await;

    api.chat(game_id, &owner, "I open the vault").await;
    let db = require_db(&state).unwrap();
    pending_actions::upsert(db, game_id, guest.id, "main", "I follow")
        .await
        .unwrap();
    let rows = pending_actions::list_for_thread(db, game_id, "main")
        .await
        .unwrap();

    let reply = api
        .delete(&format!("/api/games/{game_id}/turn"), &guest.token)
        .await;
    assert_eq!(reply.body["withdrawn"], true);

    assert_eq!(
        claim_in_txn(&state, &rows).await,
        Err(ErrorCode::TurnClaimed)
    );

    // The owner's action survives the rollback and the withdrawal stands
    let status = api
        .get(&format!("/api/games/{game_id}/turn"), &owner.token)
        .await;
    assert_eq!(status.body["submitted"], 1);
    assert_eq!(status.body["has_submitted"], true);
    assert_eq!(status.body["waiting_on"], serde_json::json!([guest.username]));
    assert_eq!(ai.completions(), 0);
}
