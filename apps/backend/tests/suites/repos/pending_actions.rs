use taleforge::db::require_db;
use taleforge::repos::pending_actions as pending;

use super::seeded_game;

#[actix_web::test]
async fn test_upsert_keeps_one_row_per_player_and_thread() {
    let (state, game_id, ids) = seeded_game(2).await;
    let db = require_db(&state).unwrap();

    pending::upsert(db, game_id, ids[0], "main", "first").await.unwrap();
    pending::upsert(db, game_id, ids[0], "main", "second").await.unwrap();
    pending::upsert(db, game_id, ids[1], "main", "other").await.unwrap();
    pending::upsert(db, game_id, ids[1], "group:north", "elsewhere")
        .await
        .unwrap();

    let rows = pending::list_for_thread(db, game_id, "main").await.unwrap();
    assert_eq!(rows.len(), 2);
    let mine = rows.iter().find(|r| r.user_id == ids[0]).unwrap();
    assert_eq!(mine.content, "second");

    let north = pending::list_for_thread(db, game_id, "group:north")
        .await
        .unwrap();
    assert_eq!(north.len(), 1);
    assert_eq!(pending::list_for_user(db, game_id, ids[1]).await.unwrap().len(), 2);
}

#[actix_web::test]
async fn test_only_one_claim_wins() {
    let (state, game_id, ids) = seeded_game(2).await;
    let db = require_db(&state).unwrap();

    pending::upsert(db, game_id, ids[0], "main", "left").await.unwrap();
    pending::upsert(db, game_id, ids[1], "main", "right").await.unwrap();
    let rows = pending::list_for_thread(db, game_id, "main").await.unwrap();

    assert!(pending::claim(db, &rows).await.unwrap());
    assert!(!pending::claim(db, &rows).await.unwrap());
    assert!(pending::list_for_thread(db, game_id, "main")
        .await
        .unwrap()
        .is_empty());
}

#[actix_web::test]
async fn test_partial_claim_loses() {
    let (state, game_id, ids) = seeded_game(2).await;
    let db = require_db(&state).unwrap();

    pending::upsert(db, game_id, ids[0], "main", "left").await.unwrap();
    pending::upsert(db, game_id, ids[1], "main", "right").await.unwrap();
    let rows = pending::list_for_thread(db, game_id, "main").await.unwrap();

    // Someone withdrew between the read and the claim
    pending::withdraw(db, game_id, ids[1]).await.unwrap();
    assert!(!pending::claim(db, &rows).await.unwrap());

    // The withdrawal stands
    assert!(pending::list_for_user(db, game_id, ids[1])
        .await
        .unwrap()
        .is_empty());
}

#[actix_web::test]
async fn test_losing_claim_does_not_revive_rows() {
    let (state, game_id, ids) = seeded_game(2).await;
    let db = require_db(&state).unwrap();

    pending::upsert(db, game_id, ids[0], "main", "left").await.unwrap();
    pending::upsert(db, game_id, ids[1], "main", "right").await.unwrap();
    let rows = pending::list_for_thread(db, game_id, "main").await.unwrap();

    assert!(pending::claim(db, &rows).await.unwrap());
    assert!(!pending::claim(db, &rows).await.unwrap());
    assert!(pending::list_for_game(db, game_id).await.unwrap().is_empty());
}

#[actix_web::test]
async fn test_restore_prefers_newer_submission() {
    let (state, game_id, ids) = seeded_game(2).await;
    let db = require_db(&state).unwrap();

    pending::upsert(db, game_id, ids[0], "main", "old plan").await.unwrap();
    pending::upsert(db, game_id, ids[1], "main", "steady").await.unwrap();
    let rows = pending::list_for_thread(db, game_id, "main").await.unwrap();
    assert!(pending::claim(db, &rows).await.unwrap());

    pending::upsert(db, game_id, ids[0], "main", "new plan").await.unwrap();
    let restored = pending::restore(db, &rows).await.unwrap();
    assert_eq!(restored, 1);

    let rows = pending::list_for_thread(db, game_id, "main").await.unwrap();
    assert_eq!(rows.len(), 2);
    let mine = rows.iter().find(|r| r.user_id == ids[0]).unwrap();
    assert_eq!(mine.content, "new plan");
}

#[actix_web::test]
async fn test_clear_game_drops_every_thread() {
    let (state, game_id, ids) = seeded_game(3).await;
    let db = require_db(&state).unwrap();

    pending::upsert(db, game_id, ids[0], "main", "a").await.unwrap();
    pending::upsert(db, game_id, ids[1], "group:north", "b").await.unwrap();
    pending::upsert(db, game_id, ids[2], "group:south", "c").await.unwrap();

    assert_eq!(pending::clear_game(db, game_id).await.unwrap(), 3);
    assert_eq!(pending::withdraw(db, game_id, ids[0]).await.unwrap(), 0);
}
