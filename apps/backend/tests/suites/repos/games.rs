use taleforge::db::require_db;
use taleforge::entities::games::GameStatus;
use taleforge::repos::games::{self, GameChanges};

use super::seeded_game;

#[actix_web::test]
async fn test_archive_if_active_is_one_shot() {
    let (state, game_id, _) = seeded_game(1).await;
    let db = require_db(&state).unwrap();

    assert!(games::archive_if_active(db, game_id).await.unwrap());
    assert!(!games::archive_if_active(db, game_id).await.unwrap());

    let game = games::require_game(db, game_id).await.unwrap();
    assert_eq!(game.status, GameStatus::Archived);
    assert!(game.archived_at.is_some());
    assert!(game.ensure_active().is_err());
}

#[actix_web::test]
async fn test_partial_update_leaves_other_columns() {
    let (state, game_id, _) = seeded_game(1).await;
    let db = require_db(&state).unwrap();

    games::update_game(
        db,
        game_id,
        GameChanges {
            shared_inventory: Some(vec!["Rope".into(), "Lantern".into()]),
            ..GameChanges::default()
        },
    )
    .await
    .unwrap();

    let game = games::require_game(db, game_id).await.unwrap();
    assert_eq!(game.shared_inventory, vec!["Rope".to_string(), "Lantern".to_string()]);
    assert_eq!(game.level, 1);
    assert_eq!(game.alignment, "neutral");
    assert_eq!(game.title, "Seeded");
}
