use serde_json::json;
use taleforge::db::require_db;
use taleforge::repos::pending_actions;

use crate::common::assert_problem;
use crate::support::{build_test_state, create_test_app, Api, ScriptedAi};

#[actix_web::test]
async fn test_solo_items_go_to_personal_inventory() {
    let ai = ScriptedAi::new();
    let state = build_test_state(ai.clone()).await;
    let api = Api::new(create_test_app(state).await);
    let owner = api.register("solo").await;
    let game_id = api.create_game(&owner, "Pockets").await;

    ai.reply("You pocket a key. [ITEM_ADD: Iron Key]");
    let reply = api.chat(game_id, &owner, "I search the desk").await;
    assert_eq!(reply.body["message"]["content"], "You pocket a key.");
    assert_eq!(reply.body["effects"]["items_added"], json!(["Iron Key"]));

    let detail = api
        .get(&format!("/api/games/{game_id}"), &owner.token)
        .await;
    assert_eq!(detail.body["shared_inventory"], json!([]));
    assert_eq!(detail.body["participants"][0]["inventory"], json!(["Iron Key"]));

    ai.reply("The key snaps in the lock. [ITEM_REMOVE: iron key]");
    let reply = api.chat(game_id, &owner, "I force the lock").await;
    assert_eq!(reply.body["effects"]["items_removed"], json!(["Iron Key"]));

    let detail = api
        .get(&format!("/api/games/{game_id}"), &owner.token)
        .await;
    assert_eq!(detail.body["participants"][0]["inventory"], json!([]));
}

#[actix_web::test]
async fn test_shared_turn_updates_party_state() {
    let ai = ScriptedAi::new();
    let state = build_test_state(ai.clone()).await;
    let api = Api::new(create_test_app(state).await);
    let owner = api.register("owner").await;
    let guest = api.register("guest").await;
    let game_id = api.create_game(&owner, "Spoils").await;
    api.join(game_id, &owner, &guest).await;

    ai.reply(
        "The dragon falls. [ITEM_ADD: Dragon Scale] [LEVEL_UP]\n\
         Mercy shapes you. [ALIGNMENT: lawful good]",
    );
    api.chat(game_id, &owner, "I strike").await;
    let reply = api.chat(game_id, &guest, "I shield").await;
    assert_eq!(reply.body["status"], "resolved", "{}", reply.body);
    assert_eq!(
        reply.body["message"]["content"],
        "The dragon falls.\nMercy shapes you."
    );
    let effects = &reply.body["effects"];
    assert_eq!(effects["level_up"], true);
    assert_eq!(effects["new_level"], 2);
    assert_eq!(effects["alignment"], "lawful good");
    assert_eq!(effects["archived"], false);

    let detail = api
        .get(&format!("/api/games/{game_id}"), &guest.token)
        .await;
    assert_eq!(detail.body["shared_inventory"], json!(["Dragon Scale"]));
    assert_eq!(detail.body["level"], 2);
    assert_eq!(detail.body["alignment"], "lawful good");
    assert_eq!(detail.body["participants"][0]["inventory"], json!([]));
}

#[actix_web::test]
async fn test_terminal_tags_archive_once() {
    let ai = ScriptedAi::new();
    let state = build_test_state(ai.clone()).await;
    let api = Api::new(create_test_app(state).await);
    let owner = api.register("solo").await;
    let game_id = api.create_game(&owner, "Last Stand").await;

    ai.reply("You win, then fall. [VICTORY] [GAME_OVER]");
    let reply = api.chat(game_id, &owner, "I charge").await;
    assert_eq!(reply.status.as_u16(), 200, "{}", reply.body);
    let effects = &reply.body["effects"];
    assert_eq!(effects["victory"], true);
    assert_eq!(effects["game_over"], true);
    assert_eq!(effects["archived"], true);

    let detail = api
        .get(&format!("/api/games/{game_id}"), &owner.token)
        .await;
    assert_eq!(detail.body["status"], "archived");
    assert!(!detail.body["archived_at"].is_null());

    let reply = api.chat(game_id, &owner, "I get up").await;
    assert_problem(reply.status, &reply.headers, &reply.body, (409, "GAME_ARCHIVED"));
    assert_eq!(ai.completions(), 1);

    // The log stays readable
    let log = api
        .get(&format!("/api/games/{game_id}/messages"), &owner.token)
        .await;
    assert_eq!(log.body.as_array().unwrap().len(), 2);
}

#[actix_web::test]
async fn test_archiving_narration_discards_other_groups() {
    let ai = ScriptedAi::new();
    let state = build_test_state(ai.clone()).await;
    let api = Api::new(create_test_app(state.clone()).await);
    let owner = api.register("owner").await;
    let a = api.register("north").await;
    let b = api.register("south").await;
    let c = api.register("southtoo").await;
    let game_id = api.create_game(&owner, "Sudden End").await;
    for p in [&a, &b, &c] {
        api.join(game_id, &owner, p).await;
    }
    api.put(
        &format!("/api/games/{game_id}/sync"),
        &owner.token,
        json!({
            "groups": ["north", "south"],
            "assignments": [
                { "user_id": owner.id, "mode": "group", "group": "north" },
                { "user_id": a.id, "mode": "group", "group": "north" },
                { "user_id": b.id, "mode": "group", "group": "south" },
                { "user_id": c.id, "mode": "group", "group": "south" }
            ]
        }),
    )
    .await;

    api.chat(game_id, &b, "South: I wait").await;
    api.chat(game_id, &owner, "North: I pull the lever").await;
    ai.reply("The mountain collapses. [GAME_OVER]");
    let reply = api.chat(game_id, &a, "North: I run").await;
    assert_eq!(reply.body["effects"]["archived"], true, "{}", reply.body);

    let db = require_db(&state).unwrap();
    let south = pending_actions::list_for_thread(db, game_id, "group:south")
        .await
        .unwrap();
    assert!(south.is_empty());

    let reply = api.chat(game_id, &c, "South: I climb").await;
    assert_problem(reply.status, &reply.headers, &reply.body, (409, "GAME_ARCHIVED"));
}

#[actix_web::test]
async fn test_reported_items_match_stored_names() {
    let ai = ScriptedAi::new();
    let state = build_test_state(ai.clone()).await;
    let api = Api::new(create_test_app(state).await);
    let owner = api.register("solo").await;
    let game_id = api.create_game(&owner, "Long Names").await;

    let long = "Sword of ".to_string() + &"a".repeat(120);
    ai.reply(&format!("A blade gleams. [ITEM_ADD: {long}]"));
    let reply = api.chat(game_id, &owner, "I take it").await;
    let reported = reply.body["effects"]["items_added"][0]
        .as_str()
        .unwrap()
        .to_string();
    assert_eq!(reported.chars().count(), 80);

    let detail = api
        .get(&format!("/api/games/{game_id}"), &owner.token)
        .await;
    assert_eq!(detail.body["participants"][0]["inventory"], json!([reported]));
}
