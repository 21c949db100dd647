use serde_json::json;
use taleforge::ai::ChatRole;

use crate::common::assert_problem;
use crate::support::scripted_ai::DEFAULT_NARRATION;
use crate::support::{build_test_state, create_test_app, Api, ScriptedAi};

#[actix_web::test]
async fn test_solo_game_resolves_immediately() {
    let ai = ScriptedAi::new();
    let state = build_test_state(ai.clone()).await;
    let api = Api::new(create_test_app(state).await);
    let owner = api.register("solo").await;
    let game_id = api.create_game(&owner, "Lone Wolf").await;

    ai.reply("The door creaks open.");
    let reply = api.chat(game_id, &owner, "  I push the door  ").await;
    assert_eq!(reply.status.as_u16(), 200, "{}", reply.body);
    assert_eq!(reply.body["status"], "resolved");
    assert_eq!(reply.body["thread"], "main");
    assert_eq!(reply.body["message"]["role"], "assistant");
    assert_eq!(reply.body["message"]["content"], "The door creaks open.");
    assert_eq!(ai.completions(), 1);

    let log = api
        .get(&format!("/api/games/{game_id}/messages"), &owner.token)
        .await;
    let log = log.body.as_array().unwrap().clone();
    assert_eq!(log.len(), 2);
    assert_eq!(log[0]["role"], "user");
    assert_eq!(log[0]["content"], "I push the door");
    assert_eq!(log[0]["author_id"], owner.id);
    assert_eq!(log[1]["role"], "assistant");
    assert!(log[1]["author_id"].is_null());

    let turn = api
        .get(&format!("/api/games/{game_id}/turn"), &owner.token)
        .await;
    assert_eq!(turn.body["barrier"], false);
    assert_eq!(turn.body["thread"], "main");
}

#[actix_web::test]
async fn test_prompt_carries_history_and_character() {
    let ai = ScriptedAi::new();
    let state = build_test_state(ai.clone()).await;
    let api = Api::new(create_test_app(state).await);
    let owner = api.register("solo").await;
    api.put(
        "/api/profile",
        &owner.token,
        json!({
            "character_name": "Mira Vell",
            "attributes": {
                "strength": 8, "dexterity": 17, "constitution": 12,
                "intelligence": 13, "wisdom": 10, "charisma": 14
            },
            "preferences": "No spiders"
        }),
    )
    .await;
    let game_id = api.create_game(&owner, "Remembered").await;

    api.chat(game_id, &owner, "I light a candle").await;
    api.chat(game_id, &owner, "I read the letter").await;

    let request = ai.last_request().expect("narrator was called");
    let system = &request.messages[0];
    assert_eq!(system.role, ChatRole::System);
    assert!(system.content.contains("Remembered"));
    assert!(system.content.contains("Mira Vell"));
    assert!(system.content.contains("DEX 17"));
    assert!(system.content.contains("No spiders"));

    // system, previous action, previous narration, new action
    assert_eq!(request.messages.len(), 4);
    assert_eq!(request.messages[1].content, "**Mira Vell**: I light a candle");
    assert_eq!(request.messages[2].content, DEFAULT_NARRATION);
    assert_eq!(request.messages[3].content, "**Mira Vell**: I read the letter");
}

#[actix_web::test]
async fn test_action_validation() {
    let ai = ScriptedAi::new();
    let state = build_test_state(ai.clone()).await;
    let api = Api::new(create_test_app(state).await);
    let owner = api.register("solo").await;
    let game_id = api.create_game(&owner, "Terse").await;

    let reply = api.chat(game_id, &owner, "   ").await;
    assert_problem(reply.status, &reply.headers, &reply.body, (422, "INVALID_ACTION"));

    let long = "a".repeat(2001);
    let reply = api.chat(game_id, &owner, &long).await;
    assert_problem(reply.status, &reply.headers, &reply.body, (422, "INVALID_ACTION"));
    assert_eq!(ai.completions(), 0);
}

#[actix_web::test]
async fn test_solo_failure_writes_nothing() {
    let ai = ScriptedAi::new();
    let state = build_test_state(ai.clone()).await;
    let api = Api::new(create_test_app(state).await);
    let owner = api.register("solo").await;
    let game_id = api.create_game(&owner, "Flaky").await;

    ai.fail_next();
    let reply = api.chat(game_id, &owner, "I wait").await;
    assert_problem(reply.status, &reply.headers, &reply.body, (502, "AI_UPSTREAM"));

    let log = api
        .get(&format!("/api/games/{game_id}/messages"), &owner.token)
        .await;
    assert!(log.body.as_array().unwrap().is_empty());
}
