use serde_json::json;
use taleforge::db::require_db;
use taleforge::repos::pending_actions;

use crate::common::assert_problem;
use crate::support::api::Player;
use crate::support::{build_test_state, create_test_app, Api, ScriptedAi};

fn user_messages(log: &serde_json::Value) -> Vec<(i64, String)> {
    log.as_array()
        .unwrap()
        .iter()
        .filter(|m| m["role"] == "user")
        .map(|m| {
            (
                m["author_id"].as_i64().unwrap(),
                m["content"].as_str().unwrap().to_string(),
            )
        })
        .collect()
}

#[actix_web::test]
async fn test_barrier_waits_then_resolves_once() {
    let ai = ScriptedAi::new();
    let state = build_test_state(ai.clone()).await;
    let api = Api::new(create_test_app(state).await);
    let owner = api.register("owner").await;
    let guest = api.register("guest").await;
    let third = api.register("third").await;
    let game_id = api.create_game(&owner, "Three Way").await;
    api.join(game_id, &owner, &guest).await;
    api.join(game_id, &owner, &third).await;

    let reply = api.chat(game_id, &owner, "I scout ahead").await;
    assert_eq!(reply.body["status"], "waiting", "{}", reply.body);
    assert_eq!(reply.body["thread"], "main");
    assert_eq!(reply.body["submitted"], 1);
    assert_eq!(reply.body["expected"], 3);
    let waiting: Vec<&str> = reply.body["waiting_on"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v.as_str().unwrap())
        .collect();
    assert!(waiting.contains(&guest.username.as_str()));
    assert!(waiting.contains(&third.username.as_str()));

    let reply = api.chat(game_id, &guest, "I guard the rear").await;
    assert_eq!(reply.body["status"], "waiting");
    assert_eq!(reply.body["submitted"], 2);
    assert_eq!(reply.body["waiting_on"], json!([third.username]));
    assert_eq!(ai.completions(), 0);

    let status = api
        .get(&format!("/api/games/{game_id}/turn"), &third.token)
        .await;
    assert_eq!(status.body["barrier"], true);
    assert_eq!(status.body["has_submitted"], false);
    assert_eq!(status.body["submitted"], 2);
    assert_eq!(status.body["expected"], 3);

    ai.reply("Together you press into the dark.");
    let reply = api.chat(game_id, &third, "I hum a tune").await;
    assert_eq!(reply.body["status"], "resolved", "{}", reply.body);
    assert_eq!(reply.body["message"]["content"], "Together you press into the dark.");
    assert_eq!(ai.completions(), 1);

    // Every action went into one prompt
    let request = ai.last_request().unwrap();
    let actions = &request.messages.last().unwrap().content;
    assert!(actions.contains("I scout ahead"));
    assert!(actions.contains("I guard the rear"));
    assert!(actions.contains("I hum a tune"));

    let log = api
        .get(&format!("/api/games/{game_id}/messages?thread=main"), &owner.token)
        .await;
    let users = user_messages(&log.body);
    assert_eq!(users.len(), 3);
    assert_eq!(users[0], (owner.id, "I scout ahead".to_string()));
    assert_eq!(log.body.as_array().unwrap().len(), 4);

    // Barrier reset
    let status = api
        .get(&format!("/api/games/{game_id}/turn"), &owner.token)
        .await;
    assert_eq!(status.body["submitted"], 0);
}

#[actix_web::test]
async fn test_resubmission_overwrites_staged_action() {
    let ai = ScriptedAi::new();
    let state = build_test_state(ai.clone()).await;
    let api = Api::new(create_test_app(state).await);
    let owner = api.register("owner").await;
    let guest = api.register("guest").await;
    let game_id = api.create_game(&owner, "Second Thoughts").await;
    api.join(game_id, &owner, &guest).await;

    api.chat(game_id, &owner, "I attack").await;
    let reply = api.chat(game_id, &owner, "Actually, I parley").await;
    assert_eq!(reply.body["status"], "waiting");
    assert_eq!(reply.body["submitted"], 1);

    let reply = api.chat(game_id, &guest, "I watch").await;
    assert_eq!(reply.body["status"], "resolved");

    let log = api
        .get(&format!("/api/games/{game_id}/messages"), &owner.token)
        .await;
    let users = user_messages(&log.body);
    assert_eq!(users.len(), 2);
    assert!(users.contains(&(owner.id, "Actually, I parley".to_string())));
    assert!(!users.iter().any(|(_, text)| text == "I attack"));
}

#[actix_web::test]
async fn test_withdraw_reopens_barrier() {
    let ai = ScriptedAi::new();
    let state = build_test_state(ai.clone()).await;
    let api = Api::new(create_test_app(state).await);
    let owner = api.register("owner").await;
    let guest = api.register("guest").await;
    let game_id = api.create_game(&owner, "Take It Back").await;
    api.join(game_id, &owner, &guest).await;

    api.chat(game_id, &owner, "I open the chest").await;
    let uri = format!("/api/games/{game_id}/turn");
    let reply = api.delete(&uri, &owner.token).await;
    assert_eq!(reply.body["withdrawn"], true);
    let reply = api.delete(&uri, &owner.token).await;
    assert_eq!(reply.body["withdrawn"], false);

    let reply = api.chat(game_id, &guest, "I keep watch").await;
    assert_eq!(reply.body["status"], "waiting");
    assert_eq!(reply.body["waiting_on"], json!([owner.username]));
    assert_eq!(ai.completions(), 0);
}

#[actix_web::test]
async fn test_independent_player_bypasses_barrier() {
    let ai = ScriptedAi::new();
    let state = build_test_state(ai.clone()).await;
    let api = Api::new(create_test_app(state).await);
    let owner = api.register("owner").await;
    let guest = api.register("guest").await;
    let third = api.register("third").await;
    let game_id = api.create_game(&owner, "Lone Ranger").await;
    api.join(game_id, &owner, &guest).await;
    api.join(game_id, &owner, &third).await;

    api.put(
        &format!("/api/games/{game_id}/sync"),
        &owner.token,
        json!({
            "groups": [],
            "assignments": [{ "user_id": third.id, "mode": "independent" }]
        }),
    )
    .await;

    let reply = api.chat(game_id, &third, "I wander off").await;
    assert_eq!(reply.body["status"], "resolved", "{}", reply.body);
    assert_eq!(reply.body["thread"], format!("solo:{}", third.id));

    // Main barrier only counts the two remaining players
    let reply = api.chat(game_id, &owner, "We wait").await;
    assert_eq!(reply.body["expected"], 2);
    let reply = api.chat(game_id, &guest, "We wait too").await;
    assert_eq!(reply.body["status"], "resolved");
    assert_eq!(reply.body["thread"], "main");
    assert_eq!(ai.completions(), 2);

    let solo = api
        .get(
            &format!("/api/games/{game_id}/messages?thread=solo:{}", third.id),
            &third.token,
        )
        .await;
    assert_eq!(solo.body.as_array().unwrap().len(), 2);
}

async fn four_player_split<S>(api: &Api<S>) -> (i64, [Player; 4])
where
    S: actix_web::dev::Service<
        actix_http::Request,
        Response = actix_web::dev::ServiceResponse<actix_web::body::BoxBody>,
        Error = actix_web::Error,
    >,
{
    let owner = api.register("owner").await;
    let a = api.register("north").await;
    let b = api.register("south").await;
    let c = api.register("southtoo").await;
    let game_id = api.create_game(&owner, "Forked Path").await;
    for p in [&a, &b, &c] {
        api.join(game_id, &owner, p).await;
    }
    let reply = api
        .put(
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
    assert_eq!(reply.status.as_u16(), 200, "{}", reply.body);
    (game_id, [owner, a, b, c])
}

#[actix_web::test]
async fn test_sync_groups_are_isolated() {
    let ai = ScriptedAi::new();
    let state = build_test_state(ai.clone()).await;
    let api = Api::new(create_test_app(state).await);
    let (game_id, [owner, a, b, c]) = four_player_split(&api).await;

    let reply = api.chat(game_id, &owner, "North: I climb").await;
    assert_eq!(reply.body["thread"], "group:north");
    assert_eq!(reply.body["expected"], 2);

    let reply = api.chat(game_id, &b, "South: I dig").await;
    assert_eq!(reply.body["thread"], "group:south");
    assert_eq!(reply.body["submitted"], 1);

    let reply = api.chat(game_id, &a, "North: I follow").await;
    assert_eq!(reply.body["status"], "resolved");
    assert_eq!(reply.body["thread"], "group:north");
    assert_eq!(ai.completions(), 1);

    // South is still waiting on its second member
    let status = api
        .get(&format!("/api/games/{game_id}/turn"), &c.token)
        .await;
    assert_eq!(status.body["thread"], "group:south");
    assert_eq!(status.body["submitted"], 1);
    assert_eq!(status.body["waiting_on"], json!([c.username]));

    let north = api
        .get(&format!("/api/games/{game_id}/messages?thread=group:north"), &b.token)
        .await;
    assert_eq!(north.body.as_array().unwrap().len(), 3);
    let south = api
        .get(&format!("/api/games/{game_id}/messages?thread=group:south"), &b.token)
        .await;
    assert!(south.body.as_array().unwrap().is_empty());
}

#[actix_web::test]
async fn test_sync_change_discards_staged_turns() {
    let ai = ScriptedAi::new();
    let state = build_test_state(ai.clone()).await;
    let api = Api::new(create_test_app(state).await);
    let (game_id, [owner, _a, b, _c]) = four_player_split(&api).await;

    api.chat(game_id, &b, "South: I dig").await;
    api.put(
        &format!("/api/games/{game_id}/sync"),
        &owner.token,
        json!({ "groups": ["north", "south"] }),
    )
    .await;

    let status = api
        .get(&format!("/api/games/{game_id}/turn"), &b.token)
        .await;
    assert_eq!(status.body["submitted"], 0);
    assert_eq!(status.body["has_submitted"], false);
}

#[actix_web::test]
async fn test_narrator_failure_restores_claimed_turns() {
    let ai = ScriptedAi::new();
    let state = build_test_state(ai.clone()).await;
    let api = Api::new(create_test_app(state.clone()).await);
    let owner = api.register("owner").await;
    let guest = api.register("guest").await;
    let game_id = api.create_game(&owner, "Try Again").await;
    api.join(game_id, &owner, &guest).await;

    api.chat(game_id, &owner, "I cast a spell").await;
    ai.fail_next();
    let reply = api.chat(game_id, &guest, "I duck").await;
    assert_problem(reply.status, &reply.headers, &reply.body, (502, "AI_UPSTREAM"));

    // Both staged actions are back
    let db = require_db(&state).unwrap();
    let staged = pending_actions::list_for_thread(db, game_id, "main")
        .await
        .unwrap();
    assert_eq!(staged.len(), 2);

    let log = api
        .get(&format!("/api/games/{game_id}/messages"), &owner.token)
        .await;
    assert!(log.body.as_array().unwrap().is_empty());

    // Any resubmission completes the set again
    let reply = api.chat(game_id, &owner, "I cast it again").await;
    assert_eq!(reply.body["status"], "resolved", "{}", reply.body);
    assert_eq!(ai.completions(), 2);

    let log = api
        .get(&format!("/api/games/{game_id}/messages"), &owner.token)
        .await;
    let users = user_messages(&log.body);
    assert!(users.contains(&(owner.id, "I cast it again".to_string())));
    assert!(users.contains(&(guest.id, "I duck".to_string())));
}

#[actix_web::test]
async fn test_stranger_cannot_chat() {
    let state = build_test_state(ScriptedAi::new()).await;
    let api = Api::new(create_test_app(state).await);
    let owner = api.register("owner").await;
    let stranger = api.register("stranger").await;
    let game_id = api.create_game(&owner, "Members Only").await;

    let reply = api.chat(game_id, &stranger, "Let me in").await;
    assert_problem(reply.status, &reply.headers, &reply.body, (403, "NOT_A_MEMBER"));
}

#[actix_web::test]
async fn test_last_missing_player_leaving_resolves_turn() {
    let ai = ScriptedAi::new();
    let state = build_test_state(ai.clone()).await;
    let api = Api::new(create_test_app(state).await);
    let owner = api.register("owner").await;
    let guest = api.register("guest").await;
    let third = api.register("third").await;
    let game_id = api.create_game(&owner, "Walkout").await;
    api.join(game_id, &owner, &guest).await;
    api.join(game_id, &owner, &third).await;

    api.chat(game_id, &owner, "I light the fuse").await;
    api.chat(game_id, &guest, "I cover my ears").await;
    assert_eq!(ai.completions(), 0);

    ai.reply("The wall bursts open.");
    let reply = api
        .post(&format!("/api/games/{game_id}/leave"), &third.token, json!({}))
        .await;
    assert_eq!(reply.status.as_u16(), 204);
    assert_eq!(ai.completions(), 1);

    let log = api
        .get(&format!("/api/games/{game_id}/messages?thread=main"), &owner.token)
        .await;
    let log = log.body.as_array().unwrap().clone();
    assert_eq!(log.len(), 3);
    assert_eq!(log[2]["content"], "The wall bursts open.");

    let status = api
        .get(&format!("/api/games/{game_id}/turn"), &owner.token)
        .await;
    assert_eq!(status.body["expected"], 2);
    assert_eq!(status.body["submitted"], 0);
}

#[actix_web::test]
async fn test_leave_with_open_barrier_keeps_waiting() {
    let ai = ScriptedAi::new();
    let state = build_test_state(ai.clone()).await;
    let api = Api::new(create_test_app(state).await);
    let owner = api.register("owner").await;
    let guest = api.register("guest").await;
    let third = api.register("third").await;
    let game_id = api.create_game(&owner, "Half Empty").await;
    api.join(game_id, &owner, &guest).await;
    api.join(game_id, &owner, &third).await;

    api.chat(game_id, &owner, "I wait by the door").await;
    api.chat(game_id, &third, "I was here").await;
    api.post(&format!("/api/games/{game_id}/leave"), &third.token, json!({}))
        .await;
    assert_eq!(ai.completions(), 0);

    let status = api
        .get(&format!("/api/games/{game_id}/turn"), &owner.token)
        .await;
    assert_eq!(status.body["submitted"], 1);
    assert_eq!(status.body["expected"], 2);
    assert_eq!(status.body["waiting_on"], json!([guest.username]));
}

#[actix_web::test]
async fn test_leave_resolves_staged_turn_of_lone_owner() {
    let ai = ScriptedAi::new();
    let state = build_test_state(ai.clone()).await;
    let api = Api::new(create_test_app(state).await);
    let owner = api.register("owner").await;
    let guest = api.register("guest").await;
    let game_id = api.create_game(&owner, "Alone Again").await;
    api.join(game_id, &owner, &guest).await;

    api.chat(game_id, &owner, "I ring the bell").await;
    api.post(&format!("/api/games/{game_id}/leave"), &guest.token, json!({}))
        .await;
    assert_eq!(ai.completions(), 1);

    let log = api
        .get(&format!("/api/games/{game_id}/messages"), &owner.token)
        .await;
    let users = user_messages(&log.body);
    assert_eq!(users, vec![(owner.id, "I ring the bell".to_string())]);
}
