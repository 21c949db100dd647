use serde_json::json;

use crate::common::assert_problem;
use crate::support::{build_test_state, create_test_app, Api, ScriptedAi};

#[actix_web::test]
async fn test_create_game_adds_owner_as_participant() {
    let state = build_test_state(ScriptedAi::new()).await;
    let api = Api::new(create_test_app(state).await);
    let owner = api.register("owner").await;

    let game_id = api.create_game(&owner, "The Sunken Bell").await;

    let detail = api.get(&format!("/api/games/{game_id}"), &owner.token).await;
    assert_eq!(detail.status.as_u16(), 200);
    assert_eq!(detail.body["title"], "The Sunken Bell");
    assert_eq!(detail.body["status"], "active");
    assert_eq!(detail.body["level"], 1);
    assert_eq!(detail.body["alignment"], "neutral");
    assert_eq!(detail.body["owner_id"], owner.id);
    let participants = detail.body["participants"].as_array().unwrap();
    assert_eq!(participants.len(), 1);
    assert_eq!(participants[0]["user_id"], owner.id);
    assert_eq!(participants[0]["sync_mode"], "main");
}

#[actix_web::test]
async fn test_create_game_requires_title() {
    let state = build_test_state(ScriptedAi::new()).await;
    let api = Api::new(create_test_app(state).await);
    let owner = api.register("owner").await;

    let reply = api
        .post("/api/games", &owner.token, json!({ "title": "  " }))
        .await;
    assert_problem(reply.status, &reply.headers, &reply.body, (422, "INVALID_GAME"));
}

#[actix_web::test]
async fn test_list_games_filters_by_membership_and_status() {
    let state = build_test_state(ScriptedAi::new()).await;
    let api = Api::new(create_test_app(state).await);
    let owner = api.register("owner").await;
    let stranger = api.register("stranger").await;

    let first = api.create_game(&owner, "First").await;
    let second = api.create_game(&owner, "Second").await;
    let archived = api
        .post(&format!("/api/games/{first}/archive"), &owner.token, json!({}))
        .await;
    assert_eq!(archived.status.as_u16(), 200);

    let all = api.get("/api/games", &owner.token).await;
    assert_eq!(all.body.as_array().unwrap().len(), 2);

    let active = api.get("/api/games?status=active", &owner.token).await;
    let active = active.body.as_array().unwrap();
    assert_eq!(active.len(), 1);
    assert_eq!(active[0]["id"], second);

    let archived = api.get("/api/games?status=archived", &owner.token).await;
    assert_eq!(archived.body.as_array().unwrap()[0]["id"], first);

    let none = api.get("/api/games", &stranger.token).await;
    assert!(none.body.as_array().unwrap().is_empty());
}

#[actix_web::test]
async fn test_non_member_cannot_read_game() {
    let state = build_test_state(ScriptedAi::new()).await;
    let api = Api::new(create_test_app(state).await);
    let owner = api.register("owner").await;
    let stranger = api.register("stranger").await;
    let game_id = api.create_game(&owner, "Closed Table").await;

    let reply = api.get(&format!("/api/games/{game_id}"), &stranger.token).await;
    assert_problem(reply.status, &reply.headers, &reply.body, (403, "NOT_A_MEMBER"));

    let reply = api
        .get(&format!("/api/games/{game_id}/messages"), &stranger.token)
        .await;
    assert_problem(reply.status, &reply.headers, &reply.body, (403, "NOT_A_MEMBER"));
}

#[actix_web::test]
async fn test_archive_is_owner_only_and_happens_once() {
    let state = build_test_state(ScriptedAi::new()).await;
    let api = Api::new(create_test_app(state).await);
    let owner = api.register("owner").await;
    let guest = api.register("guest").await;
    let game_id = api.create_game(&owner, "Once").await;
    api.join(game_id, &owner, &guest).await;

    let uri = format!("/api/games/{game_id}/archive");
    let reply = api.post(&uri, &guest.token, json!({})).await;
    assert_problem(reply.status, &reply.headers, &reply.body, (403, "NOT_GAME_OWNER"));

    let reply = api.post(&uri, &owner.token, json!({})).await;
    assert_eq!(reply.status.as_u16(), 200);
    assert_eq!(reply.body["status"], "archived");
    assert!(reply.body["archived_at"].is_string());

    let reply = api.post(&uri, &owner.token, json!({})).await;
    assert_problem(reply.status, &reply.headers, &reply.body, (409, "GAME_ARCHIVED"));

    // Archived games refuse new turns
    let reply = api.chat(game_id, &guest, "I knock").await;
    assert_problem(reply.status, &reply.headers, &reply.body, (409, "GAME_ARCHIVED"));
}

#[actix_web::test]
async fn test_delete_game_owner_only() {
    let state = build_test_state(ScriptedAi::new()).await;
    let api = Api::new(create_test_app(state).await);
    let owner = api.register("owner").await;
    let guest = api.register("guest").await;
    let game_id = api.create_game(&owner, "Doomed").await;
    api.join(game_id, &owner, &guest).await;

    let uri = format!("/api/games/{game_id}");
    let reply = api.delete(&uri, &guest.token).await;
    assert_problem(reply.status, &reply.headers, &reply.body, (403, "NOT_GAME_OWNER"));

    let reply = api.delete(&uri, &owner.token).await;
    assert_eq!(reply.status.as_u16(), 204);

    let reply = api.get(&uri, &owner.token).await;
    assert_problem(reply.status, &reply.headers, &reply.body, (404, "GAME_NOT_FOUND"));
}

#[actix_web::test]
async fn test_leave_game() {
    let state = build_test_state(ScriptedAi::new()).await;
    let api = Api::new(create_test_app(state).await);
    let owner = api.register("owner").await;
    let guest = api.register("guest").await;
    let game_id = api.create_game(&owner, "Revolving Door").await;
    api.join(game_id, &owner, &guest).await;

    let uri = format!("/api/games/{game_id}/leave");
    let reply = api.post(&uri, &owner.token, json!({})).await;
    assert_problem(reply.status, &reply.headers, &reply.body, (409, "OWNER_CANNOT_LEAVE"));

    let reply = api.post(&uri, &guest.token, json!({})).await;
    assert_eq!(reply.status.as_u16(), 204);

    let detail = api.get(&format!("/api/games/{game_id}"), &owner.token).await;
    assert_eq!(detail.body["participants"].as_array().unwrap().len(), 1);

    let reply = api.get(&format!("/api/games/{game_id}"), &guest.token).await;
    assert_problem(reply.status, &reply.headers, &reply.body, (403, "NOT_A_MEMBER"));
}

#[actix_web::test]
async fn test_set_sync_configuration() {
    let state = build_test_state(ScriptedAi::new()).await;
    let api = Api::new(create_test_app(state).await);
    let owner = api.register("owner").await;
    let guest = api.register("guest").await;
    let game_id = api.create_game(&owner, "Split Party").await;
    api.join(game_id, &owner, &guest).await;

    let uri = format!("/api/games/{game_id}/sync");
    let body = json!({
        "groups": ["scouts"],
        "assignments": [
            { "user_id": guest.id, "mode": "group", "group": "scouts" },
            { "user_id": owner.id, "mode": "independent" }
        ]
    });

    let reply = api.put(&uri, &guest.token, body.clone()).await;
    assert_problem(reply.status, &reply.headers, &reply.body, (403, "NOT_GAME_OWNER"));

    let reply = api.put(&uri, &owner.token, body).await;
    assert_eq!(reply.status.as_u16(), 200, "{}", reply.body);
    assert_eq!(reply.body["sync_groups"], json!(["scouts"]));
    let participants = reply.body["participants"].as_array().unwrap();
    let guest_row = participants
        .iter()
        .find(|p| p["user_id"] == guest.id)
        .unwrap();
    assert_eq!(guest_row["sync_mode"], "group");
    assert_eq!(guest_row["sync_group"], "scouts");

    // Dropping the group sends its members back to main
    let reply = api
        .put(&uri, &owner.token, json!({ "groups": [] }))
        .await;
    let participants = reply.body["participants"].as_array().unwrap();
    let guest_row = participants
        .iter()
        .find(|p| p["user_id"] == guest.id)
        .unwrap();
    assert_eq!(guest_row["sync_mode"], "main");
    assert!(guest_row["sync_group"].is_null());
}

#[actix_web::test]
async fn test_set_sync_rejects_unknown_group_and_stranger() {
    let state = build_test_state(ScriptedAi::new()).await;
    let api = Api::new(create_test_app(state).await);
    let owner = api.register("owner").await;
    let stranger = api.register("stranger").await;
    let game_id = api.create_game(&owner, "Strict").await;

    let uri = format!("/api/games/{game_id}/sync");
    let reply = api
        .put(
            &uri,
            &owner.token,
            json!({
                "groups": ["a"],
                "assignments": [{ "user_id": owner.id, "mode": "group", "group": "b" }]
            }),
        )
        .await;
    assert_problem(reply.status, &reply.headers, &reply.body, (422, "INVALID_SYNC_CONFIG"));

    let reply = api
        .put(
            &uri,
            &owner.token,
            json!({
                "groups": [],
                "assignments": [{ "user_id": stranger.id, "mode": "independent" }]
            }),
        )
        .await;
    assert_problem(reply.status, &reply.headers, &reply.body, (422, "INVALID_SYNC_CONFIG"));
}
