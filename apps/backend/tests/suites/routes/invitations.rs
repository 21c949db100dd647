use serde_json::json;

use crate::common::assert_problem;
use crate::support::{build_test_state, create_test_app, Api, ScriptedAi};

#[actix_web::test]
async fn test_invite_list_and_accept() {
    let state = build_test_state(ScriptedAi::new()).await;
    let api = Api::new(create_test_app(state).await);
    let owner = api.register("owner").await;
    let guest = api.register("guest").await;
    let game_id = api.create_game(&owner, "The Long Road").await;

    let invite = api
        .post(
            &format!("/api/games/{game_id}/invitations"),
            &owner.token,
            json!({ "username": guest.username }),
        )
        .await;
    assert_eq!(invite.status.as_u16(), 201);
    assert_eq!(invite.body["status"], "pending");
    let invitation_id = invite.body["id"].as_i64().unwrap();

    let pending = api.get("/api/invitations", &guest.token).await;
    let pending = pending.body.as_array().unwrap().clone();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0]["game_title"], "The Long Road");
    assert_eq!(pending[0]["inviter_username"], owner.username.as_str());

    let accepted = api
        .post(
            &format!("/api/invitations/{invitation_id}/accept"),
            &guest.token,
            json!({}),
        )
        .await;
    assert_eq!(accepted.status.as_u16(), 200);
    assert_eq!(accepted.body["status"], "accepted");
    assert!(accepted.body["responded_at"].is_string());

    let detail = api.get(&format!("/api/games/{game_id}"), &guest.token).await;
    assert_eq!(detail.status.as_u16(), 200);
    assert_eq!(detail.body["participants"].as_array().unwrap().len(), 2);

    let again = api
        .post(
            &format!("/api/invitations/{invitation_id}/decline"),
            &guest.token,
            json!({}),
        )
        .await;
    assert_problem(
        again.status,
        &again.headers,
        &again.body,
        (409, "INVITATION_ALREADY_RESOLVED"),
    );

    let pending = api.get("/api/invitations", &guest.token).await;
    assert!(pending.body.as_array().unwrap().is_empty());
}

#[actix_web::test]
async fn test_decline_keeps_user_out() {
    let state = build_test_state(ScriptedAi::new()).await;
    let api = Api::new(create_test_app(state).await);
    let owner = api.register("owner").await;
    let guest = api.register("guest").await;
    let game_id = api.create_game(&owner, "No Thanks").await;

    let invite = api
        .post(
            &format!("/api/games/{game_id}/invitations"),
            &owner.token,
            json!({ "username": guest.username }),
        )
        .await;
    let invitation_id = invite.body["id"].as_i64().unwrap();

    let declined = api
        .post(
            &format!("/api/invitations/{invitation_id}/decline"),
            &guest.token,
            json!({}),
        )
        .await;
    assert_eq!(declined.body["status"], "declined");

    let reply = api.get(&format!("/api/games/{game_id}"), &guest.token).await;
    assert_problem(reply.status, &reply.headers, &reply.body, (403, "NOT_A_MEMBER"));
}

#[actix_web::test]
async fn test_invitation_rules() {
    let state = build_test_state(ScriptedAi::new()).await;
    let api = Api::new(create_test_app(state).await);
    let owner = api.register("owner").await;
    let guest = api.register("guest").await;
    let other = api.register("other").await;
    let game_id = api.create_game(&owner, "Rules").await;
    let uri = format!("/api/games/{game_id}/invitations");

    let reply = api
        .post(&uri, &owner.token, json!({ "username": "does_not_exist" }))
        .await;
    assert_problem(reply.status, &reply.headers, &reply.body, (404, "USER_NOT_FOUND"));

    let reply = api
        .post(&uri, &owner.token, json!({ "username": owner.username }))
        .await;
    assert_problem(reply.status, &reply.headers, &reply.body, (409, "ALREADY_PARTICIPANT"));

    let first = api
        .post(&uri, &owner.token, json!({ "username": guest.username }))
        .await;
    assert_eq!(first.status.as_u16(), 201);
    let reply = api
        .post(&uri, &owner.token, json!({ "username": guest.username }))
        .await;
    assert_problem(reply.status, &reply.headers, &reply.body, (409, "CONFLICT"));

    // Someone else's invitation looks missing
    let invitation_id = first.body["id"].as_i64().unwrap();
    let reply = api
        .post(
            &format!("/api/invitations/{invitation_id}/accept"),
            &other.token,
            json!({}),
        )
        .await;
    assert_problem(reply.status, &reply.headers, &reply.body, (404, "INVITATION_NOT_FOUND"));
}

#[actix_web::test]
async fn test_participant_cap() {
    let state = build_test_state(ScriptedAi::new()).await;
    let api = Api::new(create_test_app(state).await);
    let owner = api.register("owner").await;
    let game_id = api.create_game(&owner, "Full House").await;

    for i in 0..5 {
        let guest = api.register(&format!("guest{i}")).await;
        api.join(game_id, &owner, &guest).await;
    }

    let late = api.register("late").await;
    let reply = api
        .post(
            &format!("/api/games/{game_id}/invitations"),
            &owner.token,
            json!({ "username": late.username }),
        )
        .await;
    assert_problem(reply.status, &reply.headers, &reply.body, (409, "GAME_FULL"));
}

#[actix_web::test]
async fn test_accept_refused_once_game_fills() {
    let state = build_test_state(ScriptedAi::new()).await;
    let api = Api::new(create_test_app(state).await);
    let owner = api.register("owner").await;
    let game_id = api.create_game(&owner, "Race").await;

    // Invite early, accept after the table fills up
    let slow = api.register("slow").await;
    let invite = api
        .post(
            &format!("/api/games/{game_id}/invitations"),
            &owner.token,
            json!({ "username": slow.username }),
        )
        .await;
    let invitation_id = invite.body["id"].as_i64().unwrap();

    for i in 0..5 {
        let guest = api.register(&format!("fast{i}")).await;
        api.join(game_id, &owner, &guest).await;
    }

    let reply = api
        .post(
            &format!("/api/invitations/{invitation_id}/accept"),
            &slow.token,
            json!({}),
        )
        .await;
    assert_problem(reply.status, &reply.headers, &reply.body, (409, "GAME_FULL"));
}
