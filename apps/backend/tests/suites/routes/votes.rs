use serde_json::json;

use crate::common::assert_problem;
use crate::support::{build_test_state, create_test_app, Api, ScriptedAi};

#[actix_web::test]
async fn test_unanimous_archive_vote() {
    let state = build_test_state(ScriptedAi::new()).await;
    let api = Api::new(create_test_app(state).await);
    let owner = api.register("owner").await;
    let guest = api.register("guest").await;
    let game_id = api.create_game(&owner, "Vote Them Out").await;
    api.join(game_id, &owner, &guest).await;

    let uri = format!("/api/games/{game_id}/votes");
    let reply = api
        .post(&uri, &owner.token, json!({ "topic": "archive", "choice": "yes" }))
        .await;
    assert_eq!(reply.status.as_u16(), 200, "{}", reply.body);
    assert_eq!(reply.body["archived"], false);
    assert_eq!(reply.body["voters"], 2);
    assert_eq!(reply.body["topics"]["archive"]["counts"]["yes"], 1);

    let reply = api
        .post(&uri, &guest.token, json!({ "topic": "Archive", "choice": "YES" }))
        .await;
    assert_eq!(reply.body["archived"], true);

    let detail = api.get(&format!("/api/games/{game_id}"), &owner.token).await;
    assert_eq!(detail.body["status"], "archived");

    let reply = api
        .post(&uri, &owner.token, json!({ "topic": "archive", "choice": "no" }))
        .await;
    assert_problem(reply.status, &reply.headers, &reply.body, (409, "GAME_ARCHIVED"));
}

#[actix_web::test]
async fn test_revote_replaces_ballot() {
    let state = build_test_state(ScriptedAi::new()).await;
    let api = Api::new(create_test_app(state).await);
    let owner = api.register("owner").await;
    let guest = api.register("guest").await;
    let game_id = api.create_game(&owner, "Fickle").await;
    api.join(game_id, &owner, &guest).await;

    let uri = format!("/api/games/{game_id}/votes");
    api.post(&uri, &owner.token, json!({ "topic": "route", "choice": "north" }))
        .await;
    api.post(&uri, &owner.token, json!({ "topic": "route", "choice": "south" }))
        .await;

    let reply = api.get(&uri, &guest.token).await;
    let counts = &reply.body["topics"]["route"]["counts"];
    assert_eq!(counts["south"], 1);
    assert!(counts.get("north").is_none());
    assert_eq!(reply.body["archived"], false);
}

#[actix_web::test]
async fn test_blank_vote_rejected() {
    let state = build_test_state(ScriptedAi::new()).await;
    let api = Api::new(create_test_app(state).await);
    let owner = api.register("owner").await;
    let game_id = api.create_game(&owner, "Silent").await;

    let reply = api
        .post(
            &format!("/api/games/{game_id}/votes"),
            &owner.token,
            json!({ "topic": " ", "choice": "yes" }),
        )
        .await;
    assert_problem(reply.status, &reply.headers, &reply.body, (422, "INVALID_VOTE"));
}
