use serde_json::json;
use taleforge::db::require_db;
use taleforge::repos::liveness;
use time::{Duration, OffsetDateTime};

use crate::support::{build_test_state, create_test_app, Api, ScriptedAi};

fn ids(body: &serde_json::Value) -> Vec<i64> {
    let mut ids: Vec<i64> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|u| u["user_id"].as_i64().unwrap())
        .collect();
    ids.sort_unstable();
    ids
}

#[actix_web::test]
async fn test_presence_window_prunes_stale_heartbeats() {
    let state = build_test_state(ScriptedAi::new()).await;
    let api = Api::new(create_test_app(state.clone()).await);
    let owner = api.register("owner").await;
    let guest = api.register("guest").await;
    let game_id = api.create_game(&owner, "Who Is Here").await;
    api.join(game_id, &owner, &guest).await;

    let uri = format!("/api/games/{game_id}/presence");
    let reply = api.post(&uri, &owner.token, json!({})).await;
    assert_eq!(reply.status.as_u16(), 204);

    // Guest was last seen a minute ago
    let db = require_db(&state).unwrap();
    let stale = OffsetDateTime::now_utc() - Duration::seconds(60);
    liveness::heartbeat(db, game_id, guest.id, stale).await.unwrap();

    let reply = api.get(&uri, &guest.token).await;
    assert_eq!(ids(&reply.body), vec![owner.id]);
    assert_eq!(reply.body[0]["username"], owner.username.as_str());

    api.post(&uri, &guest.token, json!({})).await;
    let reply = api.get(&uri, &owner.token).await;
    let mut expected = vec![owner.id, guest.id];
    expected.sort_unstable();
    assert_eq!(ids(&reply.body), expected);
}

#[actix_web::test]
async fn test_typing_excludes_caller_and_expires() {
    let state = build_test_state(ScriptedAi::new()).await;
    let api = Api::new(create_test_app(state.clone()).await);
    let owner = api.register("owner").await;
    let guest = api.register("guest").await;
    let game_id = api.create_game(&owner, "Ellipsis").await;
    api.join(game_id, &owner, &guest).await;

    let uri = format!("/api/games/{game_id}/typing");
    let reply = api.post(&uri, &owner.token, json!({ "is_typing": true })).await;
    assert_eq!(reply.status.as_u16(), 204);

    let seen_by_guest = api.get(&uri, &guest.token).await;
    assert_eq!(ids(&seen_by_guest.body), vec![owner.id]);
    let seen_by_owner = api.get(&uri, &owner.token).await;
    assert!(ids(&seen_by_owner.body).is_empty());

    api.post(&uri, &owner.token, json!({ "is_typing": false })).await;
    let seen_by_guest = api.get(&uri, &guest.token).await;
    assert!(ids(&seen_by_guest.body).is_empty());

    // A typing flag older than the window is dropped
    let db = require_db(&state).unwrap();
    let stale = OffsetDateTime::now_utc() - Duration::seconds(20);
    liveness::set_typing(db, game_id, owner.id, true, stale).await.unwrap();
    let seen_by_guest = api.get(&uri, &guest.token).await;
    assert!(ids(&seen_by_guest.body).is_empty());
}
