use serde_json::json;

use crate::common::assert_problem;
use crate::support::{build_test_state, create_test_app, Api, ScriptedAi};

#[actix_web::test]
async fn test_transfer_moves_exactly_one_item() {
    let ai = ScriptedAi::new();
    let state = build_test_state(ai.clone()).await;
    let api = Api::new(create_test_app(state).await);
    let owner = api.register("owner").await;
    let game_id = api.create_game(&owner, "Pack Mule").await;

    ai.reply("You find two torches. [ITEM_ADD: Torch] [ITEM_ADD: Torch]");
    let reply = api.chat(game_id, &owner, "I search the crate").await;
    assert_eq!(reply.body["status"], "resolved", "{}", reply.body);

    let uri = format!("/api/games/{game_id}/inventory/transfer");
    let reply = api
        .post(&uri, &owner.token, json!({ "item": "torch", "direction": "to_shared" }))
        .await;
    assert_eq!(reply.status.as_u16(), 200, "{}", reply.body);
    assert_eq!(reply.body["item"], "Torch");
    assert_eq!(reply.body["personal_inventory"], json!(["Torch"]));
    assert_eq!(reply.body["shared_inventory"], json!(["Torch"]));

    let reply = api
        .post(&uri, &owner.token, json!({ "item": "Torch", "direction": "to_personal" }))
        .await;
    assert_eq!(reply.body["personal_inventory"], json!(["Torch", "Torch"]));
    assert_eq!(reply.body["shared_inventory"], json!([]));
}

#[actix_web::test]
async fn test_transfer_missing_item() {
    let state = build_test_state(ScriptedAi::new()).await;
    let api = Api::new(create_test_app(state).await);
    let owner = api.register("owner").await;
    let game_id = api.create_game(&owner, "Empty Pockets").await;

    let reply = api
        .post(
            &format!("/api/games/{game_id}/inventory/transfer"),
            &owner.token,
            json!({ "item": "Lantern", "direction": "to_shared" }),
        )
        .await;
    assert_problem(reply.status, &reply.headers, &reply.body, (404, "ITEM_NOT_FOUND"));
}
