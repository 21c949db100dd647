use std::sync::Arc;

use actix_web::test;
use serde_json::json;
use taleforge::ai::DisabledAi;

use crate::common::assert_problem;
use crate::support::{build_test_state, create_test_app, Api, ScriptedAi};

#[actix_web::test]
async fn test_image_and_speech_pass_through() {
    let state = build_test_state(ScriptedAi::new()).await;
    let api = Api::new(create_test_app(state).await);
    let player = api.register("bard").await;

    let reply = api
        .post("/api/ai/image", &player.token, json!({ "prompt": "A lantern-lit harbor" }))
        .await;
    assert_eq!(reply.status.as_u16(), 200);
    assert_eq!(reply.body["url"], "https://images.test/scene.png");

    let reply = api
        .post("/api/ai/image", &player.token, json!({ "prompt": "x", "size": "3x3" }))
        .await;
    assert_problem(reply.status, &reply.headers, &reply.body, (400, "VALIDATION_ERROR"));

    let req = test::TestRequest::post()
        .uri("/api/ai/speech")
        .insert_header(("Authorization", format!("Bearer {}", player.token)))
        .set_json(json!({ "text": "Welcome, traveller." }))
        .to_request();
    let reply = api.send(req).await;
    assert_eq!(reply.status.as_u16(), 200);
    assert_eq!(reply.headers.get("content-type").unwrap(), "audio/mpeg");
}

#[actix_web::test]
async fn test_transcribe_raw_audio() {
    let state = build_test_state(ScriptedAi::new()).await;
    let api = Api::new(create_test_app(state).await);
    let player = api.register("bard").await;

    let req = test::TestRequest::post()
        .uri("/api/ai/transcribe")
        .insert_header(("Authorization", format!("Bearer {}", player.token)))
        .insert_header(("Content-Type", "audio/wav"))
        .set_payload(&b"RIFF....WAVEfmt "[..])
        .to_request();
    let reply = api.send(req).await;
    assert_eq!(reply.status.as_u16(), 200);
    assert_eq!(reply.body["text"], "I open the door");

    let req = test::TestRequest::post()
        .uri("/api/ai/transcribe")
        .insert_header(("Authorization", format!("Bearer {}", player.token)))
        .insert_header(("Content-Type", "audio/wav"))
        .to_request();
    let reply = api.send(req).await;
    assert_problem(reply.status, &reply.headers, &reply.body, (400, "VALIDATION_ERROR"));
}

#[actix_web::test]
async fn test_unconfigured_provider_is_503() {
    let state = build_test_state(Arc::new(DisabledAi)).await;
    let api = Api::new(create_test_app(state).await);
    let player = api.register("bard").await;

    let reply = api
        .post("/api/ai/image", &player.token, json!({ "prompt": "A harbor" }))
        .await;
    assert_problem(reply.status, &reply.headers, &reply.body, (503, "AI_NOT_CONFIGURED"));

    let game_id = api.create_game(&player, "Mute Narrator").await;
    let reply = api.chat(game_id, &player, "Hello?").await;
    assert_problem(reply.status, &reply.headers, &reply.body, (503, "AI_NOT_CONFIGURED"));
}

#[actix_web::test]
async fn test_ai_routes_require_auth() {
    let state = build_test_state(ScriptedAi::new()).await;
    let api = Api::new(create_test_app(state).await);

    let req = test::TestRequest::post()
        .uri("/api/ai/image")
        .set_json(json!({ "prompt": "A harbor" }))
        .to_request();
    let reply = api.send(req).await;
    assert_problem(
        reply.status,
        &reply.headers,
        &reply.body,
        (401, "UNAUTHORIZED_MISSING_BEARER"),
    );
}
