//! Webhook integration tests
//!
//! Exercise the full intake path: normalize, route, dispatch, record.

use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode, header},
};
use serde_json::json;
use tower::ServiceExt;

use frontdesk_gateway::{
    ChatModel, ConversationRouter, DbPool, EffectExecutor, InteractionRecorder, MessageSender,
    PersonaId, TaskTracker, api, db::InteractionRepo,
};

mod common;
use common::{MockSender, ScriptedModel, setup_test_db, wait_until};

struct TestGateway {
    state: Arc<api::ApiState>,
    sender: Arc<MockSender>,
    db: DbPool,
}

/// Build a gateway wired to mocks
fn build_gateway(decision: Option<&str>, tracker: Option<TaskTracker>) -> TestGateway {
    let db = setup_test_db();
    let sender = MockSender::new();

    let model: Option<Arc<dyn ChatModel>> = decision
        .map(|d| Arc::new(ScriptedModel(d.to_string())) as Arc<dyn ChatModel>);

    let recorder = InteractionRecorder::new(Some(InteractionRepo::new(db.clone())));
    let state = Arc::new(api::ApiState {
        router: ConversationRouter::new(model),
        executor: EffectExecutor::new(
            Some(sender.clone() as Arc<dyn MessageSender>),
            tracker,
            recorder,
        ),
        db: Some(db.clone()),
    });

    TestGateway { state, sender, db }
}

async fn post_webhook(state: Arc<api::ApiState>, payload: serde_json::Value) -> StatusCode {
    let app = api::build_router(state);
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/webhook/whatsapp")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(payload.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    response.status()
}

#[tokio::test]
async fn health_endpoint_is_up() {
    let gateway = build_gateway(None, None);
    let app = api::build_router(gateway.state);

    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["status"], "ok");
    assert!(json["version"].is_string());
}

#[tokio::test]
async fn ready_endpoint_reports_database() {
    let gateway = build_gateway(None, None);
    let app = api::build_router(gateway.state);

    let response = app
        .oneshot(Request::builder().uri("/ready").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["checks"]["database"]["status"], "ok");
}

#[tokio::test]
async fn sales_inquiry_flows_end_to_end() {
    let mut server = mockito::Server::new_async().await;
    let task_mock = server
        .mock("POST", "/list/lst-1/task")
        .match_body(mockito::Matcher::PartialJson(json!({
            "name": "Atendimento WhatsApp - 5511999999999",
            "tags": ["sales-lead"],
        })))
        .with_status(200)
        .create_async()
        .await;
    let tracker = TaskTracker::new("tok".into(), "lst-1".into()).with_base_url(server.url());

    let decision = r#"{"intent": "sales_interest", "reply": "Perfeito, vou te encaminhar ao comercial!"}"#;
    let gateway = build_gateway(Some(decision), Some(tracker));

    let status = post_webhook(
        gateway.state.clone(),
        json!({
            "phone": "5511999999999",
            "text": {"message": "Quero um orçamento"},
            "fromMe": false,
            "isGroup": false
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    // Processing is backgrounded; wait for the reply and the handoff
    let sender = gateway.sender.clone();
    assert!(
        wait_until(|| {
            let sender = sender.clone();
            async move { sender.sent_messages().await.len() >= 2 }
        })
        .await,
        "expected reply and handoff to be dispatched"
    );

    let sent = gateway.sender.sent_messages().await;
    assert_eq!(sent[0].0, "5511999999999");
    assert!(sent[0].1.contains("encaminhar"));
    assert!(sent[1].1.contains("Raquel"));

    // Persona for that sender is now sales, and stays there
    assert_eq!(
        gateway.state.router.persona_for("5511999999999").await,
        Some(PersonaId::Sales)
    );

    // One task was created, tagged as a sales lead
    let task_done = wait_until(|| {
        let mock = &task_mock;
        async move { mock.matched_async().await }
    })
    .await;
    assert!(task_done, "expected a sales-lead task");

    // Both transcript directions were logged
    let repo = InteractionRepo::new(gateway.db.clone());
    assert!(
        wait_until(|| {
            let repo = repo.clone();
            async move { repo.list_for_sender("5511999999999").unwrap().len() >= 2 }
        })
        .await,
        "expected both transcript directions in the log"
    );
    let logged = repo.list_for_sender("5511999999999").unwrap();
    assert_eq!(logged.len(), 2);
    assert_eq!(logged[0].role, "user");
    assert_eq!(logged[0].intent.as_deref(), Some("orcamento"));
}

#[tokio::test]
async fn self_sent_message_produces_zero_side_effects() {
    let decision = r#"{"intent": "sales_interest", "reply": "oi"}"#;
    let gateway = build_gateway(Some(decision), None);

    let status = post_webhook(
        gateway.state.clone(),
        json!({
            "phone": "5511999999999",
            "text": {"message": "Quero um orçamento"},
            "fromMe": true,
            "isGroup": false
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    // Give any (incorrect) background work a chance to surface
    tokio::time::sleep(std::time::Duration::from_millis(100)).await;

    assert!(gateway.sender.sent_messages().await.is_empty());
    let repo = InteractionRepo::new(gateway.db.clone());
    assert!(repo.list_for_sender("5511999999999").unwrap().is_empty());
}

#[tokio::test]
async fn group_message_produces_zero_side_effects() {
    let gateway = build_gateway(None, None);

    post_webhook(
        gateway.state.clone(),
        json!({
            "phone": "5511999999999",
            "text": {"message": "bom dia grupo"},
            "isGroup": true
        }),
    )
    .await;

    tokio::time::sleep(std::time::Duration::from_millis(100)).await;
    assert!(gateway.sender.sent_messages().await.is_empty());
}

#[tokio::test]
async fn message_without_sender_produces_zero_side_effects() {
    let gateway = build_gateway(None, None);

    let status = post_webhook(gateway.state.clone(), json!({"text": {"message": "oi"}})).await;
    assert_eq!(status, StatusCode::OK);

    tokio::time::sleep(std::time::Duration::from_millis(100)).await;
    assert!(gateway.sender.sent_messages().await.is_empty());
}

#[tokio::test]
async fn unrecognized_payload_still_acknowledged() {
    let gateway = build_gateway(None, None);

    let status = post_webhook(gateway.state.clone(), json!({"something": 42})).await;
    assert_eq!(status, StatusCode::OK);

    let status = post_webhook(gateway.state.clone(), json!({})).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn status_callback_is_ignored() {
    let gateway = build_gateway(None, None);

    let status = post_webhook(
        gateway.state.clone(),
        json!({"phone": "5511999999999", "status": "READ"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    tokio::time::sleep(std::time::Duration::from_millis(100)).await;
    assert!(gateway.sender.sent_messages().await.is_empty());
}

#[tokio::test]
async fn general_inquiry_without_model_uses_canned_greeting() {
    let gateway = build_gateway(None, None);

    post_webhook(
        gateway.state.clone(),
        json!({"phone": "5522888888888", "body": "Minha conta não chegou"}),
    )
    .await;

    let sender = gateway.sender.clone();
    assert!(
        wait_until(|| {
            let sender = sender.clone();
            async move { !sender.sent_messages().await.is_empty() }
        })
        .await
    );

    let sent = gateway.sender.sent_messages().await;
    assert_eq!(sent.len(), 1);
    assert!(sent[0].1.contains("Ângela"));
    assert_eq!(
        gateway.state.router.persona_for("5522888888888").await,
        Some(PersonaId::FrontDesk)
    );
}
