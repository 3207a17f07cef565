//! End-to-end tests for the REST API, driven through the router with
//! in-memory storage and a canned AI collaborator.

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use kidsbank_backend::io::gemini::{TextGenerator, SERVICE_ERROR_MESSAGE};
use kidsbank_backend::storage::MemoryStorage;
use kidsbank_backend::{build_app_state, create_router};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

struct StubGenerator(String);

#[async_trait]
impl TextGenerator for StubGenerator {
    async fn generate_text(&self, _prompt: &str) -> String {
        self.0.clone()
    }
}

fn create_test_app_with(reply: &str, strict: bool) -> (Router, Arc<MemoryStorage>) {
    let storage = Arc::new(MemoryStorage::new());
    let generator = Arc::new(StubGenerator(reply.to_string()));
    let state = build_app_state(Box::new(storage.clone()), generator, strict);
    let app = create_router(state, "http://localhost:8080").expect("Failed to build router");
    (app, storage)
}

fn create_test_app() -> (Router, Arc<MemoryStorage>) {
    create_test_app_with(SERVICE_ERROR_MESSAGE, false)
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).to_string()))
    };
    (status, value)
}

async fn create_child(app: &Router, name: &str) -> Value {
    let (status, child) = send(
        app,
        "POST",
        "/api/children",
        Some(json!({
            "name": name,
            "age": 10,
            "avatar": "👧",
            "card_background": "bg-gradient-to-br from-pink-400 to-red-500"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    child
}

#[tokio::test]
async fn test_initial_state_is_hydrated_and_empty() {
    let (app, _) = create_test_app();

    let (status, state) = send(&app, "GET", "/api/state", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(state["isLoading"], false);
    assert_eq!(state["currentUser"], Value::Null);
    assert_eq!(state["children"], json!([]));
    assert_eq!(state["tasks"], json!([]));
}

#[tokio::test]
async fn test_parent_login_and_logout() {
    let (app, _) = create_test_app();

    let (status, user) = send(
        &app,
        "POST",
        "/api/auth/parent",
        Some(json!({"name": "Sana", "email": "sana@example.com", "password": "secret"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(user["id"], "parent-1");
    assert_eq!(user["type"], "parent");

    let (status, _) = send(
        &app,
        "POST",
        "/api/auth/parent",
        Some(json!({"email": "", "password": "secret"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, "POST", "/api/auth/logout", None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, state) = send(&app, "GET", "/api/state", None).await;
    assert_eq!(state["currentUser"], Value::Null);
}

#[tokio::test]
async fn test_child_login_for_unknown_child_is_not_found() {
    let (app, _) = create_test_app();

    let (status, body) = send(&app, "POST", "/api/auth/child", Some(json!({"child_id": "child-1"}))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "not_found");
}

#[tokio::test]
async fn test_create_child_is_persisted() {
    let (app, storage) = create_test_app();

    let child = create_child(&app, "Ayesha").await;
    assert_eq!(child["balance"], 0);
    assert_eq!(child["internalWalletBalance"], 0);
    assert_eq!(child["cardDesign"]["emoji"], "👧");
    assert_eq!(child["savingsGoal"], Value::Null);

    let (_, children) = send(&app, "GET", "/api/children", None).await;
    assert_eq!(children, json!([child.clone()]));

    let raw = storage.raw().expect("state should be saved");
    let saved: Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(saved["children"][0]["id"], child["id"]);
    assert!(saved.get("isLoading").is_none());
}

#[tokio::test]
async fn test_savings_goal_progress() {
    let (app, _) = create_test_app();
    let mut child = create_child(&app, "Daniyal").await;
    let id = child["id"].as_str().unwrap().to_string();

    let (status, body) = send(&app, "GET", &format!("/api/children/{}/savings-goal", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, Value::Null);

    child["savingsGoal"] = json!({"title": "Bicycle", "target": 500, "current": 500});
    let (status, _) = send(
        &app,
        "POST",
        "/api/actions",
        Some(json!({"type": "UPDATE_CHILD", "payload": child})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = send(&app, "GET", &format!("/api/children/{}/savings-goal", id), None).await;
    assert_eq!(body["progress_percent"], 100);
    assert_eq!(body["remaining"], 0);
    assert_eq!(body["reached"], true);

    let (status, _) = send(&app, "GET", "/api/children/child-0/savings-goal", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_wallet_flow() {
    let (app, _) = create_test_app();
    let child = create_child(&app, "Bilal").await;
    let id = child["id"].as_str().unwrap();

    let (status, child) = send(
        &app,
        "POST",
        &format!("/api/children/{}/wallet/top-up", id),
        Some(json!({"amount": 60})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(child["internalWalletBalance"], 60);

    let (_, child) = send(
        &app,
        "POST",
        &format!("/api/children/{}/wallet/move-to-main", id),
        Some(json!({"amount": 25})),
    )
    .await;
    assert_eq!(child["balance"], 25);
    assert_eq!(child["internalWalletBalance"], 35);

    let (_, child) = send(
        &app,
        "POST",
        &format!("/api/children/{}/wallet/deposit", id),
        Some(json!({"amount": 100})),
    )
    .await;
    assert_eq!(child["balance"], 125);

    let (status, body) = send(
        &app,
        "POST",
        &format!("/api/children/{}/wallet/withdraw", id),
        Some(json!({"amount": 500})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "validation_error");

    let (status, child) = send(
        &app,
        "POST",
        &format!("/api/children/{}/wallet/withdraw", id),
        Some(json!({"amount": 25})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(child["balance"], 100);

    let (status, _) = send(
        &app,
        "POST",
        "/api/children/child-404/wallet/deposit",
        Some(json!({"amount": 10})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_task_lifecycle() {
    let (app, _) = create_test_app();
    let child = create_child(&app, "Hamza").await;
    let id = child["id"].as_str().unwrap();

    let (status, task) = send(
        &app,
        "POST",
        "/api/tasks",
        Some(json!({
            "title": "Water the plants",
            "description": "Front garden, every evening",
            "reward": 40,
            "child_id": id
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(task["completed"], false);
    assert_eq!(task["childId"], id);
    let task_id = task["id"].as_str().unwrap();

    let (_, tasks) = send(&app, "GET", &format!("/api/tasks?child_id={}", id), None).await;
    assert_eq!(tasks.as_array().unwrap().len(), 1);
    let (_, tasks) = send(&app, "GET", "/api/tasks?child_id=someone-else", None).await;
    assert_eq!(tasks, json!([]));

    let (status, done) = send(&app, "POST", &format!("/api/tasks/{}/complete", task_id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(done["task"]["completed"], true);
    assert_eq!(done["reward_credited"], 40);
    assert_eq!(done["child"]["balance"], 40);

    let (_, again) = send(&app, "POST", &format!("/api/tasks/{}/complete", task_id), None).await;
    assert_eq!(again["reward_credited"], 0);
    assert_eq!(again["child"]["balance"], 40);

    let (status, _) = send(&app, "POST", "/api/tasks/task-0/complete", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_rewards_store_and_game() {
    let (app, _) = create_test_app();
    let child = create_child(&app, "Zara").await;
    let id = child["id"].as_str().unwrap();

    let (_, rewards) = send(&app, "GET", "/api/rewards", None).await;
    assert_eq!(rewards.as_array().unwrap().len(), 5);

    let (status, _) = send(&app, "POST", &format!("/api/children/{}/rewards/story_book", id), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, result) = send(
        &app,
        "POST",
        &format!("/api/children/{}/games/budget-battle", id),
        Some(json!({"correct_answers": 4})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(result["money_earned"], 60);
    assert_eq!(result["xp_earned"], 85);

    let (status, purchase) = send(
        &app,
        "POST",
        &format!("/api/children/{}/rewards/donate_charity_small", id),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(purchase["child"]["balance"], 10);

    let (status, _) = send(&app, "POST", &format!("/api/children/{}/rewards/pony", id), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_raw_actions() {
    let (app, _) = create_test_app();
    let child = create_child(&app, "Omar").await;
    let id = child["id"].as_str().unwrap();

    let (status, _) = send(&app, "POST", "/api/actions", Some(json!({"type": "EXPLODE", "payload": 1}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Without strict validation the reducer clamps instead of refusing
    let (status, state) = send(
        &app,
        "POST",
        "/api/actions",
        Some(json!({"type": "WITHDRAW_FROM_CHILD_BALANCE", "payload": {"childId": id, "amount": 30}})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(state["children"][0]["balance"], 0);

    let (_, state) = send(
        &app,
        "POST",
        "/api/actions",
        Some(json!({"type": "TOPUP_INTERNAL_WALLET", "payload": {"childId": id, "amount": 15}})),
    )
    .await;
    assert_eq!(state["children"][0]["internalWalletBalance"], 15);
}

#[tokio::test]
async fn test_raw_actions_in_strict_mode() {
    let (app, _) = create_test_app_with(SERVICE_ERROR_MESSAGE, true);
    let child = create_child(&app, "Iman").await;
    let id = child["id"].as_str().unwrap();

    let (status, body) = send(
        &app,
        "POST",
        "/api/actions",
        Some(json!({"type": "WITHDRAW_FROM_CHILD_BALANCE", "payload": {"childId": id, "amount": 30}})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "validation_error");
}

#[tokio::test]
async fn test_ai_task_generation() {
    let reply = r#"Here you go!
```json
[{"title":"Play Savings Race","description":"Finish one race","reward":35},
 {"title":"Sort the recycling","description":"Help for a week","reward":999}]
```"#;
    let (app, _) = create_test_app_with(reply, false);
    let child = create_child(&app, "Ali").await;
    let id = child["id"].as_str().unwrap();

    let (status, body) = send(&app, "POST", &format!("/api/children/{}/ai-tasks", id), None).await;
    assert_eq!(status, StatusCode::OK);
    let tasks = body["tasks"].as_array().unwrap();
    assert_eq!(tasks.len(), 2);
    assert_eq!(tasks[1]["reward"], 150);
    assert!(tasks[0]["id"].as_str().unwrap().starts_with("task-ai-"));

    let (_, all) = send(&app, "GET", "/api/tasks", None).await;
    assert_eq!(all.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_ai_text_endpoints() {
    let (app, _) = create_test_app();
    let child = create_child(&app, "Fatima").await;
    let id = child["id"].as_str().unwrap();

    let (status, welcome) = send(&app, "GET", &format!("/api/children/{}/welcome", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(welcome["text"].as_str().unwrap().contains("Fatima"));

    let (status, chat) = send(
        &app,
        "POST",
        &format!("/api/children/{}/chat", id),
        Some(json!({"message": "How do I save?"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(chat["text"], SERVICE_ERROR_MESSAGE);

    let (status, _) = send(&app, "POST", "/api/ai/generate", Some(json!({"prompt": " "}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, "GET", "/api/children/child-0/welcome", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
