//! End-to-end tests of the HTTP surface against in-memory storage.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;

use herald_notification::config::AppConfig;
use herald_notification::repository::{InMemoryNotificationRepository, InMemoryPreferenceRepository};
use herald_notification::services::NotificationService;
use herald_notification::{routes, AppState};
use herald_shared::clients::email::{EmailError, MailTransport};

/// Accepts or rejects every message depending on `fail`, and remembers recipients.
#[derive(Default)]
struct FakeTransport {
    fail: bool,
    recipients: Mutex<Vec<String>>,
}

#[async_trait]
impl MailTransport for FakeTransport {
    async fn send(&self, to: &str, _subject: &str, _body: &str) -> Result<(), EmailError> {
        self.recipients.lock().unwrap().push(to.to_string());
        if self.fail {
            return Err(EmailError::Build("smtp relay unreachable".into()));
        }
        Ok(())
    }
}

fn test_config() -> AppConfig {
    let config = config::Config::builder()
        .set_override("storage", "memory")
        .unwrap()
        .set_override("mail_transport", "log")
        .unwrap()
        .build()
        .unwrap();
    AppConfig::from_config(config).unwrap()
}

fn app_with(transport: Arc<FakeTransport>) -> Router {
    let service = NotificationService::new(
        Arc::new(InMemoryPreferenceRepository::new()),
        Arc::new(InMemoryNotificationRepository::new()),
        transport,
    );
    routes::router(Arc::new(AppState {
        config: test_config(),
        service,
        metrics_handle: None,
    }))
}

fn app() -> Router {
    app_with(Arc::new(FakeTransport::default()))
}

async fn call(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

fn post(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn preference_body(user_id: Uuid, contact: &str, enabled: bool) -> Value {
    json!({
        "userId": user_id,
        "type": "EMAIL",
        "contactInfo": contact,
        "notificationEnabled": enabled,
    })
}

#[tokio::test]
async fn upsert_then_send_then_history() {
    let transport = Arc::new(FakeTransport::default());
    let app = app_with(transport.clone());
    let user_id = Uuid::new_v4();

    let (status, pref) = call(
        &app,
        post("/api/v1/notifications/preferences", preference_body(user_id, "a@x.com", true)),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(pref["userId"], user_id.to_string());
    assert_eq!(pref["type"], "EMAIL");
    assert_eq!(pref["contactInfo"], "a@x.com");
    assert_eq!(pref["enabled"], true);

    let (status, sent) = call(
        &app,
        post("/api/v1/notifications", json!({ "userId": user_id, "subject": "Hi", "body": "Body" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(sent["subject"], "Hi");
    assert_eq!(sent["status"], "SUCCEEDED");
    assert_eq!(sent["type"], "EMAIL");
    assert!(sent["createdOn"].is_string());
    assert_eq!(*transport.recipients.lock().unwrap(), vec!["a@x.com".to_string()]);

    let (status, history) = call(&app, get(&format!("/api/v1/notifications?userId={user_id}"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(history, json!([sent]));
}

#[tokio::test]
async fn upsert_twice_keeps_preference_identity() {
    let app = app();
    let user_id = Uuid::new_v4();

    let (_, first) = call(
        &app,
        post("/api/v1/notifications/preferences", preference_body(user_id, "old@x.com", true)),
    )
    .await;
    let (status, second) = call(
        &app,
        post("/api/v1/notifications/preferences", preference_body(user_id, "new@x.com", false)),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(second["id"], first["id"]);
    assert_eq!(second["contactInfo"], "new@x.com");
    assert_eq!(second["enabled"], false);

    let (status, fetched) = call(
        &app,
        get(&format!("/api/v1/notifications/preferences?userId={user_id}")),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, second);
}

#[tokio::test]
async fn missing_preference_returns_404() {
    let app = app();
    let user_id = Uuid::new_v4();

    let (status, body) = call(
        &app,
        get(&format!("/api/v1/notifications/preferences?userId={user_id}")),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"]["code"], "E5001");
}

#[tokio::test]
async fn send_without_preference_returns_404() {
    let app = app();

    let (status, body) = call(
        &app,
        post("/api/v1/notifications", json!({ "userId": Uuid::new_v4(), "subject": "Hi", "body": "Body" })),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "E5001");
}

#[tokio::test]
async fn send_to_opted_out_user_returns_400_and_records_nothing() {
    let transport = Arc::new(FakeTransport::default());
    let app = app_with(transport.clone());
    let user_id = Uuid::new_v4();
    call(
        &app,
        post("/api/v1/notifications/preferences", preference_body(user_id, "a@x.com", false)),
    )
    .await;

    let (status, body) = call(
        &app,
        post("/api/v1/notifications", json!({ "userId": user_id, "subject": "Hi", "body": "Body" })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "E5002");
    assert!(transport.recipients.lock().unwrap().is_empty());

    let (_, history) = call(&app, get(&format!("/api/v1/notifications?userId={user_id}"))).await;
    assert_eq!(history, json!([]));
}

#[tokio::test]
async fn transport_failure_still_answers_201_with_failed_status() {
    let transport = Arc::new(FakeTransport {
        fail: true,
        ..Default::default()
    });
    let app = app_with(transport);
    let user_id = Uuid::new_v4();
    call(
        &app,
        post("/api/v1/notifications/preferences", preference_body(user_id, "a@x.com", true)),
    )
    .await;

    let (status, sent) = call(
        &app,
        post("/api/v1/notifications", json!({ "userId": user_id, "subject": "Hi", "body": "Body" })),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(sent["status"], "FAILED");

    let (_, history) = call(&app, get(&format!("/api/v1/notifications?userId={user_id}"))).await;
    assert_eq!(history.as_array().unwrap().len(), 1);
    assert_eq!(history[0]["status"], "FAILED");
}

#[tokio::test]
async fn history_for_unknown_user_is_empty() {
    let app = app();

    let (status, history) = call(
        &app,
        get(&format!("/api/v1/notifications?userId={}", Uuid::new_v4())),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(history, json!([]));
}

#[tokio::test]
async fn unknown_channel_type_is_rejected() {
    let app = app();
    let body = json!({
        "userId": Uuid::new_v4(),
        "type": "SMS",
        "contactInfo": "+100000000",
        "notificationEnabled": true,
    });

    let response = app
        .clone()
        .oneshot(post("/api/v1/notifications/preferences", body))
        .await
        .unwrap();

    assert!(response.status().is_client_error());
}

#[tokio::test]
async fn missing_user_id_query_is_rejected() {
    let app = app();

    let response = app.clone().oneshot(get("/api/v1/notifications")).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn health_reports_storage() {
    let app = app();

    let (status, body) = call(&app, get("/health")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["service"], "herald-notification");
    assert_eq!(body["checks"][0]["name"], "storage");
}

#[tokio::test]
async fn metrics_without_recorder_is_404() {
    let app = app();

    let response = app.clone().oneshot(get("/metrics")).await.unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
