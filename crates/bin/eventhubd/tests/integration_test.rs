//! End-to-end smoke tests for the full eventhubd stack.
//!
//! Each test spins up the complete application (in-memory `SQLite`, real
//! repositories, the in-process event cache, real services, real axum
//! router) and exercises the HTTP layer via `tower::ServiceExt::oneshot`.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

use eventhub_adapter_cache_memory::InMemoryEventCache;
use eventhub_adapter_http_axum::router;
use eventhub_adapter_http_axum::state::AppState;
use eventhub_adapter_storage_sqlite_sqlx::{
    Config, SqliteAttendanceLedger, SqliteEventRepository, SqliteRegistrationRepository,
};
use eventhub_app::config::ServiceConfig;
use eventhub_app::services::event_service::EventService;
use eventhub_app::services::registration_service::RegistrationService;
use eventhub_domain::id::UserId;

/// Build a fully-wired router backed by an in-memory `SQLite` database.
async fn app() -> axum::Router {
    let db = Config::new("sqlite::memory:")
        .build()
        .await
        .expect("in-memory database should initialise");

    let pool = db.pool().clone();
    let cache = Arc::new(InMemoryEventCache::default());
    let config = ServiceConfig::default();

    let state = AppState::new(
        EventService::new(
            SqliteEventRepository::new(pool.clone()),
            Arc::clone(&cache),
            config,
        ),
        RegistrationService::new(
            SqliteRegistrationRepository::new(pool.clone()),
            SqliteAttendanceLedger::new(pool),
            cache,
            config,
        ),
    );

    router::build(state)
}

async fn send(app: &axum::Router, request: Request<Body>) -> (StatusCode, Value) {
    let resp = app.clone().oneshot(request).await.unwrap();
    let status = resp.status();
    let bytes = resp.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

fn get_request(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn json_request(method: &str, uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn delete_request(uri: &str) -> Request<Body> {
    Request::builder()
        .method("DELETE")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

fn event_body(title: &str, creator: UserId, max_attendees: u32) -> Value {
    json!({
        "title": title,
        "description": "Talks and pizza",
        "starts_at": "2030-05-17T18:30:00Z",
        "location": "Main hall",
        "status": "published",
        "max_attendees": max_attendees,
        "creator": creator.to_string(),
    })
}

async fn create_event(app: &axum::Router, title: &str, max_attendees: u32) -> i64 {
    let (status, body) = send(
        app,
        json_request("POST", "/api/events", &event_body(title, UserId::new(), max_attendees)),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body["id"].as_i64().unwrap()
}

async fn register(app: &axum::Router, event_id: i64, user: UserId) -> StatusCode {
    let (status, _) = send(
        app,
        json_request(
            "POST",
            &format!("/api/events/{event_id}/registrations"),
            &json!({ "user_id": user.to_string() }),
        ),
    )
    .await;
    status
}

// ---------------------------------------------------------------------------
// Health check
// ---------------------------------------------------------------------------

#[tokio::test]
async fn should_return_ok_when_health_check_called() {
    let resp = app().await.oneshot(get_request("/health")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
}

// ---------------------------------------------------------------------------
// Events
// ---------------------------------------------------------------------------

#[tokio::test]
async fn should_create_event_and_read_it_back() {
    let app = app().await;
    let creator = UserId::new();

    let (status, created) = send(
        &app,
        json_request("POST", "/api/events", &event_body("Rust meetup", creator, 10)),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = created["id"].as_i64().unwrap();

    let (status, event) = send(&app, get_request(&format!("/api/events/{id}"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(event["id"], id);
    assert_eq!(event["title"], "Rust meetup");
    assert_eq!(event["status"], "published");
    assert_eq!(event["max_attendees"], 10);
    assert_eq!(event["current_attendance"], 0);
    assert_eq!(event["creator"], creator.to_string());
}

#[tokio::test]
async fn should_reject_invalid_event_with_bad_request() {
    let app = app().await;

    let (status, body) = send(
        &app,
        json_request("POST", "/api/events", &event_body("Rust", UserId::new(), 10)),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());

    let (status, _) = send(
        &app,
        json_request("POST", "/api/events", &event_body("Rust meetup", UserId::new(), 2)),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, events) = send(&app, get_request("/api/events")).await;
    assert_eq!(events, json!([]));
}

#[tokio::test]
async fn should_return_not_found_for_missing_event() {
    let (status, body) = send(&app().await, get_request("/api/events/4242")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Event 4242 not found");
}

#[tokio::test]
async fn should_list_events_by_title_and_apply_filters() {
    let app = app().await;
    let creator = UserId::new();
    send(
        &app,
        json_request("POST", "/api/events", &event_body("Zig workshop", creator, 10)),
    )
    .await;
    create_event(&app, "Async Rust", 10).await;
    let mut draft = event_body("Borrow checker clinic", UserId::new(), 10);
    draft["status"] = json!("draft");
    send(&app, json_request("POST", "/api/events", &draft)).await;

    let (status, all) = send(&app, get_request("/api/events")).await;
    assert_eq!(status, StatusCode::OK);
    let titles: Vec<&str> = all
        .as_array()
        .unwrap()
        .iter()
        .map(|event| event["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, ["Async Rust", "Borrow checker clinic", "Zig workshop"]);

    let (_, mine) = send(&app, get_request(&format!("/api/events?creator={creator}"))).await;
    assert_eq!(mine.as_array().unwrap().len(), 1);
    assert_eq!(mine[0]["title"], "Zig workshop");

    let (_, drafts) = send(&app, get_request("/api/events?status=draft")).await;
    assert_eq!(drafts.as_array().unwrap().len(), 1);
    assert_eq!(drafts[0]["title"], "Borrow checker clinic");

    let (status, _) = send(
        &app,
        get_request(&format!("/api/events?creator={creator}&status=draft")),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn should_show_update_on_next_read_after_cached_get() {
    let app = app().await;
    let id = create_event(&app, "Rust meetup", 10).await;
    let (_, before) = send(&app, get_request(&format!("/api/events/{id}"))).await;
    assert_eq!(before["location"], "Main hall");

    let update = json!({
        "title": "Rust meetup",
        "description": "Talks and pizza",
        "starts_at": "2030-05-17T18:30:00Z",
        "location": "Rooftop",
        "status": "ongoing",
        "max_attendees": 20,
    });
    let (status, _) = send(
        &app,
        json_request("PUT", &format!("/api/events/{id}"), &update),
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, after) = send(&app, get_request(&format!("/api/events/{id}"))).await;
    assert_eq!(after["location"], "Rooftop");
    assert_eq!(after["status"], "ongoing");
    assert_eq!(after["max_attendees"], 20);
}

#[tokio::test]
async fn should_refuse_shrinking_capacity_below_attendance() {
    let app = app().await;
    let id = create_event(&app, "Rust meetup", 10).await;
    for _ in 0..6 {
        assert_eq!(register(&app, id, UserId::new()).await, StatusCode::CREATED);
    }

    let update = json!({
        "title": "Rust meetup",
        "description": "Talks and pizza",
        "starts_at": "2030-05-17T18:30:00Z",
        "location": "Main hall",
        "status": "published",
        "max_attendees": 5,
    });
    let (status, _) = send(
        &app,
        json_request("PUT", &format!("/api/events/{id}"), &update),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, event) = send(&app, get_request(&format!("/api/events/{id}"))).await;
    assert_eq!(event["max_attendees"], 10);
    assert_eq!(event["current_attendance"], 6);
}

#[tokio::test]
async fn should_delete_event_and_its_registrations() {
    let app = app().await;
    let id = create_event(&app, "Rust meetup", 10).await;
    let user = UserId::new();
    assert_eq!(register(&app, id, user).await, StatusCode::CREATED);
    send(&app, get_request(&format!("/api/events/{id}"))).await;

    let (status, _) = send(&app, delete_request(&format!("/api/events/{id}"))).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(&app, get_request(&format!("/api/events/{id}"))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (_, events) = send(&app, get_request(&format!("/api/users/{user}/events"))).await;
    assert_eq!(events, json!([]));

    let (status, _) = send(&app, delete_request(&format!("/api/events/{id}"))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Registrations
// ---------------------------------------------------------------------------

#[tokio::test]
async fn should_register_once_and_reflect_attendance() {
    let app = app().await;
    let id = create_event(&app, "Rust meetup", 10).await;
    send(&app, get_request(&format!("/api/events/{id}"))).await;
    let user = UserId::new();

    assert_eq!(register(&app, id, user).await, StatusCode::CREATED);
    assert_eq!(register(&app, id, user).await, StatusCode::CONFLICT);

    let (_, event) = send(&app, get_request(&format!("/api/events/{id}"))).await;
    assert_eq!(event["current_attendance"], 1);

    let (_, users) = send(&app, get_request(&format!("/api/events/{id}/registrations"))).await;
    assert_eq!(users, json!([user.to_string()]));

    let (_, events) = send(&app, get_request(&format!("/api/users/{user}/events"))).await;
    assert_eq!(events.as_array().unwrap().len(), 1);
    assert_eq!(events[0]["id"], id);
}

#[tokio::test]
async fn should_refuse_registration_when_event_is_full() {
    let app = app().await;
    let id = create_event(&app, "Small room", 5).await;
    for _ in 0..5 {
        assert_eq!(register(&app, id, UserId::new()).await, StatusCode::CREATED);
    }

    assert_eq!(register(&app, id, UserId::new()).await, StatusCode::CONFLICT);

    let (_, event) = send(&app, get_request(&format!("/api/events/{id}"))).await;
    assert_eq!(event["current_attendance"], 5);
    let (_, users) = send(&app, get_request(&format!("/api/events/{id}/registrations"))).await;
    assert_eq!(users.as_array().unwrap().len(), 5);
}

#[tokio::test]
async fn should_return_not_found_when_registering_for_missing_event() {
    let status = register(&app().await, 4242, UserId::new()).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn should_cancel_registration_then_refuse_second_cancel() {
    let app = app().await;
    let id = create_event(&app, "Rust meetup", 10).await;
    let user = UserId::new();
    assert_eq!(register(&app, id, user).await, StatusCode::CREATED);

    let uri = format!("/api/events/{id}/registrations/{user}");
    let (status, _) = send(&app, delete_request(&uri)).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, event) = send(&app, get_request(&format!("/api/events/{id}"))).await;
    assert_eq!(event["current_attendance"], 0);

    let (status, _) = send(&app, delete_request(&uri)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn should_reject_malformed_user_id() {
    let app = app().await;
    let id = create_event(&app, "Rust meetup", 10).await;

    let (status, _) = send(
        &app,
        json_request(
            "POST",
            &format!("/api/events/{id}/registrations"),
            &json!({ "user_id": "not-a-uuid" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, get_request("/api/users/not-a-uuid/events")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
