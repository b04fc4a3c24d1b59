use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use chrono::Utc;
use pr_reviewer::connector::api::{Container, ContainerConfig};
use pr_reviewer::connector::http::router;
use pr_reviewer::{FixedClock, InMemoryStore};
use serde_json::{json, Value};
use tower::ServiceExt;

fn app() -> axum::Router {
    let container = Container::with_parts(
        Arc::new(InMemoryStore::new()),
        Arc::new(FixedClock::new(Utc::now())),
        ContainerConfig {
            data_dir: String::new(),
            memory_storage: true,
        },
    );
    router(Arc::new(container), Duration::from_secs(5))
}

async fn send(app: &axum::Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.expect("response");
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

async fn post(app: &axum::Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .expect("request");
    send(app, request).await
}

async fn get(app: &axum::Router, uri: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .uri(uri)
        .body(Body::empty())
        .expect("request");
    send(app, request).await
}

async fn seed_backend(app: &axum::Router) {
    let (status, _) = post(
        app,
        "/team/add",
        json!({
            "team_name": "backend",
            "members": [
                {"user_id": "author", "username": "author", "is_active": true},
                {"user_id": "r1", "username": "alice", "is_active": true},
                {"user_id": "r2", "username": "bob", "is_active": true},
                {"user_id": "r3", "username": "carol", "is_active": true}
            ]
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
}

#[tokio::test]
async fn health_reports_ok() {
    let app = app();

    let (status, body) = get(&app, "/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "ok"}));
}

#[tokio::test]
async fn request_id_is_generated_or_echoed() {
    let app = app();

    let response = app
        .clone()
        .oneshot(Request::builder().uri("/health").body(Body::empty()).expect("request"))
        .await
        .expect("response");
    let generated = response
        .headers()
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .expect("generated id");
    assert!(!generated.is_empty());

    let request = Request::builder()
        .uri("/health")
        .header("x-request-id", "req-42")
        .body(Body::empty())
        .expect("request");
    let response = app.oneshot(request).await.expect("response");
    assert_eq!(response.headers()["x-request-id"], "req-42");
}

#[tokio::test]
async fn cross_origin_requests_are_allowed() {
    let app = app();
    let request = Request::builder()
        .uri("/health")
        .header("origin", "http://localhost:3000")
        .body(Body::empty())
        .expect("request");

    let response = app.oneshot(request).await.expect("response");

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key("access-control-allow-origin"));
}

#[tokio::test]
async fn team_add_and_get() {
    let app = app();
    seed_backend(&app).await;

    let (status, body) = get(&app, "/team/get?team_name=backend").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["team_name"], "backend");
    let names: Vec<&str> = body["members"]
        .as_array()
        .expect("members")
        .iter()
        .map(|m| m["username"].as_str().expect("username"))
        .collect();
    assert_eq!(names, vec!["alice", "author", "bob", "carol"]);
}

#[tokio::test]
async fn duplicate_team_is_bad_request() {
    let app = app();
    seed_backend(&app).await;

    let (status, body) = post(&app, "/team/add", json!({"team_name": "backend"})).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "TEAM_EXISTS");
}

#[tokio::test]
async fn member_of_other_team_is_rejected() {
    let app = app();
    seed_backend(&app).await;

    let (status, body) = post(
        &app,
        "/team/add",
        json!({
            "team_name": "frontend",
            "members": [{"user_id": "r1", "username": "alice", "is_active": true}]
        }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "USER_IN_ANOTHER_TEAM");
    let (status, _) = get(&app, "/team/get?team_name=frontend").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn repeated_member_id_is_bad_request() {
    let app = app();

    let (status, body) = post(
        &app,
        "/team/add",
        json!({
            "team_name": "backend",
            "members": [
                {"user_id": "u1", "username": "alice", "is_active": true},
                {"user_id": "u1", "username": "alicia", "is_active": true}
            ]
        }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "BAD_REQUEST");
    let (status, _) = get(&app, "/team/get?team_name=backend").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn malformed_body_is_bad_request() {
    let app = app();

    let (status, body) = post(&app, "/team/add", json!({"members": []})).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn missing_query_parameter_is_bad_request() {
    let app = app();

    let (status, body) = get(&app, "/users/getReview").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn set_is_active_returns_user() {
    let app = app();
    seed_backend(&app).await;

    let (status, body) = post(
        &app,
        "/users/setIsActive",
        json!({"user_id": "r2", "is_active": false}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({"user": {"user_id": "r2", "username": "bob", "team_name": "backend", "is_active": false}})
    );

    let (status, body) = post(
        &app,
        "/users/setIsActive",
        json!({"user_id": "ghost", "is_active": false}),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "NOT_FOUND");
}

#[tokio::test]
async fn pull_request_flow() {
    let app = app();
    seed_backend(&app).await;

    let (status, body) = post(
        &app,
        "/pullRequest/create",
        json!({"pull_request_id": "pr-1", "pull_request_name": "Add search", "author_id": "author"}),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["pr"]["status"], "OPEN");
    assert_eq!(body["pr"]["assigned_reviewers"], json!(["r1", "r2"]));
    assert_eq!(body["pr"]["merged_at"], Value::Null);

    let (status, body) = post(
        &app,
        "/pullRequest/create",
        json!({"pull_request_id": "pr-1", "pull_request_name": "Again", "author_id": "author"}),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"]["code"], "PR_EXISTS");

    let (status, body) = post(
        &app,
        "/pullRequest/reassign",
        json!({"pull_request_id": "pr-1", "old_user_id": "r1"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["replaced_by"], "r3");
    assert_eq!(body["pr"]["assigned_reviewers"], json!(["r3", "r2"]));

    let (status, body) = post(
        &app,
        "/pullRequest/reassign",
        json!({"pull_request_id": "pr-1", "old_user_id": "r1"}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "NOT_ASSIGNED");

    let (status, merged) = post(&app, "/pullRequest/merge", json!({"pull_request_id": "pr-1"})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(merged["pr"]["status"], "MERGED");
    assert!(merged["pr"]["merged_at"].is_string());

    let (status, again) = post(&app, "/pullRequest/merge", json!({"pull_request_id": "pr-1"})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(again, merged);

    let (status, body) = post(
        &app,
        "/pullRequest/reassign",
        json!({"pull_request_id": "pr-1", "old_user_id": "r2"}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "PR_MERGED");

    let (status, body) = get(&app, "/users/getReview?user_id=r2").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "user_id": "r2",
            "pull_requests": [{
                "pull_request_id": "pr-1",
                "pull_request_name": "Add search",
                "author_id": "author",
                "status": "MERGED"
            }]
        })
    );
}

#[tokio::test]
async fn reassign_without_candidate() {
    let app = app();
    let (status, _) = post(
        &app,
        "/team/add",
        json!({
            "team_name": "small",
            "members": [
                {"user_id": "a", "username": "author", "is_active": true},
                {"user_id": "b", "username": "bea", "is_active": true}
            ]
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    post(
        &app,
        "/pullRequest/create",
        json!({"pull_request_id": "pr-1", "pull_request_name": "Fix", "author_id": "a"}),
    )
    .await;

    let (status, body) = post(
        &app,
        "/pullRequest/reassign",
        json!({"pull_request_id": "pr-1", "old_user_id": "b"}),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "NO_CANDIDATE");
}

#[tokio::test]
async fn reviewer_stats_lists_open_load() {
    let app = app();
    seed_backend(&app).await;
    for id in ["pr-1", "pr-2"] {
        post(
            &app,
            "/pullRequest/create",
            json!({"pull_request_id": id, "pull_request_name": "work", "author_id": "author"}),
        )
        .await;
    }
    post(&app, "/pullRequest/merge", json!({"pull_request_id": "pr-2"})).await;

    let (status, body) = get(&app, "/stats/reviewers?team_name=backend").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({"items": [
            {"user_id": "r1", "username": "alice", "team_name": "backend", "assigned_open_prs": 1},
            {"user_id": "r2", "username": "bob", "team_name": "backend", "assigned_open_prs": 1}
        ]})
    );
}
