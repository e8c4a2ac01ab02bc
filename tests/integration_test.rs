//! Integration tests for the public profile API
//!
//! These tests drive the full router: routing, auth middleware, handlers and
//! the embedded database.

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tempfile::NamedTempFile;
use tower::ServiceExt;

use profile_share::auth::JwtKeys;
use profile_share::database::{init_db, AppState};
use profile_share::route::create_app;

const SECRET: &str = "integration-secret";

/// Helper function to create a test application with a temporary database
fn setup_test_app() -> (axum::Router, NamedTempFile) {
    let temp_db = NamedTempFile::new().expect("Failed to create temp file");
    let db_path = temp_db.path().to_str().unwrap();

    let db = init_db(db_path).expect("Failed to initialize test database");
    let state = AppState::new(db, JwtKeys::new(SECRET, 1));

    (create_app(state), temp_db)
}

fn bearer(user_id: &str) -> String {
    format!("Bearer {}", JwtKeys::new(SECRET, 1).issue(user_id).unwrap())
}

/// Helper function to parse response body as JSON
async fn response_json(body: Body) -> Value {
    let bytes = body
        .collect()
        .await
        .expect("Failed to read response body")
        .to_bytes();

    serde_json::from_slice(&bytes).expect("Failed to parse JSON")
}

async fn get_or_create(app: &axum::Router, user_id: &str) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/profiles/public")
                .header("content-type", "application/json")
                .header("Authorization", bearer(user_id))
                .body(Body::from("{}"))
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    (status, response_json(response.into_body()).await)
}

async fn toggle(app: &axum::Router, user_id: &str, is_active: bool) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/profiles/public/toggle")
                .header("content-type", "application/json")
                .header("Authorization", bearer(user_id))
                .body(Body::from(json!({ "isActive": is_active }).to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    (status, response_json(response.into_body()).await)
}

async fn get(app: &axum::Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = response.status();
    (status, response_json(response.into_body()).await)
}

#[tokio::test]
async fn test_get_or_create_creates_then_returns_existing() {
    let (app, _temp_db) = setup_test_app();

    let (status, first) = get_or_create(&app, "u1").await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(first["userId"], "u1");
    assert_eq!(first["isActive"], true);
    assert_eq!(first["viewCount"], 0);
    assert!(first["shareToken"].as_str().unwrap().len() >= 22);

    let (status, second) = get_or_create(&app, "u1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(second["shareToken"], first["shareToken"]);
    assert_eq!(second["id"], first["id"]);
}

#[tokio::test]
async fn test_users_get_distinct_tokens() {
    let (app, _temp_db) = setup_test_app();

    let (_, a) = get_or_create(&app, "alice").await;
    let (_, b) = get_or_create(&app, "bob").await;

    assert_ne!(a["shareToken"], b["shareToken"]);
}

#[tokio::test]
async fn test_view_by_token_counts_each_visit() {
    let (app, _temp_db) = setup_test_app();
    let (_, created) = get_or_create(&app, "u1").await;
    let token = created["shareToken"].as_str().unwrap();

    for expected in 1..=3 {
        let (status, view) = get(&app, &format!("/profiles/public/share/{}", token)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(view["viewCount"], expected);
        assert_eq!(view["userId"], "u1");
        assert!(view.get("shareToken").is_none());
        assert!(view.get("id").is_none());
    }
}

#[tokio::test]
async fn test_view_by_user_id() {
    let (app, _temp_db) = setup_test_app();
    get_or_create(&app, "u1").await;

    let (status, view) = get(&app, "/profiles/public/user/u1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(view["viewCount"], 1);

    let (status, _) = get(&app, "/profiles/public/user/nobody").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_toggle_hides_and_restores_profile() {
    let (app, _temp_db) = setup_test_app();
    let (_, created) = get_or_create(&app, "u1").await;
    let token = created["shareToken"].as_str().unwrap().to_string();
    let share_uri = format!("/profiles/public/share/{}", token);

    get(&app, &share_uri).await;

    let (status, hidden) = toggle(&app, "u1", false).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(hidden["isActive"], false);
    assert_eq!(hidden["shareToken"], token.as_str());
    assert_eq!(hidden["viewCount"], 1);

    let (status, _) = get(&app, &share_uri).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = get(&app, "/profiles/public/user/u1").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, restored) = toggle(&app, "u1", true).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(restored["shareToken"], token.as_str());
    assert_eq!(restored["viewCount"], 1);

    let (status, view) = get(&app, &share_uri).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(view["viewCount"], 2);
}

#[tokio::test]
async fn test_toggle_without_public_profile_is_not_found() {
    let (app, _temp_db) = setup_test_app();

    let (status, body) = toggle(&app, "fresh_user", true).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "not_found");

    // Toggling must not create the row as a side effect
    let (status, _) = get(&app, "/profiles/public/user/fresh_user").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_unknown_and_inactive_tokens_look_the_same() {
    let (app, _temp_db) = setup_test_app();
    let (_, created) = get_or_create(&app, "u1").await;
    let token = created["shareToken"].as_str().unwrap().to_string();
    toggle(&app, "u1", false).await;

    let (unknown_status, unknown_body) = get(&app, "/profiles/public/share/doesnotexist").await;
    let (inactive_status, inactive_body) =
        get(&app, &format!("/profiles/public/share/{}", token)).await;

    assert_eq!(unknown_status, StatusCode::NOT_FOUND);
    assert_eq!(inactive_status, unknown_status);
    assert_eq!(inactive_body, unknown_body);
}

#[tokio::test]
async fn test_scenario_views_visible_from_second_tab() {
    let (app, _temp_db) = setup_test_app();

    let (_, first) = get_or_create(&app, "u1").await;
    assert_eq!(first["viewCount"], 0);
    let token = first["shareToken"].as_str().unwrap().to_string();

    for _ in 0..3 {
        let (status, _) = get(&app, &format!("/profiles/public/share/{}", token)).await;
        assert_eq!(status, StatusCode::OK);
    }

    let (status, again) = get_or_create(&app, "u1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(again["shareToken"], token.as_str());
    assert_eq!(again["viewCount"], 3);
    assert_eq!(again["isActive"], true);
}

#[tokio::test]
async fn test_profile_fields_appear_in_public_view() {
    let (app, _temp_db) = setup_test_app();

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("PUT")
                .uri("/profiles/me")
                .header("content-type", "application/json")
                .header("Authorization", bearer("u1"))
                .body(Body::from(
                    json!({
                        "firstName": "An",
                        "title": "Backend Engineer",
                        "socialLinks": [{ "platform": "github", "url": "https://github.com/an" }]
                    })
                    .to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let profile = response_json(response.into_body()).await;

    let (_, created) = get_or_create(&app, "u1").await;
    assert_eq!(created["profileId"], profile["id"]);

    let (_, view) = get(&app, "/profiles/public/user/u1").await;
    assert_eq!(view["profile"]["firstName"], "An");
    assert_eq!(view["profile"]["title"], "Backend Engineer");
    assert_eq!(view["profile"]["socialLinks"][0]["platform"], "github");
}

#[tokio::test]
async fn test_get_my_profile() {
    let (app, _temp_db) = setup_test_app();

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/profiles/me")
                .header("Authorization", bearer("u1"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    // Get-or-create gives the user an empty snapshot
    get_or_create(&app, "u1").await;

    let response = app
        .oneshot(
            Request::builder()
                .uri("/profiles/me")
                .header("Authorization", bearer("u1"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response.into_body()).await;
    assert_eq!(body["userId"], "u1");
}

#[tokio::test]
async fn test_health() {
    let (app, _temp_db) = setup_test_app();

    let (status, body) = get(&app, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}
