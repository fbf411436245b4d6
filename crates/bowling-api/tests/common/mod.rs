//! Shared test helpers for API integration tests.
#![allow(dead_code)]

use std::path::Path;
use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use bowling_core::clock::Clock;
use bowling_store::JsonFileRepository;
use bowling_test_support::{FixedClock, fixed_now};
use http_body_util::BodyExt;
use tempfile::TempDir;
use tower::ServiceExt;

use bowling_api::state::AppState;

/// Build the full app router over JSON collections in `data_dir` and a fixed
/// clock. Uses the same route structure as `main.rs`.
pub async fn build_test_app_in(data_dir: &Path) -> Router {
    let clock: Arc<dyn Clock + Send + Sync> = Arc::new(FixedClock(fixed_now()));
    let games = JsonFileRepository::open(data_dir.join("games.json"))
        .await
        .unwrap();
    let players = JsonFileRepository::open(data_dir.join("players.json"))
        .await
        .unwrap();
    let app_state = AppState::new(clock, Arc::new(games), Arc::new(players));

    bowling_api::app(app_state)
}

/// Build the full app router over a fresh temporary data directory. The
/// directory lives as long as the returned guard.
pub async fn build_test_app() -> (Router, TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let app = build_test_app_in(dir.path()).await;
    (app, dir)
}

/// Send a POST request with a JSON body and return the response.
pub async fn post_json(
    app: Router,
    uri: &str,
    body: &serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(body).unwrap()))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body_bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&body_bytes).unwrap();

    (status, json)
}

/// Send a GET request and return the response.
pub async fn get_json(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body_bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&body_bytes).unwrap();

    (status, json)
}

/// Create a player and return their id.
pub async fn create_player(app: &Router, name: &str) -> String {
    let (status, json) = post_json(
        app.clone(),
        "/api/v1/players",
        &serde_json::json!({ "name": name }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    json["player_id"].as_str().unwrap().to_owned()
}

/// Start a game for `player_id` and return its id.
pub async fn start_game(app: &Router, player_id: &str) -> String {
    let (status, json) = post_json(
        app.clone(),
        &format!("/api/v1/players/{player_id}/games"),
        &serde_json::json!({}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    json["game_id"].as_str().unwrap().to_owned()
}

/// Record a roll and return the response.
pub async fn roll(app: &Router, game_id: &str, pins: i32) -> (StatusCode, serde_json::Value) {
    post_json(
        app.clone(),
        &format!("/api/v1/games/{game_id}/rolls"),
        &serde_json::json!({ "pins": pins }),
    )
    .await
}
