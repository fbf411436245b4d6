//! Routes for players, their statistics and starting new games.

use axum::extract::{Path, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use uuid::Uuid;

use bowling_game::application::command_handlers as game_commands;
use bowling_game::domain::commands::StartGame;
use bowling_player::application::command_handlers;
use bowling_player::application::query_handlers::{self, PlayerStatisticsView, PlayerView};
use bowling_player::domain::commands;

use crate::error::ApiError;
use crate::state::AppState;

/// Request body for POST /.
#[derive(Debug, Deserialize)]
pub struct CreatePlayerRequest {
    /// Display name of the new player.
    pub name: String,
}

/// Response body for POST /.
#[derive(Debug, Serialize)]
pub struct CreatePlayerResponse {
    /// The identifier assigned to the new player.
    pub player_id: Uuid,
}

/// Response body for POST /{player_id}/games.
#[derive(Debug, Serialize)]
pub struct StartGameResponse {
    /// The identifier assigned to the new game.
    pub game_id: Uuid,
}

/// POST /
#[instrument(skip(state, request))]
async fn create_player(
    State(state): State<AppState>,
    Json(request): Json<CreatePlayerRequest>,
) -> Result<Json<CreatePlayerResponse>, ApiError> {
    let command = commands::CreatePlayer {
        correlation_id: Uuid::new_v4(),
        player_id: Uuid::new_v4(),
        name: request.name,
    };

    info!(correlation_id = %command.correlation_id, "handling create_player command");

    let player =
        command_handlers::handle_create_player(&command, state.clock.as_ref(), &*state.players)
            .await?;

    Ok(Json(CreatePlayerResponse {
        player_id: player.id,
    }))
}

/// GET /{player_id}
#[instrument(skip(state))]
async fn get_player(
    State(state): State<AppState>,
    Path(player_id): Path<Uuid>,
) -> Result<Json<PlayerView>, ApiError> {
    let view = query_handlers::get_player(player_id, &*state.players).await?;
    Ok(Json(view))
}

/// GET /{player_id}/statistics
#[instrument(skip(state))]
async fn get_statistics(
    State(state): State<AppState>,
    Path(player_id): Path<Uuid>,
) -> Result<Json<PlayerStatisticsView>, ApiError> {
    let view = query_handlers::get_statistics(player_id, &*state.players).await?;
    Ok(Json(view))
}

/// POST /{player_id}/games
#[instrument(skip(state))]
async fn start_game(
    State(state): State<AppState>,
    Path(player_id): Path<Uuid>,
) -> Result<Json<StartGameResponse>, ApiError> {
    let command = StartGame {
        correlation_id: Uuid::new_v4(),
        player_id,
        game_id: Uuid::new_v4(),
    };

    info!(correlation_id = %command.correlation_id, "handling start_game command");

    game_commands::handle_start_game(
        &command,
        state.clock.as_ref(),
        &*state.games,
        &*state.players,
    )
    .await?;

    Ok(Json(StartGameResponse {
        game_id: command.game_id,
    }))
}

/// Returns the router for the player context.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_player))
        .route("/{player_id}", get(get_player))
        .route("/{player_id}/statistics", get(get_statistics))
        .route("/{player_id}/games", post(start_game))
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use bowling_core::clock::Clock;
    use bowling_core::repository::DocumentRepository;
    use bowling_test_support::{
        FailingDocumentRepository, FixedClock, InMemoryDocumentRepository, fixed_now,
    };
    use serde_json::Value;
    use tower::ServiceExt;

    fn app_state_with(players: Arc<dyn DocumentRepository>) -> AppState {
        let clock: Arc<dyn Clock + Send + Sync> = Arc::new(FixedClock(fixed_now()));
        AppState::new(clock, Arc::new(InMemoryDocumentRepository::new()), players)
    }

    fn test_app_state() -> AppState {
        app_state_with(Arc::new(InMemoryDocumentRepository::new()))
    }

    fn post(uri: &str, body: &Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(body).unwrap()))
            .unwrap()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder()
            .method("GET")
            .uri(uri)
            .body(Body::empty())
            .unwrap()
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&body_bytes).unwrap()
    }

    #[tokio::test]
    async fn test_create_player_returns_200_with_player_id() {
        // Arrange
        let state = test_app_state();
        let app = router().with_state(state.clone());

        // Act
        let response = app
            .oneshot(post("/", &serde_json::json!({ "name": "Alice" })))
            .await
            .unwrap();

        // Assert
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        let player_id = Uuid::parse_str(json["player_id"].as_str().unwrap()).unwrap();
        assert!(state.players.load(player_id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_create_player_with_blank_name_returns_400() {
        // Arrange
        let app = router().with_state(test_app_state());

        // Act
        let response = app
            .oneshot(post("/", &serde_json::json!({ "name": "   " })))
            .await
            .unwrap();

        // Assert
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["error"], "validation_error");
    }

    #[tokio::test]
    async fn test_create_player_returns_422_for_missing_name() {
        let app = router().with_state(test_app_state());

        let response = app
            .oneshot(post("/", &serde_json::json!({})))
            .await
            .unwrap();

        // Axum returns 422 for deserialization failures.
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_create_player_returns_500_when_repository_fails() {
        // Arrange
        let app = router().with_state(app_state_with(Arc::new(FailingDocumentRepository)));

        // Act
        let response = app
            .oneshot(post("/", &serde_json::json!({ "name": "Alice" })))
            .await
            .unwrap();

        // Assert
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let json = body_json(response).await;
        assert_eq!(json["error"], "infrastructure_error");
    }

    #[tokio::test]
    async fn test_get_unknown_player_returns_404() {
        let app = router().with_state(test_app_state());

        let response = app
            .oneshot(get(&format!("/{}", Uuid::new_v4())))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let json = body_json(response).await;
        assert_eq!(json["error"], "not_found");
    }

    #[tokio::test]
    async fn test_get_player_with_malformed_id_returns_400() {
        let app = router().with_state(test_app_state());

        let response = app.oneshot(get("/not-a-uuid")).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_start_game_registers_game_with_player() {
        // Arrange
        let state = test_app_state();
        let response = router()
            .with_state(state.clone())
            .oneshot(post("/", &serde_json::json!({ "name": "Alice" })))
            .await
            .unwrap();
        let player_id = body_json(response).await["player_id"]
            .as_str()
            .unwrap()
            .to_owned();

        // Act
        let response = router()
            .with_state(state.clone())
            .oneshot(post(&format!("/{player_id}/games"), &serde_json::json!({})))
            .await
            .unwrap();

        // Assert
        assert_eq!(response.status(), StatusCode::OK);
        let game_id = Uuid::parse_str(body_json(response).await["game_id"].as_str().unwrap())
            .unwrap();
        assert!(state.games.load(game_id).await.unwrap().is_some());

        let response = router()
            .with_state(state)
            .oneshot(get(&format!("/{player_id}")))
            .await
            .unwrap();
        let json = body_json(response).await;
        assert_eq!(json["games"][0]["game_id"], game_id.to_string());
        assert_eq!(json["version"], 2);
    }

    #[tokio::test]
    async fn test_start_game_for_unknown_player_returns_404() {
        let app = router().with_state(test_app_state());

        let response = app
            .oneshot(post(
                &format!("/{}/games", Uuid::new_v4()),
                &serde_json::json!({}),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
