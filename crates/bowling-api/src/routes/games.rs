//! Routes for games in progress: rolling and reading scores.

use axum::extract::{Path, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use uuid::Uuid;

use bowling_game::application::command_handlers;
use bowling_game::application::query_handlers::{self, ScoreView, ScorecardView};
use bowling_game::domain::commands;

use crate::error::ApiError;
use crate::state::AppState;

/// Request body for POST /{game_id}/rolls.
#[derive(Debug, Deserialize)]
pub struct RecordRollRequest {
    /// Pins knocked down. Range checking happens in the scoring engine so
    /// out-of-range values surface as validation errors.
    pub pins: i32,
}

/// Response body for POST /{game_id}/rolls.
#[derive(Debug, Serialize)]
pub struct RecordRollResponse {
    /// Human-readable confirmation.
    pub message: &'static str,
    /// Pins knocked down by this roll.
    pub pins: u8,
    /// Score after the roll.
    pub score: u32,
    /// Whether the roll finished the game.
    pub game_over: bool,
}

/// POST /{game_id}/rolls
#[instrument(skip(state, request), fields(pins = request.pins))]
async fn record_roll(
    State(state): State<AppState>,
    Path(game_id): Path<Uuid>,
    Json(request): Json<RecordRollRequest>,
) -> Result<Json<RecordRollResponse>, ApiError> {
    let command = commands::RecordRoll {
        correlation_id: Uuid::new_v4(),
        game_id,
        pins: request.pins,
    };

    info!(correlation_id = %command.correlation_id, "handling record_roll command");

    let outcome = command_handlers::handle_record_roll(
        &command,
        state.clock.as_ref(),
        &*state.games,
        &*state.players,
    )
    .await?;

    Ok(Json(RecordRollResponse {
        message: "Roll recorded",
        pins: outcome.pins,
        score: outcome.score,
        game_over: outcome.game_over,
    }))
}

/// GET /{game_id}/score
#[instrument(skip(state))]
async fn get_score(
    State(state): State<AppState>,
    Path(game_id): Path<Uuid>,
) -> Result<Json<ScoreView>, ApiError> {
    let view = query_handlers::get_score(game_id, &*state.games, &*state.players).await?;
    Ok(Json(view))
}

/// GET /{game_id}
#[instrument(skip(state))]
async fn get_scorecard(
    State(state): State<AppState>,
    Path(game_id): Path<Uuid>,
) -> Result<Json<ScorecardView>, ApiError> {
    let view = query_handlers::get_scorecard(game_id, &*state.games).await?;
    Ok(Json(view))
}

/// Returns the router for the game context.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/{game_id}", get(get_scorecard))
        .route("/{game_id}/rolls", post(record_roll))
        .route("/{game_id}/score", get(get_score))
}
