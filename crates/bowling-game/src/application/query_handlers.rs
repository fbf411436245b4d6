//! Query handlers for the game context.

use bowling_core::error::DomainError;
use bowling_core::repository::DocumentRepository;
use bowling_player::application::query_handlers as player_queries;
use serde::Serialize;
use uuid::Uuid;

use crate::application::command_handlers::reconstitute;
use crate::domain::scoring::FrameView;

/// Read-only view of a game's score.
#[derive(Debug, Serialize)]
pub struct ScoreView {
    /// The game identifier.
    pub game_id: Uuid,
    /// Live score for active games, final score for finished ones.
    pub score: u32,
    /// Whether the game has finished.
    pub game_over: bool,
}

/// Read-only scorecard of an active game.
#[derive(Debug, Serialize)]
pub struct ScorecardView {
    /// The game identifier.
    pub game_id: Uuid,
    /// Every delivery so far.
    pub rolls: Vec<u8>,
    /// Frame-by-frame breakdown.
    pub frames: Vec<FrameView>,
    /// Score so far.
    pub score: u32,
    /// Whether the game has finished.
    pub game_over: bool,
    /// Current document version.
    pub version: i64,
}

/// Retrieves the score of a game, active or finished.
///
/// # Errors
///
/// Returns `DomainError::NotFound` if the game is neither active nor
/// recorded on any player.
/// Returns `DomainError::Infrastructure` if a document cannot be decoded.
pub async fn get_score(
    game_id: Uuid,
    games: &dyn DocumentRepository,
    players: &dyn DocumentRepository,
) -> Result<ScoreView, DomainError> {
    if let Some(stored) = games.load(game_id).await? {
        let engine = reconstitute(&stored)?;
        return Ok(ScoreView {
            game_id,
            score: engine.score(),
            game_over: engine.is_game_over(),
        });
    }

    let owned = player_queries::find_game_record(game_id, players)
        .await?
        .ok_or_else(|| DomainError::game_not_found(game_id))?;
    Ok(ScoreView {
        game_id,
        score: owned.record.score,
        game_over: owned.record.is_completed(),
    })
}

/// Retrieves the scorecard of an active game.
///
/// # Errors
///
/// Returns `DomainError::NotFound` if the game is not active.
/// Returns `DomainError::Infrastructure` if the document cannot be decoded.
pub async fn get_scorecard(
    game_id: Uuid,
    games: &dyn DocumentRepository,
) -> Result<ScorecardView, DomainError> {
    let stored = games
        .load(game_id)
        .await?
        .ok_or_else(|| DomainError::game_not_found(game_id))?;
    let engine = reconstitute(&stored)?;
    Ok(ScorecardView {
        game_id,
        rolls: engine.rolls().to_vec(),
        frames: engine.frames(),
        score: engine.score(),
        game_over: engine.is_game_over(),
        version: stored.version,
    })
}
