//! Query handlers for the player context.
//!
//! These reconstitute players from their stored documents and return
//! read-only view DTOs.

use bowling_core::error::DomainError;
use bowling_core::repository::DocumentRepository;
use serde::Serialize;
use uuid::Uuid;

use crate::application::command_handlers::{load_player, reconstitute};
use crate::domain::aggregates::GameRecord;

/// Read-only view of a player.
#[derive(Debug, Serialize)]
pub struct PlayerView {
    /// The player identifier.
    pub player_id: Uuid,
    /// Display name.
    pub name: String,
    /// Games in the order they were started.
    pub games: Vec<GameRecord>,
    /// Current document version.
    pub version: i64,
}

/// Read-only view of a player's statistics.
#[derive(Debug, Serialize)]
pub struct PlayerStatisticsView {
    /// The player identifier.
    pub player_id: Uuid,
    /// Number of games registered, finished or not.
    pub total_games: usize,
    /// Mean score across all registered games.
    pub average_score: f64,
    /// Best score across all registered games.
    pub highest_score: u32,
}

/// A game record together with the player who owns it.
#[derive(Debug, Clone, Serialize)]
pub struct OwnedGameRecord {
    /// The owning player.
    pub player_id: Uuid,
    /// The record as stored on the player.
    pub record: GameRecord,
}

/// Retrieves a player by id.
///
/// # Errors
///
/// Returns `DomainError::NotFound` if the player does not exist.
/// Returns `DomainError::Infrastructure` if the document cannot be decoded.
pub async fn get_player(
    player_id: Uuid,
    repo: &dyn DocumentRepository,
) -> Result<PlayerView, DomainError> {
    let (player, version) = load_player(player_id, repo).await?;
    Ok(PlayerView {
        player_id,
        name: player.name().to_owned(),
        games: player.games().to_vec(),
        version,
    })
}

/// Retrieves a player's statistics.
///
/// # Errors
///
/// Returns `DomainError::NotFound` if the player does not exist.
/// Returns `DomainError::Infrastructure` if the document cannot be decoded.
pub async fn get_statistics(
    player_id: Uuid,
    repo: &dyn DocumentRepository,
) -> Result<PlayerStatisticsView, DomainError> {
    let (player, _) = load_player(player_id, repo).await?;
    let stats = player.statistics();
    Ok(PlayerStatisticsView {
        player_id,
        total_games: stats.total_games,
        average_score: stats.average_score,
        highest_score: stats.highest_score,
    })
}

/// Searches every player for the record of `game_id`.
///
/// # Errors
///
/// Returns the repository's error if loading fails, or
/// `DomainError::Infrastructure` if a document cannot be decoded.
pub async fn find_game_record(
    game_id: Uuid,
    repo: &dyn DocumentRepository,
) -> Result<Option<OwnedGameRecord>, DomainError> {
    for stored in repo.load_all().await? {
        let player = reconstitute(&stored)?;
        if let Some(record) = player.game(game_id) {
            return Ok(Some(OwnedGameRecord {
                player_id: player.id,
                record: record.clone(),
            }));
        }
    }
    Ok(None)
}
