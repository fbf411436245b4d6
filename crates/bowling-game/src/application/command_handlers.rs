//! Command handlers for the game context.
//!
//! Active games live in their own document collection. A game that finishes
//! is handed over to its player (final score recorded there) and removed
//! from the active collection. If the hand-over fails after the finishing
//! roll was saved, the next roll on that game completes it.

use bowling_core::clock::Clock;
use bowling_core::command::Command;
use bowling_core::error::DomainError;
use bowling_core::repository::{DocumentRepository, StoredDocument};
use bowling_player::application::command_handlers as player_commands;
use bowling_player::domain::commands::{RecordFinalScore, RegisterGame};
use tracing::{info, warn};
use uuid::Uuid;

use crate::domain::commands::{RecordRoll, StartGame};
use crate::domain::scoring::{RollError, ScoringEngine};

/// Outcome of a successfully recorded roll.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RollRecorded {
    /// The game the roll belongs to.
    pub game_id: Uuid,
    /// Pins knocked down.
    pub pins: u8,
    /// Score after the roll.
    pub score: u32,
    /// Whether the roll finished the game.
    pub game_over: bool,
    /// The player the final score was recorded on, for finished games.
    pub recorded_for: Option<Uuid>,
}

/// Reconstitutes a `ScoringEngine` from its stored document.
///
/// # Errors
///
/// Returns `DomainError::Infrastructure` if the document cannot be decoded.
pub(crate) fn reconstitute(stored: &StoredDocument) -> Result<ScoringEngine, DomainError> {
    serde_json::from_value(stored.data.clone()).map_err(|e| {
        DomainError::Infrastructure(format!("game {} deserialization failed: {e}", stored.id))
    })
}

fn to_document(engine: &ScoringEngine) -> Result<serde_json::Value, DomainError> {
    serde_json::to_value(engine)
        .map_err(|e| DomainError::Infrastructure(format!("game serialization failed: {e}")))
}

/// Handles the `StartGame` command: checks the player exists, stores an
/// empty game and registers it with the player.
///
/// # Errors
///
/// Returns `DomainError::NotFound` if the player does not exist, or the
/// repository's error if loading or saving fails.
pub async fn handle_start_game(
    command: &StartGame,
    clock: &dyn Clock,
    games: &dyn DocumentRepository,
    players: &dyn DocumentRepository,
) -> Result<(), DomainError> {
    player_commands::load_player(command.player_id, players).await?;

    games
        .save(
            command.game_id,
            0,
            to_document(&ScoringEngine::new())?,
            clock.now(),
        )
        .await?;

    player_commands::handle_register_game(
        &RegisterGame {
            correlation_id: command.correlation_id,
            player_id: command.player_id,
            game_id: command.game_id,
        },
        clock,
        players,
    )
    .await?;

    info!(
        command = command.command_type(),
        correlation_id = %command.correlation_id(),
        game_id = %command.game_id,
        player_id = %command.player_id,
        "game started"
    );
    Ok(())
}

/// Records the final score on the owning player, then removes the game from
/// the active collection.
async fn hand_over_finished_game(
    correlation_id: Uuid,
    game_id: Uuid,
    score: u32,
    clock: &dyn Clock,
    games: &dyn DocumentRepository,
    players: &dyn DocumentRepository,
) -> Result<Option<Uuid>, DomainError> {
    let recorded_for = player_commands::handle_record_final_score(
        &RecordFinalScore {
            correlation_id,
            game_id,
            score,
        },
        clock,
        players,
    )
    .await?;

    games.delete(game_id).await?;

    info!(
        correlation_id = %correlation_id,
        game_id = %game_id,
        final_score = score,
        "game finished"
    );
    Ok(recorded_for)
}

/// Handles the `RecordRoll` command.
///
/// The roll is validated by the engine and the game saved at the version it
/// was loaded at, so two concurrent rolls on one game cannot both succeed.
/// When the roll ends the game the final score goes to the owning player and
/// the game leaves the active collection.
///
/// A finished game that is still active had its hand-over interrupted. A roll
/// on it completes the hand-over and is then refused by the engine as usual.
///
/// # Errors
///
/// Returns `DomainError::NotFound` if the game is not active,
/// `DomainError::Validation` if the engine refuses the roll,
/// `DomainError::ConcurrencyConflict` if another roll was saved first, or the
/// repository's error if loading or saving fails.
pub async fn handle_record_roll(
    command: &RecordRoll,
    clock: &dyn Clock,
    games: &dyn DocumentRepository,
    players: &dyn DocumentRepository,
) -> Result<RollRecorded, DomainError> {
    let stored = games
        .load(command.game_id)
        .await?
        .ok_or_else(|| DomainError::game_not_found(command.game_id))?;
    let mut engine = reconstitute(&stored)?;

    if engine.is_game_over() {
        warn!(
            correlation_id = %command.correlation_id(),
            game_id = %command.game_id,
            "finished game still active, completing hand-over"
        );
        hand_over_finished_game(
            command.correlation_id,
            command.game_id,
            engine.score(),
            clock,
            games,
            players,
        )
        .await?;
        let refused = engine
            .record_roll(command.pins)
            .err()
            .unwrap_or(RollError::GameAlreadyOver);
        return Err(refused.into());
    }

    engine.record_roll(command.pins)?;

    games
        .save(
            command.game_id,
            stored.version,
            to_document(&engine)?,
            clock.now(),
        )
        .await?;

    let mut outcome = RollRecorded {
        game_id: command.game_id,
        pins: engine.rolls().last().copied().unwrap_or_default(),
        score: engine.score(),
        game_over: engine.is_game_over(),
        recorded_for: None,
    };

    info!(
        command = command.command_type(),
        correlation_id = %command.correlation_id(),
        game_id = %command.game_id,
        pins = outcome.pins,
        score = outcome.score,
        "roll recorded"
    );

    if outcome.game_over {
        outcome.recorded_for = hand_over_finished_game(
            command.correlation_id,
            command.game_id,
            outcome.score,
            clock,
            games,
            players,
        )
        .await?;
    }

    Ok(outcome)
}
