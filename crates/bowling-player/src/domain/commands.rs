//! Commands for the player context.

use bowling_core::command::Command;
use uuid::Uuid;

/// Command to register a new player.
#[derive(Debug, Clone)]
pub struct CreatePlayer {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// Identifier to assign to the new player.
    pub player_id: Uuid,
    /// Display name.
    pub name: String,
}

/// Command to attach a freshly started game to a player.
#[derive(Debug, Clone)]
pub struct RegisterGame {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The player who bowls the game.
    pub player_id: Uuid,
    /// The game being started.
    pub game_id: Uuid,
}

/// Command to record the final score of a finished game on whichever
/// player owns it.
#[derive(Debug, Clone)]
pub struct RecordFinalScore {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The finished game.
    pub game_id: Uuid,
    /// Its final score.
    pub score: u32,
}

impl Command for CreatePlayer {
    fn command_type(&self) -> &'static str {
        "player.create_player"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

impl Command for RegisterGame {
    fn command_type(&self) -> &'static str {
        "player.register_game"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

impl Command for RecordFinalScore {
    fn command_type(&self) -> &'static str {
        "player.record_final_score"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}
