//! Commands for the game context.

use bowling_core::command::Command;
use uuid::Uuid;

/// Command to start a new game for a player.
#[derive(Debug, Clone)]
pub struct StartGame {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The player who bowls the game.
    pub player_id: Uuid,
    /// Identifier to assign to the new game.
    pub game_id: Uuid,
}

/// Command to record one delivery.
#[derive(Debug, Clone)]
pub struct RecordRoll {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The game being bowled.
    pub game_id: Uuid,
    /// Pins knocked down, unvalidated.
    pub pins: i32,
}

impl Command for StartGame {
    fn command_type(&self) -> &'static str {
        "game.start_game"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

impl Command for RecordRoll {
    fn command_type(&self) -> &'static str {
        "game.record_roll"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}
