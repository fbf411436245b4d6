//! Aggregate roots for the player context.

use bowling_core::error::DomainError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One game bowled by a player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameRecord {
    /// The game identifier.
    pub game_id: Uuid,
    /// Final score, or 0 while the game is still in progress.
    pub score: u32,
    /// When the game was started.
    pub started_at: DateTime<Utc>,
    /// When the final score was recorded.
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
}

impl GameRecord {
    /// Whether the final score has been recorded.
    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.completed_at.is_some()
    }
}

/// Aggregate statistics over a player's games.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PlayerStatistics {
    /// Number of games registered, finished or not.
    pub total_games: usize,
    /// Mean score across all registered games.
    pub average_score: f64,
    /// Best score across all registered games.
    pub highest_score: u32,
}

/// The aggregate root for a player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    /// Aggregate identifier.
    #[serde(rename = "player_id")]
    pub id: Uuid,
    /// Display name.
    pub(crate) name: String,
    /// Games in the order they were started.
    #[serde(default)]
    pub(crate) games: Vec<GameRecord>,
}

impl Player {
    /// Creates a player with no games.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if the name is blank.
    pub fn new(id: Uuid, name: &str) -> Result<Self, DomainError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(DomainError::Validation(
                "player name must not be blank".to_owned(),
            ));
        }
        Ok(Self {
            id,
            name: name.to_owned(),
            games: Vec::new(),
        })
    }

    /// Display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Games in the order they were started.
    #[must_use]
    pub fn games(&self) -> &[GameRecord] {
        &self.games
    }

    /// Looks up the record of one game.
    #[must_use]
    pub fn game(&self, game_id: Uuid) -> Option<&GameRecord> {
        self.games.iter().find(|g| g.game_id == game_id)
    }

    /// Adds a newly started game with a score of 0.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if the game is already registered.
    pub fn register_game(
        &mut self,
        game_id: Uuid,
        started_at: DateTime<Utc>,
    ) -> Result<(), DomainError> {
        if self.game(game_id).is_some() {
            return Err(DomainError::Validation(format!(
                "game {game_id} is already registered to player {}",
                self.id
            )));
        }
        self.games.push(GameRecord {
            game_id,
            score: 0,
            started_at,
            completed_at: None,
        });
        Ok(())
    }

    /// Stores the final score of a finished game.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if the game is not registered to
    /// this player.
    pub fn record_final_score(
        &mut self,
        game_id: Uuid,
        score: u32,
        completed_at: DateTime<Utc>,
    ) -> Result<(), DomainError> {
        let record = self
            .games
            .iter_mut()
            .find(|g| g.game_id == game_id)
            .ok_or_else(|| {
                DomainError::Validation(format!(
                    "game {game_id} is not registered to player {}",
                    self.id
                ))
            })?;
        record.score = score;
        record.completed_at = Some(completed_at);
        Ok(())
    }

    /// Computes statistics over every registered game. Games still in
    /// progress count with their recorded score of 0.
    #[must_use]
    pub fn statistics(&self) -> PlayerStatistics {
        let total_games = self.games.len();
        if total_games == 0 {
            return PlayerStatistics {
                total_games: 0,
                average_score: 0.0,
                highest_score: 0,
            };
        }

        let total_score: u64 = self.games.iter().map(|g| u64::from(g.score)).sum();
        let highest_score = self.games.iter().map(|g| g.score).max().unwrap_or(0);

        #[allow(clippy::cast_precision_loss)]
        let average_score = total_score as f64 / total_games as f64;

        PlayerStatistics {
            total_games,
            average_score,
            highest_score,
        }
    }
}
