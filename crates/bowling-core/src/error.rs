//! Domain error types.

use thiserror::Error;
use uuid::Uuid;

/// Top-level domain error type.
#[derive(Debug, Error)]
pub enum DomainError {
    /// A game or player was not found.
    #[error("{kind} not found: {id}")]
    NotFound {
        /// What was looked up (`"game"`, `"player"`).
        kind: &'static str,
        /// The identifier that had no match.
        id: Uuid,
    },

    /// Optimistic concurrency conflict.
    #[error("concurrency conflict on {id}: expected version {expected}, found {actual}")]
    ConcurrencyConflict {
        /// The document that had the conflict.
        id: Uuid,
        /// The expected version.
        expected: i64,
        /// The actual version found.
        actual: i64,
    },

    /// A validation error in domain logic.
    #[error("validation error: {0}")]
    Validation(String),

    /// An infrastructure/persistence error.
    #[error("infrastructure error: {0}")]
    Infrastructure(String),
}

impl DomainError {
    /// Shorthand for a missing game.
    #[must_use]
    pub fn game_not_found(id: Uuid) -> Self {
        Self::NotFound { kind: "game", id }
    }

    /// Shorthand for a missing player.
    #[must_use]
    pub fn player_not_found(id: Uuid) -> Self {
        Self::NotFound { kind: "player", id }
    }
}
