//! Shared application state.

use std::sync::Arc;

use bowling_core::clock::Clock;
use bowling_core::repository::DocumentRepository;

/// Application state shared across all request handlers.
#[derive(Clone)]
pub struct AppState {
    /// Source of timestamps.
    pub clock: Arc<dyn Clock + Send + Sync>,
    /// Registry of games in progress.
    pub games: Arc<dyn DocumentRepository>,
    /// Registry of players and their finished games.
    pub players: Arc<dyn DocumentRepository>,
}

impl AppState {
    /// Create new application state.
    #[must_use]
    pub fn new(
        clock: Arc<dyn Clock + Send + Sync>,
        games: Arc<dyn DocumentRepository>,
        players: Arc<dyn DocumentRepository>,
    ) -> Self {
        Self {
            clock,
            games,
            players,
        }
    }
}
