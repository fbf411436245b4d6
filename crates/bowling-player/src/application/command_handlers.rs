//! Command handlers for the player context.
//!
//! Each handler loads the player document, applies the change to the
//! aggregate and saves it back with the version it was loaded at.

use bowling_core::clock::Clock;
use bowling_core::command::Command;
use bowling_core::error::DomainError;
use bowling_core::repository::{DocumentRepository, StoredDocument};
use tracing::{info, warn};
use uuid::Uuid;

use crate::domain::aggregates::Player;
use crate::domain::commands::{CreatePlayer, RecordFinalScore, RegisterGame};

/// Reconstitutes a `Player` from its stored document.
///
/// # Errors
///
/// Returns `DomainError::Infrastructure` if the document cannot be decoded.
pub(crate) fn reconstitute(stored: &StoredDocument) -> Result<Player, DomainError> {
    serde_json::from_value(stored.data.clone()).map_err(|e| {
        DomainError::Infrastructure(format!("player {} deserialization failed: {e}", stored.id))
    })
}

fn to_document(player: &Player) -> Result<serde_json::Value, DomainError> {
    serde_json::to_value(player)
        .map_err(|e| DomainError::Infrastructure(format!("player serialization failed: {e}")))
}

/// Loads a player and the version it was stored at.
///
/// # Errors
///
/// Returns `DomainError::NotFound` if the player does not exist, or the
/// repository's error if loading fails.
pub async fn load_player(
    player_id: Uuid,
    repo: &dyn DocumentRepository,
) -> Result<(Player, i64), DomainError> {
    let stored = repo
        .load(player_id)
        .await?
        .ok_or_else(|| DomainError::player_not_found(player_id))?;
    Ok((reconstitute(&stored)?, stored.version))
}

/// Handles the `CreatePlayer` command.
///
/// # Errors
///
/// Returns `DomainError::Validation` for a blank name, or the repository's
/// error if saving fails.
pub async fn handle_create_player(
    command: &CreatePlayer,
    clock: &dyn Clock,
    repo: &dyn DocumentRepository,
) -> Result<Player, DomainError> {
    let player = Player::new(command.player_id, &command.name)?;

    repo.save(player.id, 0, to_document(&player)?, clock.now())
        .await?;

    info!(
        command = command.command_type(),
        correlation_id = %command.correlation_id(),
        player_id = %player.id,
        "player created"
    );
    Ok(player)
}

/// Handles the `RegisterGame` command.
///
/// # Errors
///
/// Returns `DomainError::NotFound` if the player does not exist,
/// `DomainError::Validation` if the game is already registered, or the
/// repository's error if loading or saving fails.
pub async fn handle_register_game(
    command: &RegisterGame,
    clock: &dyn Clock,
    repo: &dyn DocumentRepository,
) -> Result<(), DomainError> {
    let (mut player, version) = load_player(command.player_id, repo).await?;

    player.register_game(command.game_id, clock.now())?;

    repo.save(player.id, version, to_document(&player)?, clock.now())
        .await?;

    info!(
        command = command.command_type(),
        correlation_id = %command.correlation_id(),
        player_id = %player.id,
        game_id = %command.game_id,
        "game registered"
    );
    Ok(())
}

/// Handles the `RecordFinalScore` command: finds the player owning the game
/// and stores the score on their record.
///
/// Returns the owning player's id, or `None` if no player owns the game.
///
/// # Errors
///
/// Returns the repository's error if loading or saving fails.
pub async fn handle_record_final_score(
    command: &RecordFinalScore,
    clock: &dyn Clock,
    repo: &dyn DocumentRepository,
) -> Result<Option<Uuid>, DomainError> {
    for stored in repo.load_all().await? {
        let mut player = reconstitute(&stored)?;
        if player.game(command.game_id).is_none() {
            continue;
        }

        player.record_final_score(command.game_id, command.score, clock.now())?;
        repo.save(player.id, stored.version, to_document(&player)?, clock.now())
            .await?;

        info!(
            command = command.command_type(),
            correlation_id = %command.correlation_id(),
            player_id = %player.id,
            game_id = %command.game_id,
            score = command.score,
            "final score recorded"
        );
        return Ok(Some(player.id));
    }

    warn!(
        correlation_id = %command.correlation_id(),
        game_id = %command.game_id,
        "finished game has no owning player"
    );
    Ok(None)
}

#[cfg(test)]
mod tests {
    use bowling_core::error::DomainError;
    use bowling_test_support::{
        FailingDocumentRepository, FixedClock, InMemoryDocumentRepository, fixed_now,
    };
    use uuid::Uuid;

    use super::*;

    async fn seeded_player(repo: &InMemoryDocumentRepository, clock: &FixedClock) -> Uuid {
        let command = CreatePlayer {
            correlation_id: Uuid::new_v4(),
            player_id: Uuid::new_v4(),
            name: "Alice".to_owned(),
        };
        handle_create_player(&command, clock, repo).await.unwrap().id
    }

    #[tokio::test]
    async fn test_handle_create_player_saves_new_document() {
        // Arrange
        let clock = FixedClock(fixed_now());
        let repo = InMemoryDocumentRepository::new();
        let player_id = Uuid::new_v4();
        let command = CreatePlayer {
            correlation_id: Uuid::new_v4(),
            player_id,
            name: "Alice".to_owned(),
        };

        // Act
        let player = handle_create_player(&command, &clock, &repo).await.unwrap();

        // Assert
        assert_eq!(player.id, player_id);
        assert_eq!(repo.saves(), vec![(player_id, 0)]);
        let stored = repo.document(player_id).unwrap();
        assert_eq!(stored.version, 1);
        assert_eq!(stored.updated_at, fixed_now());
        assert_eq!(stored.data["name"], "Alice");
    }

    #[tokio::test]
    async fn test_handle_create_player_rejects_blank_name() {
        let clock = FixedClock(fixed_now());
        let repo = InMemoryDocumentRepository::new();
        let command = CreatePlayer {
            correlation_id: Uuid::new_v4(),
            player_id: Uuid::new_v4(),
            name: String::new(),
        };

        let result = handle_create_player(&command, &clock, &repo).await;

        assert!(matches!(result, Err(DomainError::Validation(_))));
        assert!(repo.saves().is_empty());
    }

    #[tokio::test]
    async fn test_handle_register_game_appends_record() {
        // Arrange
        let clock = FixedClock(fixed_now());
        let repo = InMemoryDocumentRepository::new();
        let player_id = seeded_player(&repo, &clock).await;
        let game_id = Uuid::new_v4();

        // Act
        handle_register_game(
            &RegisterGame {
                correlation_id: Uuid::new_v4(),
                player_id,
                game_id,
            },
            &clock,
            &repo,
        )
        .await
        .unwrap();

        // Assert
        let (player, version) = load_player(player_id, &repo).await.unwrap();
        assert_eq!(version, 2);
        assert_eq!(player.games().len(), 1);
        assert_eq!(player.games()[0].game_id, game_id);
    }

    #[tokio::test]
    async fn test_handle_register_game_for_unknown_player_is_not_found() {
        let clock = FixedClock(fixed_now());
        let repo = InMemoryDocumentRepository::new();
        let player_id = Uuid::new_v4();

        let result = handle_register_game(
            &RegisterGame {
                correlation_id: Uuid::new_v4(),
                player_id,
                game_id: Uuid::new_v4(),
            },
            &clock,
            &repo,
        )
        .await;

        match result {
            Err(DomainError::NotFound { kind, id }) => {
                assert_eq!(kind, "player");
                assert_eq!(id, player_id);
            }
            other => panic!("expected NotFound, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_handle_record_final_score_updates_owner() {
        // Arrange
        let clock = FixedClock(fixed_now());
        let repo = InMemoryDocumentRepository::new();
        let _other = seeded_player(&repo, &clock).await;
        let owner = seeded_player(&repo, &clock).await;
        let game_id = Uuid::new_v4();
        handle_register_game(
            &RegisterGame {
                correlation_id: Uuid::new_v4(),
                player_id: owner,
                game_id,
            },
            &clock,
            &repo,
        )
        .await
        .unwrap();

        // Act
        let found = handle_record_final_score(
            &RecordFinalScore {
                correlation_id: Uuid::new_v4(),
                game_id,
                score: 187,
            },
            &clock,
            &repo,
        )
        .await
        .unwrap();

        // Assert
        assert_eq!(found, Some(owner));
        let (player, _) = load_player(owner, &repo).await.unwrap();
        let record = player.game(game_id).unwrap();
        assert_eq!(record.score, 187);
        assert!(record.is_completed());
    }

    #[tokio::test]
    async fn test_handle_record_final_score_without_owner_is_none() {
        let clock = FixedClock(fixed_now());
        let repo = InMemoryDocumentRepository::new();
        seeded_player(&repo, &clock).await;

        let found = handle_record_final_score(
            &RecordFinalScore {
                correlation_id: Uuid::new_v4(),
                game_id: Uuid::new_v4(),
                score: 90,
            },
            &clock,
            &repo,
        )
        .await
        .unwrap();

        assert_eq!(found, None);
    }

    #[tokio::test]
    async fn test_repository_failure_propagates() {
        let clock = FixedClock(fixed_now());
        let command = CreatePlayer {
            correlation_id: Uuid::new_v4(),
            player_id: Uuid::new_v4(),
            name: "Alice".to_owned(),
        };

        let result = handle_create_player(&command, &clock, &FailingDocumentRepository).await;

        assert!(matches!(result, Err(DomainError::Infrastructure(_))));
    }
}
