//! Domain model for the game context.

pub mod commands;
pub mod scoring;

use bowling_core::error::DomainError;

use self::scoring::RollError;

impl From<RollError> for DomainError {
    fn from(err: RollError) -> Self {
        DomainError::Validation(err.to_string())
    }
}
