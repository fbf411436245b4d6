//! Bowling Core: shared domain abstractions.
//!
//! This crate defines the traits and types that the game and player
//! contexts depend on. It contains no infrastructure code.

pub mod clock;
pub mod command;
pub mod error;
pub mod repository;
