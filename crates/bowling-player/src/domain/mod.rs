//! Domain model for the player context.

pub mod aggregates;
pub mod commands;
