//! Application services for the player context.

pub mod command_handlers;
pub mod query_handlers;
