//! Bowling score tracker: game context.
//!
//! Responsible for validating rolls against the rules of ten-pin bowling,
//! detecting the end of a game and computing its score, plus the workflow
//! that starts games and hands finished ones over to their player.

pub mod application;
pub mod domain;
