//! Bowling score tracker: player context.
//!
//! Responsible for player registration, the per-player record of games
//! started and their final scores, and the statistics derived from it.

pub mod application;
pub mod domain;
