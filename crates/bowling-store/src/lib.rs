//! Bowling Store: file-backed persistence for games and players.

pub mod json_file_repository;

pub use json_file_repository::JsonFileRepository;
