//! Bowling score tracker: HTTP API.
//!
//! Exposes the player and game contexts over JSON routes. `main.rs` wires the
//! file-backed repositories and the tracing subscriber around [`app`].

pub mod config;
pub mod error;
pub mod routes;
pub mod state;

use axum::Router;

use crate::state::AppState;

/// Builds the application router with every route mounted.
pub fn app(state: AppState) -> Router {
    Router::new()
        .merge(routes::health::router())
        .nest("/api/v1/players", routes::players::router())
        .nest("/api/v1/games", routes::games::router())
        .with_state(state)
}
