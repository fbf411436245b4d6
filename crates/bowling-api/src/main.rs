//! Bowling score tracker API server entry point.

use std::sync::Arc;

use bowling_api::config::ServerConfig;
use bowling_api::error::AppError;
use bowling_api::state::AppState;
use bowling_core::clock::SystemClock;
use bowling_store::JsonFileRepository;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    // Initialize tracing subscriber.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .json()
        .init();

    tracing::info!("Starting bowling score tracker API server");

    let config = ServerConfig::from_env()?;

    // Open the game and player collections.
    let games = JsonFileRepository::open(config.games_path()).await?;
    let players = JsonFileRepository::open(config.players_path()).await?;
    tracing::info!(data_dir = %config.data_dir.display(), "collections opened");

    let app_state = AppState::new(Arc::new(SystemClock), Arc::new(games), Arc::new(players));

    // TODO: read allowed origins from a CORS_ORIGINS variable instead of allowing any.
    let app = bowling_api::app(app_state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr = config.socket_addr()?;
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app).await?;

    Ok(())
}
