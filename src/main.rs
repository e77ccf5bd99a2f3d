//! Snake Leaderboard Server
//!
//! Stores completed-run scores and serves the ranked Top-N.

use std::sync::Arc;

use anyhow::Result;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use snake_board::api::create_router;
use snake_board::config::ServerConfig;
use snake_board::leaderboard::init_database;
use snake_board::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "snake_board=debug,tower_http=debug".into()),
        )
        .init();

    let config = ServerConfig::from_env()?;

    let pool = init_database(&config.database_url).await?;
    info!("Database ready at {}", config.database_url);

    let state = Arc::new(AppState::new(pool, config.ranking_mode));
    let app = create_router(state);

    let addr = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!("🐍 Leaderboard server running on http://{}", addr);
    info!("   Ranking mode: {:?}", config.ranking_mode);

    axum::serve(listener, app).await?;

    Ok(())
}
