//! Leaderboard storage errors, wrapping sqlx

use thiserror::Error;

/// Storage layer errors
#[derive(Debug, Error)]
pub enum LeaderboardError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

/// Result type alias for LeaderboardError
pub type LeaderboardResult<T> = Result<T, LeaderboardError>;
