//! Application state shared across all handlers

use sqlx::SqlitePool;

use crate::leaderboard::RankingMode;

/// Shared application state
pub struct AppState {
    /// Leaderboard database
    pub pool: SqlitePool,
    /// How stored records are turned into rows
    pub ranking_mode: RankingMode,
}

impl AppState {
    pub fn new(pool: SqlitePool, ranking_mode: RankingMode) -> Self {
        Self { pool, ranking_mode }
    }
}
