//! Row types for the `leaderboard` table.
//! Schema lives in migrations/20260101000000_leaderboard.sql

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Persisted leaderboard record
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow, Serialize, Deserialize)]
pub struct LeaderboardRow {
    pub id: i64,
    pub name: String,
    pub score: i64,
    pub is_pinned: bool,
    pub created_at: DateTime<Utc>,
}

impl LeaderboardRow {
    pub fn score_u32(&self) -> u32 {
        u32::try_from(self.score).unwrap_or(0)
    }
}

/// A record to insert; `id` is assigned by SQLite
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRecord {
    pub name: String,
    pub score: u32,
    pub is_pinned: bool,
    pub created_at: DateTime<Utc>,
}

impl NewRecord {
    /// Record for a player submission, never pinned
    pub fn submission(name: impl Into<String>, score: u32) -> Self {
        Self {
            name: name.into(),
            score,
            is_pinned: false,
            created_at: Utc::now(),
        }
    }

    /// Author-controlled pinned entry
    pub fn pinned(name: impl Into<String>, score: u32) -> Self {
        Self {
            is_pinned: true,
            ..Self::submission(name, score)
        }
    }

    pub fn at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self
    }
}
