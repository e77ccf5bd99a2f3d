//! Server-side leaderboard: storage and ranking
//!
//! ```text
//! POST /api/leaderboard ──► LeaderboardRepo::insert ──► SQLite
//! GET  /api/leaderboard ──► LeaderboardRepo::all ──► ranking::rank ──► Top-N
//! ```

pub mod error;
pub mod ranking;
pub mod repo;
pub mod schema;

pub use error::{LeaderboardError, LeaderboardResult};
pub use ranking::{rank, resolve_limit, RankingMode};
pub use repo::{init_database, init_memory_database, run_migrations, LeaderboardRepo};
pub use schema::{LeaderboardRow, NewRecord};
