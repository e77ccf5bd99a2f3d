//! SQLite access for leaderboard records

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;

use super::error::LeaderboardResult;
use super::ranking::{rank, RankingMode};
use super::schema::{LeaderboardRow, NewRecord};
use crate::protocol::LeaderboardEntry;

/// Repository for the leaderboard table
pub struct LeaderboardRepo;

impl LeaderboardRepo {
    /// Insert one record. Each submission is a new row.
    pub async fn insert(pool: &SqlitePool, record: &NewRecord) -> LeaderboardResult<i64> {
        let result = sqlx::query(
            "INSERT INTO leaderboard (name, score, is_pinned, created_at) VALUES (?, ?, ?, ?)",
        )
        .bind(&record.name)
        .bind(i64::from(record.score))
        .bind(record.is_pinned)
        .bind(record.created_at)
        .execute(pool)
        .await?;
        Ok(result.last_insert_rowid())
    }

    /// Snapshot of every record
    pub async fn all(pool: &SqlitePool) -> LeaderboardResult<Vec<LeaderboardRow>> {
        let rows = sqlx::query_as::<_, LeaderboardRow>(
            "SELECT id, name, score, is_pinned, created_at FROM leaderboard",
        )
        .fetch_all(pool)
        .await?;
        Ok(rows)
    }

    /// Ranked Top-N over the current snapshot
    pub async fn top(
        pool: &SqlitePool,
        limit: usize,
        mode: RankingMode,
    ) -> LeaderboardResult<Vec<LeaderboardEntry>> {
        let rows = Self::all(pool).await?;
        Ok(rank(&rows, limit, mode))
    }

    pub async fn count(pool: &SqlitePool) -> LeaderboardResult<i64> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM leaderboard")
            .fetch_one(pool)
            .await?;
        Ok(count)
    }
}

/// Run migrations
pub async fn run_migrations(pool: &SqlitePool) -> LeaderboardResult<()> {
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}

/// Open (creating if missing) and migrate the database
pub async fn init_database(database_url: &str) -> LeaderboardResult<SqlitePool> {
    let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
    let pool = SqlitePool::connect_with(options).await?;

    run_migrations(&pool).await?;

    Ok(pool)
}

/// Private in-memory database, kept on a single connection
pub async fn init_memory_database() -> LeaderboardResult<SqlitePool> {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await?;

    run_migrations(&pool).await?;

    Ok(pool)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};

    #[tokio::test]
    async fn test_insert_and_count() {
        let pool = init_memory_database().await.unwrap();

        let first = LeaderboardRepo::insert(&pool, &NewRecord::submission("Ada", 4)).await.unwrap();
        let second = LeaderboardRepo::insert(&pool, &NewRecord::submission("Ada", 4)).await.unwrap();

        assert!(second > first);
        assert_eq!(LeaderboardRepo::count(&pool).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_round_trips_fields() {
        let pool = init_memory_database().await.unwrap();
        let created_at = Utc.timestamp_opt(1_700_000_000, 0).unwrap();

        LeaderboardRepo::insert(&pool, &NewRecord::pinned("Author", 99).at(created_at))
            .await
            .unwrap();

        let rows = LeaderboardRepo::all(&pool).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].name, "Author");
        assert_eq!(rows[0].score, 99);
        assert!(rows[0].is_pinned);
        assert_eq!(rows[0].created_at, created_at);
    }

    #[tokio::test]
    async fn test_top_applies_ranking() {
        let pool = init_memory_database().await.unwrap();
        let t0 = Utc::now();

        LeaderboardRepo::insert(&pool, &NewRecord::submission("A", 5).at(t0)).await.unwrap();
        LeaderboardRepo::insert(&pool, &NewRecord::submission("B", 9).at(t0 + Duration::seconds(1)))
            .await
            .unwrap();
        LeaderboardRepo::insert(&pool, &NewRecord::pinned("C", 9).at(t0 + Duration::seconds(2)))
            .await
            .unwrap();

        let top = LeaderboardRepo::top(&pool, 2, RankingMode::PerSubmission).await.unwrap();
        let names: Vec<_> = top.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["C", "B"]);
    }

    #[tokio::test]
    async fn test_empty_table() {
        let pool = init_memory_database().await.unwrap();
        assert!(LeaderboardRepo::top(&pool, 10, RankingMode::BestPerPlayer)
            .await
            .unwrap()
            .is_empty());
    }
}
