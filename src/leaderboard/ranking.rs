//! Top-N ordering over the full record set

use std::cmp::Ordering;
use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::schema::LeaderboardRow;
use crate::config::DEFAULT_LIMIT;
use crate::protocol::LeaderboardEntry;

/// How records become leaderboard rows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RankingMode {
    /// Every submission is its own row: pinned first, then score
    /// descending, then earliest submission first
    #[default]
    PerSubmission,
    /// One row per name holding that name's best score, ordered by score
    /// descending. Pins and timestamps are ignored.
    BestPerPlayer,
}

impl RankingMode {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "per_submission" | "submission" => Some(RankingMode::PerSubmission),
            "best_per_player" | "player" => Some(RankingMode::BestPerPlayer),
            _ => None,
        }
    }
}

/// Coerce a raw limit to a positive row count.
///
/// Missing, non-integer and non-positive values all become the default.
/// Integral numeric forms such as `5.0` or `1e1` are accepted.
pub fn resolve_limit(raw: Option<&str>) -> usize {
    raw.and_then(|s| s.trim().parse::<f64>().ok())
        .filter(|n| n.is_finite() && n.fract() == 0.0 && *n >= 1.0)
        .map(|n| n as usize)
        .unwrap_or(DEFAULT_LIMIT)
}

/// Total order: pinned desc, score desc, created_at asc, id asc
fn compare(a: &LeaderboardRow, b: &LeaderboardRow) -> Ordering {
    b.is_pinned
        .cmp(&a.is_pinned)
        .then_with(|| b.score.cmp(&a.score))
        .then_with(|| a.created_at.cmp(&b.created_at))
        .then_with(|| a.id.cmp(&b.id))
}

/// Produce the ordered Top-N view of `records`
pub fn rank(records: &[LeaderboardRow], limit: usize, mode: RankingMode) -> Vec<LeaderboardEntry> {
    match mode {
        RankingMode::PerSubmission => {
            let mut sorted: Vec<&LeaderboardRow> = records.iter().collect();
            sorted.sort_by(|a, b| compare(a, b));
            sorted
                .into_iter()
                .take(limit)
                .map(|row| LeaderboardEntry {
                    name: row.name.clone(),
                    score: row.score_u32(),
                })
                .collect()
        }
        RankingMode::BestPerPlayer => {
            let mut best: HashMap<&str, i64> = HashMap::new();
            for row in records {
                let entry = best.entry(row.name.as_str()).or_insert(row.score);
                *entry = (*entry).max(row.score);
            }

            let mut players: Vec<(&str, i64)> = best.into_iter().collect();
            // Name breaks score ties so the output is stable
            players.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
            players
                .into_iter()
                .take(limit)
                .map(|(name, score)| LeaderboardEntry {
                    name: name.to_string(),
                    score: u32::try_from(score).unwrap_or(0),
                })
                .collect()
        }
    }
}
