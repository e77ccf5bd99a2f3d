//! Wire types for the leaderboard API and player commands

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::config::{MAX_NAME_LEN, MIN_NAME_LEN};
use crate::game::direction::Direction;
use crate::game::engine::RunStatus;
use crate::game::location::Cell;

/// Player intents, parsed from raw key or command names
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Direction change, goes through the input buffer
    Steer(Direction),
    /// Toggle running/paused
    TogglePause,
    /// Start a fresh run
    Restart,
}

impl Command {
    /// Parse a command from a string
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();

        if let Some(dir) = Direction::from_str(s) {
            return Some(Command::Steer(dir));
        }

        match s.to_lowercase().as_str() {
            "space" | "pause" => Some(Command::TogglePause),
            "enter" | "restart" | "start" => Some(Command::Restart),
            _ => None,
        }
    }
}

/// Renderable view of a game
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GameSnapshot {
    pub snake: Vec<Cell>,
    pub food: Cell,
    pub score: u32,
    pub status: RunStatus,
}

/// One leaderboard row as seen by clients
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub name: String,
    pub score: u32,
}

/// Validated body of a score submission
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreSubmission {
    pub name: String,
    pub score: u32,
}

/// Error body returned by the API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub message: String,
}

impl ErrorBody {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }
}

/// Why a submission payload was rejected
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("payload is not a JSON object")]
    NotAnObject,
    #[error("name must be a string of 1-16 characters")]
    Name,
    #[error("score must be a non-negative integer")]
    Score,
}

impl ScoreSubmission {
    /// Schema check over an untyped payload
    pub fn validate(payload: &Value) -> Result<Self, ValidationError> {
        let object = payload.as_object().ok_or(ValidationError::NotAnObject)?;

        let name = object
            .get("name")
            .and_then(Value::as_str)
            .ok_or(ValidationError::Name)?;
        let len = name.chars().count();
        if !(MIN_NAME_LEN..=MAX_NAME_LEN).contains(&len) {
            return Err(ValidationError::Name);
        }

        // Integral floats such as 12.0 count as integers
        let score = match object.get("score") {
            Some(Value::Number(n)) => n
                .as_u64()
                .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0 && *f >= 0.0).map(|f| f as u64)),
            _ => None,
        }
        .and_then(|s| u32::try_from(s).ok())
        .ok_or(ValidationError::Score)?;

        Ok(Self {
            name: name.to_string(),
            score,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_direction() {
        assert_eq!(Command::parse("up"), Some(Command::Steer(Direction::Up)));
        assert_eq!(Command::parse(" ArrowDown "), Some(Command::Steer(Direction::Down)));
        assert_eq!(Command::parse("a"), Some(Command::Steer(Direction::Left)));
    }

    #[test]
    fn test_parse_controls() {
        assert_eq!(Command::parse("Space"), Some(Command::TogglePause));
        assert_eq!(Command::parse("restart"), Some(Command::Restart));
        assert_eq!(Command::parse("jump"), None);
    }

    #[test]
    fn test_valid_submission() {
        let payload = json!({ "name": "Ada", "score": 12 });
        assert_eq!(
            ScoreSubmission::validate(&payload),
            Ok(ScoreSubmission { name: "Ada".into(), score: 12 })
        );

        let payload = json!({ "name": "Ada", "score": 3.0 });
        assert_eq!(ScoreSubmission::validate(&payload).map(|s| s.score), Ok(3));
    }

    #[test]
    fn test_name_rules() {
        for name in [json!(""), json!("x".repeat(17)), json!(42), Value::Null] {
            let payload = json!({ "name": name, "score": 1 });
            assert_eq!(ScoreSubmission::validate(&payload), Err(ValidationError::Name));
        }

        let payload = json!({ "name": "名".repeat(16), "score": 1 });
        assert!(ScoreSubmission::validate(&payload).is_ok());
    }

    #[test]
    fn test_score_rules() {
        for score in [json!(-1), json!(1.5), json!("7"), Value::Null] {
            let payload = json!({ "name": "Ada", "score": score });
            assert_eq!(ScoreSubmission::validate(&payload), Err(ValidationError::Score));
        }
        assert_eq!(
            ScoreSubmission::validate(&json!({ "name": "Ada" })),
            Err(ValidationError::Score)
        );
    }

    #[test]
    fn test_not_an_object() {
        assert_eq!(
            ScoreSubmission::validate(&json!([1, 2])),
            Err(ValidationError::NotAnObject)
        );
    }

    #[test]
    fn test_snapshot_json() {
        let snapshot = GameSnapshot {
            snake: vec![Cell::new(1, 2)],
            food: Cell::new(3, 4),
            score: 0,
            status: RunStatus::Paused,
        };
        let json = serde_json::to_string(&snapshot).unwrap();
        assert_eq!(
            json,
            r#"{"snake":[{"x":1,"y":2}],"food":{"x":3,"y":4},"score":0,"status":"paused"}"#
        );
    }
}
