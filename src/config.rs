//! Game and server configuration

use std::env;
use std::time::Duration;

use thiserror::Error;

use crate::game::direction::Direction;
use crate::game::location::{Cell, Grid};
use crate::leaderboard::RankingMode;

// =============================================================================
// Simulation
// =============================================================================

/// Playfield width in cells
pub const GRID_COLS: i32 = 20;

/// Playfield height in cells
pub const GRID_ROWS: i32 = 20;

/// Game tick delay in milliseconds
pub const TICK_DELAY_MS: u64 = 120;

/// Cell the single-segment snake starts on
pub const INITIAL_SNAKE: Cell = Cell::new(10, 10);

/// Cell the first food item is placed on
pub const INITIAL_FOOD: Cell = Cell::new(5, 5);

/// Direction committed at the start of every run
pub const INITIAL_DIRECTION: Direction = Direction::Right;

// =============================================================================
// Score submission
// =============================================================================

/// Minimum time between two submission attempts for the same run
pub const SUBMIT_DEBOUNCE_MS: u64 = 600;

/// Label used when the player name is blank
pub const DEFAULT_PLAYER_NAME: &str = "Player";

/// Bounds on a submitted player name, in characters
pub const MIN_NAME_LEN: usize = 1;
pub const MAX_NAME_LEN: usize = 16;

/// Timeout for a single leaderboard HTTP call
pub const CLIENT_TIMEOUT_MS: u64 = 5_000;

/// How often a display consumer refreshes the leaderboard
pub const LEADERBOARD_POLL_MS: u64 = 3_000;

// =============================================================================
// Server
// =============================================================================

/// Rows returned when the caller gives no usable limit
pub const DEFAULT_LIMIT: usize = 10;

/// Leaderboard server port
pub const SERVER_PORT: u16 = 3000;

/// Default SQLite database
pub const DEFAULT_DATABASE_URL: &str = "sqlite:leaderboard.db?mode=rwc";

/// Settings for a single-player simulation session
#[derive(Debug, Clone)]
pub struct GameConfig {
    pub grid: Grid,
    pub tick: Duration,
    pub submit_debounce: Duration,
    pub default_name: String,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            grid: Grid::new(GRID_COLS, GRID_ROWS),
            tick: Duration::from_millis(TICK_DELAY_MS),
            submit_debounce: Duration::from_millis(SUBMIT_DEBOUNCE_MS),
            default_name: DEFAULT_PLAYER_NAME.to_string(),
        }
    }
}

/// Invalid environment configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {key}: {value}")]
    Invalid { key: &'static str, value: String },
}

/// Leaderboard server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub ranking_mode: RankingMode,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: SERVER_PORT,
            database_url: DEFAULT_DATABASE_URL.to_string(),
            ranking_mode: RankingMode::default(),
        }
    }
}

impl ServerConfig {
    /// Load config from environment variables, keeping defaults for unset ones
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(host) = lookup("HOST") {
            config.host = host;
        }
        if let Some(port) = lookup("PORT") {
            config.port = port
                .parse()
                .map_err(|_| ConfigError::Invalid { key: "PORT", value: port })?;
        }
        if let Some(url) = lookup("DATABASE_URL") {
            config.database_url = url;
        }
        if let Some(mode) = lookup("RANKING_MODE") {
            config.ranking_mode = RankingMode::from_str(&mode)
                .ok_or(ConfigError::Invalid { key: "RANKING_MODE", value: mode })?;
        }

        Ok(config)
    }

    /// Full bind address
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
