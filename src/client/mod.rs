//! Leaderboard client boundary
//!
//! The submission gate and display consumers talk to the leaderboard only
//! through [`LeaderboardClient`]. The HTTP implementation can be swapped
//! for an in-memory one in tests.

use async_trait::async_trait;
use thiserror::Error;

use crate::protocol::LeaderboardEntry;

pub mod http;
pub mod poller;

pub use http::HttpLeaderboardClient;
pub use poller::LeaderboardPoller;

/// Error type for client operations
#[derive(Debug, Error)]
pub enum ClientError {
    /// Server refused the payload shape
    #[error("submission rejected: {0}")]
    Rejected(String),

    /// Non-success status other than a rejection
    #[error("unexpected status: {0}")]
    Status(u16),

    /// Connection failed
    #[error("connection failed: {0}")]
    Connection(String),

    /// Timeout
    #[error("timeout")]
    Timeout,

    /// Response body could not be read or parsed
    #[error("invalid response: {0}")]
    Decode(String),

    /// Request could not be built
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

impl ClientError {
    /// Transient failures may succeed if attempted again later
    pub fn is_transient(&self) -> bool {
        !matches!(self, ClientError::Rejected(_) | ClientError::InvalidRequest(_))
    }
}

/// Network boundary to the leaderboard service
#[async_trait]
pub trait LeaderboardClient: Send + Sync {
    /// Store one completed run
    async fn submit(&self, name: &str, score: u32) -> Result<(), ClientError>;

    /// Read the ranked Top-N. `None` lets the server pick its default.
    async fn fetch_top(&self, limit: Option<usize>) -> Result<Vec<LeaderboardEntry>, ClientError>;
}
