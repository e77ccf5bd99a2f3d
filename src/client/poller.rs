//! Periodic leaderboard refresh for display consumers

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tracing::warn;

use super::LeaderboardClient;
use crate::protocol::LeaderboardEntry;

/// Background task that keeps the latest Top-N in a watch channel.
///
/// A failed fetch keeps the previous list. The task stops when the poller
/// is dropped.
pub struct LeaderboardPoller {
    rx: watch::Receiver<Vec<LeaderboardEntry>>,
    handle: JoinHandle<()>,
}

impl LeaderboardPoller {
    /// Spawn the poll loop; the first fetch happens immediately
    pub fn spawn(client: Arc<dyn LeaderboardClient>, limit: Option<usize>, period: Duration) -> Self {
        let (tx, rx) = watch::channel(Vec::new());

        let handle = tokio::spawn(async move {
            let mut ticker = interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                ticker.tick().await;

                match client.fetch_top(limit).await {
                    Ok(list) => {
                        tx.send_replace(list);
                    }
                    Err(e) => warn!("Failed to fetch leaderboard: {}", e),
                }
            }
        });

        Self { rx, handle }
    }

    /// Subscribe to list updates
    pub fn subscribe(&self) -> watch::Receiver<Vec<LeaderboardEntry>> {
        self.rx.clone()
    }

    /// Most recently fetched list
    pub fn latest(&self) -> Vec<LeaderboardEntry> {
        self.rx.borrow().clone()
    }
}

impl Drop for LeaderboardPoller {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
