//! Score submission gate
//!
//! Wraps the terminal transition of a run so that at most one submission
//! succeeds and at most one is outstanding at any time. Failed attempts
//! are not retried automatically; the host may trigger the gate again.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::client::LeaderboardClient;

/// Per-run submission flags
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubmissionState {
    /// Sticky once a submission succeeded for this run
    pub has_submitted: bool,
    /// A submission call is outstanding
    pub in_flight: bool,
    /// Last time an attempt got past the debounce check
    pub last_attempt_at: Option<Instant>,
    /// Run generation, bumped on every reset
    run: u64,
}

/// Why the gate declined to submit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    ZeroScore,
    AlreadySubmitted,
    Debounced,
    InFlight,
    /// The run that ended has since been replaced by a restart
    StaleRun,
}

/// Result of triggering the gate
#[derive(Debug)]
pub enum GateOutcome {
    Skipped(SkipReason),
    /// Submission started; resolves to whether it succeeded
    Dispatched(JoinHandle<bool>),
}

impl GateOutcome {
    pub fn is_dispatched(&self) -> bool {
        matches!(self, GateOutcome::Dispatched(_))
    }
}

/// Trim the player name, falling back to `default` when blank
pub fn player_label(name: &str, default: &str) -> String {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        default.to_string()
    } else {
        trimmed.to_string()
    }
}

/// At-most-once score submission for a single run at a time
pub struct SubmissionGate {
    client: Arc<dyn LeaderboardClient>,
    state: Arc<Mutex<SubmissionState>>,
    debounce: Duration,
    default_name: String,
}

impl SubmissionGate {
    pub fn new(client: Arc<dyn LeaderboardClient>, debounce: Duration, default_name: impl Into<String>) -> Self {
        Self {
            client,
            state: Arc::new(Mutex::new(SubmissionState::default())),
            debounce,
            default_name: default_name.into(),
        }
    }

    fn lock(state: &Mutex<SubmissionState>) -> MutexGuard<'_, SubmissionState> {
        state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Current flags
    pub fn state(&self) -> SubmissionState {
        Self::lock(&self.state).clone()
    }

    /// Clear flags for a new run. A call still settling from the previous
    /// run will not touch the new run's state.
    pub fn reset(&self) {
        let mut state = Self::lock(&self.state);
        let run = state.run.wrapping_add(1);
        *state = SubmissionState {
            run,
            ..SubmissionState::default()
        };
    }

    /// Generation of the current run
    pub fn run_id(&self) -> u64 {
        Self::lock(&self.state).run
    }

    /// Handle a terminal transition of the current run
    pub fn on_run_over(&self, name: &str, score: u32) -> GateOutcome {
        self.on_run_over_for(self.run_id(), name, score)
    }

    /// Handle a terminal transition of run `run` with its final score.
    ///
    /// Skipped when the gate has been reset since `run` was read. Must be
    /// called from within a tokio runtime; the call itself runs on a
    /// spawned task so the caller never waits on the network.
    pub fn on_run_over_for(&self, run: u64, name: &str, score: u32) -> GateOutcome {
        if score == 0 {
            return GateOutcome::Skipped(SkipReason::ZeroScore);
        }

        {
            let mut state = Self::lock(&self.state);

            if state.run != run {
                return GateOutcome::Skipped(SkipReason::StaleRun);
            }
            if state.has_submitted {
                return GateOutcome::Skipped(SkipReason::AlreadySubmitted);
            }

            let now = Instant::now();
            if let Some(last) = state.last_attempt_at {
                if now.duration_since(last) < self.debounce {
                    debug!("Submission debounced");
                    return GateOutcome::Skipped(SkipReason::Debounced);
                }
            }
            state.last_attempt_at = Some(now);

            if state.in_flight {
                return GateOutcome::Skipped(SkipReason::InFlight);
            }
            state.in_flight = true;
        }

        let name = player_label(name, &self.default_name);
        let client = self.client.clone();
        let state = self.state.clone();

        let handle = tokio::spawn(async move {
            let result = client.submit(&name, score).await;

            let mut state = Self::lock(&state);
            let current_run = state.run == run;

            match result {
                Ok(()) => {
                    info!("Submitted score {} for {}", score, name);
                    if current_run {
                        state.has_submitted = true;
                    }
                }
                Err(ref e) => warn!("Score submission for {} failed: {}", name, e),
            }
            if current_run {
                state.in_flight = false;
            }

            result.is_ok()
        });

        GateOutcome::Dispatched(handle)
    }
}
