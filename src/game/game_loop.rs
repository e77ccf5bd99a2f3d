//! Tick driver - advances a game session at a fixed period

use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Duration, Instant, MissedTickBehavior};
use tracing::{debug, info};

use super::engine::{Game, RunStatus};
use crate::client::LeaderboardClient;
use crate::config::GameConfig;
use crate::protocol::{Command, GameSnapshot};
use crate::submission::{GateOutcome, SubmissionGate};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// A game plus the machinery around it: tick driver, submission gate and
/// snapshot channel.
///
/// The driver runs only while the game is `running`. It is stopped on
/// pause, game over and drop, and restarted when the game runs again.
/// Methods that may start the driver must be called inside a tokio runtime.
pub struct GameSession {
    game: Mutex<Game>,
    gate: SubmissionGate,
    player_name: Mutex<String>,
    tick: Duration,
    driver: Mutex<Option<JoinHandle<()>>>,
    snapshots: watch::Sender<GameSnapshot>,
}

impl GameSession {
    /// Create a session around an idle game
    pub fn new(config: GameConfig, client: Arc<dyn LeaderboardClient>) -> Arc<Self> {
        Self::from_game(Game::new(config.grid), config, client)
    }

    /// Create a session around an existing game. Call [`drive`](Self::drive)
    /// to start ticking if it is already running.
    pub fn from_game(game: Game, config: GameConfig, client: Arc<dyn LeaderboardClient>) -> Arc<Self> {
        let (snapshots, _) = watch::channel(game.snapshot());
        Arc::new(Self {
            game: Mutex::new(game),
            gate: SubmissionGate::new(client, config.submit_debounce, config.default_name),
            player_name: Mutex::new(String::new()),
            tick: config.tick,
            driver: Mutex::new(None),
            snapshots,
        })
    }

    pub fn set_player_name(&self, name: impl Into<String>) {
        *lock(&self.player_name) = name.into();
    }

    pub fn status(&self) -> RunStatus {
        lock(&self.game).status()
    }

    pub fn snapshot(&self) -> GameSnapshot {
        lock(&self.game).snapshot()
    }

    /// Receive a snapshot after every state change
    pub fn subscribe(&self) -> watch::Receiver<GameSnapshot> {
        self.snapshots.subscribe()
    }

    pub fn gate(&self) -> &SubmissionGate {
        &self.gate
    }

    /// Reset everything for a new run and start ticking
    pub fn start(self: &Arc<Self>) {
        {
            let mut game = lock(&self.game);
            game.restart();
            self.gate.reset();
            self.snapshots.send_replace(game.snapshot());
        }
        info!("Run started");
        self.drive();
    }

    /// Apply a player command
    pub fn handle(self: &Arc<Self>, command: Command) -> bool {
        match command {
            Command::Restart => {
                self.start();
                true
            }
            Command::Steer(direction) => lock(&self.game).steer(direction),
            Command::TogglePause => {
                let status = {
                    let mut game = lock(&self.game);
                    if !game.toggle_pause() {
                        return false;
                    }
                    self.snapshots.send_replace(game.snapshot());
                    game.status()
                };
                if status == RunStatus::Running {
                    debug!("Resumed");
                    self.drive();
                } else {
                    debug!("Paused");
                    self.stop();
                }
                true
            }
        }
    }

    /// Start the tick driver if the game is running, replacing any
    /// previous driver
    pub fn drive(self: &Arc<Self>) {
        let mut driver = lock(&self.driver);
        if let Some(handle) = driver.take() {
            handle.abort();
        }
        if self.status() != RunStatus::Running {
            return;
        }

        let session = Arc::downgrade(self);
        let period = self.tick;
        *driver = Some(tokio::spawn(async move {
            let mut ticker = interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                ticker.tick().await;
                if !Self::step(&session) {
                    break;
                }
            }
        }));
    }

    /// Stop the tick driver
    pub fn stop(&self) {
        if let Some(handle) = lock(&self.driver).take() {
            handle.abort();
        }
    }

    /// Run one tick. Returns whether the driver should keep going.
    fn step(session: &Weak<Self>) -> bool {
        let Some(session) = session.upgrade() else {
            return false;
        };

        // Status is read from the game itself on every tick. The run id is
        // taken under the same lock so a restart cannot claim this score.
        let (outcome, score, run) = {
            let mut game = lock(&session.game);
            if game.status() != RunStatus::Running {
                return false;
            }
            let outcome = game.tick();
            session.snapshots.send_replace(game.snapshot());
            (outcome, game.score(), session.gate.run_id())
        };

        if !outcome.is_terminal() {
            return true;
        }

        info!("Run over with score {} ({:?})", score, outcome);
        let name = lock(&session.player_name).clone();
        if let GateOutcome::Skipped(reason) = session.gate.on_run_over_for(run, &name, score) {
            debug!("Submission skipped: {:?}", reason);
        }
        false
    }

    /// Re-trigger the submission gate for a finished run
    pub fn retry_submission(&self) -> Option<GateOutcome> {
        let (status, score, run) = {
            let game = lock(&self.game);
            (game.status(), game.score(), self.gate.run_id())
        };
        if status != RunStatus::Over {
            return None;
        }
        let name = lock(&self.player_name).clone();
        Some(self.gate.on_run_over_for(run, &name, score))
    }

    pub fn is_ticking(&self) -> bool {
        lock(&self.driver).as_ref().is_some_and(|h| !h.is_finished())
    }
}

impl Drop for GameSession {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::ClientError;
    use crate::game::direction::Direction;
    use crate::game::location::{Cell, Grid};
    use crate::game::snake::Snake;
    use crate::protocol::LeaderboardEntry;
    use crate::submission::SkipReason;
    use async_trait::async_trait;
    use tokio::sync::Notify;

    const TICK: Duration = Duration::from_millis(120);

    #[derive(Default)]
    struct RecordingClient {
        calls: Mutex<Vec<(String, u32)>>,
        /// When set, submit waits for a notification before returning
        hold: Option<Arc<Notify>>,
    }

    #[async_trait]
    impl LeaderboardClient for RecordingClient {
        async fn submit(&self, name: &str, score: u32) -> Result<(), ClientError> {
            self.calls.lock().unwrap().push((name.to_string(), score));
            if let Some(hold) = &self.hold {
                hold.notified().await;
            }
            Ok(())
        }

        async fn fetch_top(&self, _limit: Option<usize>) -> Result<Vec<LeaderboardEntry>, ClientError> {
            Ok(Vec::new())
        }
    }

    fn session_near_wall(client: Arc<RecordingClient>) -> Arc<GameSession> {
        // Eats at (18,0), reaches (19,0), hits the wall on the third tick
        let game = Game::running_from(
            Grid::new(20, 20),
            Snake::new(Cell::new(17, 0)),
            Direction::Right,
            Cell::new(18, 0),
            1,
        );
        GameSession::from_game(game, GameConfig::default(), client)
    }

    async fn ticks(n: u32) {
        tokio::time::sleep(TICK * n + Duration::from_millis(10)).await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_driver_advances_once_per_tick() {
        let session = GameSession::new(GameConfig::default(), Arc::new(RecordingClient::default()));
        session.start();

        ticks(3).await;
        assert_eq!(session.snapshot().snake, vec![Cell::new(13, 10)]);
        assert!(session.is_ticking());
    }

    #[tokio::test(start_paused = true)]
    async fn test_pause_suspends_ticking() {
        let session = GameSession::new(GameConfig::default(), Arc::new(RecordingClient::default()));
        session.start();
        ticks(1).await;

        assert!(session.handle(Command::Steer(Direction::Up)));
        assert!(session.handle(Command::TogglePause));
        assert!(!session.is_ticking());

        ticks(5).await;
        let paused = session.snapshot();
        assert_eq!(paused.status, RunStatus::Paused);
        assert_eq!(paused.snake, vec![Cell::new(11, 10)]);

        // Resumes on the queued direction
        assert!(session.handle(Command::TogglePause));
        ticks(1).await;
        assert_eq!(session.snapshot().snake, vec![Cell::new(11, 9)]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_game_over_submits_once() {
        let client = Arc::new(RecordingClient::default());
        let session = session_near_wall(client.clone());
        session.set_player_name("  Ada ");
        session.drive();

        ticks(4).await;
        tokio::task::yield_now().await;

        let snapshot = session.snapshot();
        assert_eq!(snapshot.status, RunStatus::Over);
        assert!(snapshot.score >= 1);
        assert!(!session.is_ticking());
        assert_eq!(*client.calls.lock().unwrap(), vec![("Ada".to_string(), snapshot.score)]);

        // A redundant terminal notification does not submit again
        ticks(10).await;
        assert!(matches!(session.retry_submission(), Some(GateOutcome::Skipped(_))));
        assert_eq!(client.calls.lock().unwrap().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_score_run_not_submitted() {
        let client = Arc::new(RecordingClient::default());
        let session = GameSession::new(GameConfig::default(), client.clone());
        session.start();

        // From (10,10) heading right the wall is 10 ticks away
        ticks(12).await;
        assert_eq!(session.status(), RunStatus::Over);
        assert!(client.calls.lock().unwrap().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_restart_clears_submission_state() {
        let client = Arc::new(RecordingClient::default());
        let session = session_near_wall(client.clone());
        session.drive();
        ticks(4).await;
        tokio::task::yield_now().await;
        assert!(session.gate().state().has_submitted);

        assert!(session.handle(Command::Restart));
        assert!(!session.gate().state().has_submitted);
        assert_eq!(session.status(), RunStatus::Running);
        assert_eq!(session.snapshot().score, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_restart_during_submission_keeps_runs_apart() {
        let hold = Arc::new(Notify::new());
        let client = Arc::new(RecordingClient {
            hold: Some(hold.clone()),
            ..RecordingClient::default()
        });
        let session = session_near_wall(client.clone());
        session.drive();
        ticks(4).await;
        tokio::task::yield_now().await;
        assert_eq!(session.status(), RunStatus::Over);
        assert!(session.gate().state().in_flight);

        // Restart before the ended run's submission settles
        assert!(session.handle(Command::Restart));
        hold.notify_one();
        tokio::time::sleep(Duration::from_millis(1)).await;

        let state = session.gate().state();
        assert!(!state.has_submitted);
        assert!(!state.in_flight);
        assert_eq!(client.calls.lock().unwrap().len(), 1);

        // An ended run's score offered after the restart is not sent
        let ended = session.gate().run_id() - 1;
        assert!(matches!(
            session.gate().on_run_over_for(ended, "Ada", 9),
            GateOutcome::Skipped(SkipReason::StaleRun)
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn test_snapshots_published() {
        let session = GameSession::new(GameConfig::default(), Arc::new(RecordingClient::default()));
        let mut rx = session.subscribe();
        session.start();

        rx.changed().await.unwrap();
        assert_eq!(rx.borrow_and_update().status, RunStatus::Running);

        rx.changed().await.unwrap();
        assert_eq!(rx.borrow().snake, vec![Cell::new(11, 10)]);
    }
}
