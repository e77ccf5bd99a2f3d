//! Tick-driven simulation: snake movement, growth and collisions

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;

use super::direction::Direction;
use super::input::InputBuffer;
use super::location::{Cell, Grid};
use super::snake::Snake;
use crate::config::{INITIAL_DIRECTION, INITIAL_FOOD, INITIAL_SNAKE};
use crate::protocol::{Command, GameSnapshot};

/// Lifecycle of a single run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RunStatus {
    Idle,
    Running,
    Paused,
    Over,
}

impl RunStatus {
    /// A fresh run may only start from these states
    pub fn can_start(&self) -> bool {
        matches!(self, RunStatus::Idle | RunStatus::Over)
    }
}

/// What ended a run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collision {
    Wall,
    Body,
}

/// Result of one call to [`Game::tick`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Not running; nothing happened
    Skipped,
    /// Snake moved one cell, length unchanged
    Moved,
    /// Snake ate and grew; food relocated
    Ate,
    /// Run ended on a collision; snake unchanged
    Collided(Collision),
    /// Snake ate the last free cell; run ended
    BoardFull,
}

impl TickOutcome {
    pub fn is_terminal(&self) -> bool {
        matches!(self, TickOutcome::Collided(_) | TickOutcome::BoardFull)
    }
}

/// A single-player snake run
#[derive(Debug, Clone)]
pub struct Game {
    grid: Grid,
    snake: Snake,
    food: Cell,
    score: u32,
    direction: Direction,
    input: InputBuffer,
    status: RunStatus,
    rng: StdRng,
}

impl Game {
    /// Create an idle game seeded from system entropy
    pub fn new(grid: Grid) -> Self {
        Self::with_rng(grid, StdRng::from_entropy())
    }

    /// Create an idle game with a fixed food-placement seed
    pub fn with_seed(grid: Grid, seed: u64) -> Self {
        Self::with_rng(grid, StdRng::seed_from_u64(seed))
    }

    fn with_rng(grid: Grid, rng: StdRng) -> Self {
        Self {
            grid,
            snake: Snake::new(INITIAL_SNAKE),
            food: INITIAL_FOOD,
            score: 0,
            direction: INITIAL_DIRECTION,
            input: InputBuffer::new(),
            status: RunStatus::Idle,
            rng,
        }
    }

    /// Start a run from an explicit position
    pub fn running_from(
        grid: Grid,
        snake: Snake,
        direction: Direction,
        food: Cell,
        seed: u64,
    ) -> Self {
        Self {
            grid,
            snake,
            food,
            score: 0,
            direction,
            input: InputBuffer::new(),
            status: RunStatus::Running,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn grid(&self) -> Grid {
        self.grid
    }

    pub fn snake(&self) -> &Snake {
        &self.snake
    }

    pub fn food(&self) -> Cell {
        self.food
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    /// Direction applied on the most recent tick
    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn pending_moves(&self) -> usize {
        self.input.len()
    }

    pub fn status(&self) -> RunStatus {
        self.status
    }

    /// Reset everything for a new run and start running
    pub fn restart(&mut self) {
        self.snake.reset(INITIAL_SNAKE);
        self.food = INITIAL_FOOD;
        self.score = 0;
        self.direction = INITIAL_DIRECTION;
        self.input.clear();
        self.status = RunStatus::Running;
    }

    /// Queue a direction change. Dropped unless running.
    pub fn steer(&mut self, direction: Direction) -> bool {
        if self.status != RunStatus::Running {
            return false;
        }
        self.input.enqueue(direction, self.direction)
    }

    /// Toggle `running ⇄ paused`. No-op in any other state.
    pub fn toggle_pause(&mut self) -> bool {
        match self.status {
            RunStatus::Running => self.status = RunStatus::Paused,
            RunStatus::Paused => self.status = RunStatus::Running,
            RunStatus::Idle | RunStatus::Over => return false,
        }
        true
    }

    pub fn pause(&mut self) -> bool {
        self.status == RunStatus::Running && self.toggle_pause()
    }

    pub fn resume(&mut self) -> bool {
        self.status == RunStatus::Paused && self.toggle_pause()
    }

    /// Apply a parsed player command. Returns whether it had any effect.
    pub fn apply(&mut self, command: Command) -> bool {
        match command {
            Command::Steer(direction) => self.steer(direction),
            Command::TogglePause => self.toggle_pause(),
            Command::Restart => {
                self.restart();
                true
            }
        }
    }

    /// Advance the simulation by exactly one step
    pub fn tick(&mut self) -> TickOutcome {
        if self.status != RunStatus::Running {
            return TickOutcome::Skipped;
        }

        if let Some(next) = self.input.pop() {
            self.direction = next;
        }

        let new_head = self.snake.head().step(self.direction);

        if !self.grid.in_bounds(&new_head) {
            self.status = RunStatus::Over;
            return TickOutcome::Collided(Collision::Wall);
        }

        let will_eat = new_head == self.food;

        if self.snake.collides(&new_head, will_eat) {
            self.status = RunStatus::Over;
            return TickOutcome::Collided(Collision::Body);
        }

        self.snake.advance(new_head, will_eat);

        if !will_eat {
            return TickOutcome::Moved;
        }

        self.score += 1;
        match self.grid.random_free_cell(&mut self.rng, &self.snake.occupied()) {
            Some(cell) => {
                self.food = cell;
                TickOutcome::Ate
            }
            None => {
                self.status = RunStatus::Over;
                TickOutcome::BoardFull
            }
        }
    }

    /// Convert to a snapshot for renderers
    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            snake: self.snake.body().iter().copied().collect(),
            food: self.food,
            score: self.score,
            status: self.status,
        }
    }
}
