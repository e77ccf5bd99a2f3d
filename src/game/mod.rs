//! Game module

pub mod direction;
pub mod engine;
pub mod game_loop;
pub mod input;
pub mod location;
pub mod snake;

pub use direction::Direction;
pub use engine::{Collision, Game, RunStatus, TickOutcome};
pub use game_loop::GameSession;
pub use input::InputBuffer;
pub use location::{Cell, Grid};
pub use snake::Snake;
