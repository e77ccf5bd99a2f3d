//! Snake simulation with a ranked score leaderboard.
//!
//! The client side is a tick-driven [`game::Game`] run by a
//! [`game::GameSession`], which hands the final score of each run to a
//! [`submission::SubmissionGate`]. The server side stores submissions in
//! SQLite and ranks them on every read.

pub mod api;
pub mod client;
pub mod config;
pub mod game;
pub mod leaderboard;
pub mod protocol;
pub mod state;
pub mod submission;
