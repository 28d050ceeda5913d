//! gridrover - tabular Q-learning for a remote wraparound grid world
//!
//! This crate provides:
//! - A fully populated state-action value table with the one-step
//!   Q-learning update
//! - An ε-greedy exploration policy with anti-backtrack filtering
//! - An episode runner with stepwise or reverse-replay episodic updates
//! - Simulator and observer ports with TCP and in-memory adapters

pub mod adapters;
pub mod cli;
pub mod engine;
pub mod error;
pub mod grid;
pub mod ports;
pub mod q_learning;
pub mod types;

pub use engine::{EpisodeRunner, Path, RunConfig, RunSummary, Transition, UpdateMode};
pub use error::{Error, Result};
pub use grid::{step_toward, WorldModel};
pub use q_learning::{ActionPolicy, GreedyScope, LearningConfig, QLearningAgent, ValueTable};
pub use types::{Direction, Position};
