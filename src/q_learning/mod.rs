//! Tabular Q-learning for the grid world
//!
//! The value table maps every (cell, direction) pair to a learned
//! scalar. The policy is ε-greedy over the legal neighbours of the
//! current cell, with an anti-backtrack heuristic that keeps
//! exploration from oscillating between two cells. The agent composes
//! world model, value table, policy, and a seedable RNG.
//!
//! With the default α = 1 the update degenerates to full replacement by
//! the bootstrapped target, which propagates terminal reward quickly in
//! a deterministic world.

pub mod agent;
pub mod policy;
pub mod value_table;

pub use agent::{LearningConfig, QLearningAgent};
pub use policy::{ActionPolicy, GreedyScope};
pub use value_table::ValueTable;
