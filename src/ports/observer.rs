//! Observer port - abstraction for run observation and data collection
//!
//! Observers can be composed to collect different kinds of data while
//! the agent learns, without coupling the episode loop to specific
//! output formats. The value-update hook exists so rendering or
//! analysis can follow individual table updates without the update
//! rule itself knowing about either.
//!
//! # Event sequence
//!
//! 1. `on_run_start(total_episodes)` - once at the beginning
//! 2. For each episode:
//!    - `on_episode_start(episode)`
//!    - `on_step(...)` - for each transition
//!    - `on_value_updated(...)` - after each table update
//!    - `on_episode_end(episode, summary)`
//! 3. `on_run_end()` - once at the end

use crate::{
    engine::path::Transition,
    engine::runner::EpisodeSummary,
    types::{Direction, Position},
    Result,
};

/// Observer trait for monitoring a learning run.
///
/// All methods default to no-ops; implementations override what they
/// care about.
pub trait RunObserver: Send {
    /// Called once before the first episode.
    fn on_run_start(&mut self, _total_episodes: usize) -> Result<()> {
        Ok(())
    }

    /// Called when an episode starts (0-based index).
    fn on_episode_start(&mut self, _episode: usize) -> Result<()> {
        Ok(())
    }

    /// Called after each executed move, before any learning update for
    /// that move is applied in episodic mode.
    fn on_step(&mut self, _episode: usize, _step: usize, _transition: &Transition) -> Result<()> {
        Ok(())
    }

    /// Called after each value-table update with the freshly written
    /// value of the (state, action) cell.
    fn on_value_updated(
        &mut self,
        _state: Position,
        _action: Direction,
        _new_value: f64,
    ) -> Result<()> {
        Ok(())
    }

    /// Called when an episode reaches a terminal tile.
    fn on_episode_end(&mut self, _episode: usize, _summary: &EpisodeSummary) -> Result<()> {
        Ok(())
    }

    /// Called once after the last episode.
    fn on_run_end(&mut self) -> Result<()> {
        Ok(())
    }
}
