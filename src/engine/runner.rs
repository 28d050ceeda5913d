//! Episode runner - the exploring/terminated/resetting loop
//!
//! Drives one agent through a configured number of episodes against a
//! simulator, recording each episode's path and feeding it through the
//! value-table update rule either per step or via reverse replay at
//! episode end.

use serde::{Deserialize, Serialize};

use crate::{
    engine::path::{Path, Transition},
    ports::{RunObserver, Simulator},
    q_learning::QLearningAgent,
    types::Position,
    Result,
};

/// When value-table updates are applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UpdateMode {
    /// Replay the full path in reverse at episode end. The terminal
    /// reward propagates backward through the whole path in one pass.
    Episodic,
    /// Update immediately after every move.
    Stepwise,
}

/// How an episode ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Terminal {
    /// The goal tile was reached.
    Goal,
    /// An absorbing non-goal target tile was entered.
    Target,
}

/// Runner configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunConfig {
    /// Number of episodes to run
    pub episodes: usize,

    /// When updates are applied
    pub update_mode: UpdateMode,

    /// Color used to mark visited tiles
    pub mark_color: String,

    /// Render the greedy policy as directional arrows after each episode
    pub draw_policy_arrows: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            episodes: 50,
            update_mode: UpdateMode::Episodic,
            mark_color: "coral".to_string(),
            draw_policy_arrows: false,
        }
    }
}

/// Result of one completed episode
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EpisodeSummary {
    /// Moves executed before termination
    pub steps: usize,
    /// Which terminal tile ended the episode
    pub terminal: Terminal,
}

/// Result of a full run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    pub episodes: usize,
    pub total_steps: usize,
    pub goal_terminations: usize,
    pub target_terminations: usize,
    pub avg_episode_steps: f64,
}

impl RunSummary {
    fn new(episode_summaries: &[EpisodeSummary]) -> Self {
        let episodes = episode_summaries.len();
        let total_steps: usize = episode_summaries.iter().map(|s| s.steps).sum();
        let goal_terminations = episode_summaries
            .iter()
            .filter(|s| s.terminal == Terminal::Goal)
            .count();
        Self {
            episodes,
            total_steps,
            goal_terminations,
            target_terminations: episodes - goal_terminations,
            avg_episode_steps: if episodes > 0 {
                total_steps as f64 / episodes as f64
            } else {
                0.0
            },
        }
    }

    /// Save the summary to a JSON file
    pub fn save<P: AsRef<std::path::Path>>(&self, path: P) -> Result<()> {
        let file = std::fs::File::create(path)?;
        serde_json::to_writer_pretty(file, self)?;
        Ok(())
    }
}

/// Drives learning episodes against a simulator.
pub struct EpisodeRunner {
    config: RunConfig,
    observers: Vec<Box<dyn RunObserver>>,
}

impl EpisodeRunner {
    pub fn new(config: RunConfig) -> Self {
        Self {
            config,
            observers: Vec::new(),
        }
    }

    /// Add an observer to the runner
    pub fn with_observer(mut self, observer: Box<dyn RunObserver>) -> Self {
        self.observers.push(observer);
        self
    }

    /// Run the configured number of episodes.
    ///
    /// Every transport, bootstrap, and trapped-agent error propagates;
    /// only the visited-mark cleanup at episode end is best-effort.
    pub fn run(
        &mut self,
        agent: &mut QLearningAgent,
        sim: &mut dyn Simulator,
    ) -> Result<RunSummary> {
        for observer in &mut self.observers {
            observer.on_run_start(self.config.episodes)?;
        }

        let mut summaries = Vec::with_capacity(self.config.episodes);
        for episode in 0..self.config.episodes {
            for observer in &mut self.observers {
                observer.on_episode_start(episode)?;
            }

            let summary = self.run_episode(episode, agent, sim)?;

            for observer in &mut self.observers {
                observer.on_episode_end(episode, &summary)?;
            }
            summaries.push(summary);

            // Resetting: send the agent home for the next episode.
            sim.go_home()?;
            agent.begin_episode();
            let home = sim.position()?;
            sim.mark(home, &self.config.mark_color)?;
        }

        for observer in &mut self.observers {
            observer.on_run_end()?;
        }

        Ok(RunSummary::new(&summaries))
    }

    /// One pass of the exploring/terminated state machine.
    fn run_episode(
        &mut self,
        episode: usize,
        agent: &mut QLearningAgent,
        sim: &mut dyn Simulator,
    ) -> Result<EpisodeSummary> {
        agent.begin_episode();
        let mut path = Path::new();

        // Exploring: tick until a terminal tile is read back.
        let terminal = loop {
            let pos = sim.position()?;
            if agent.world().is_goal(pos) {
                break Terminal::Goal;
            }
            if agent.world().is_target(pos) {
                break Terminal::Target;
            }

            let direction = agent.choose_direction(pos)?;
            sim.move_toward(direction)?;
            let new_pos = sim.position()?;
            let reward = agent.world().reward_at(new_pos);

            let transition = Transition::new(pos, new_pos, direction, reward);
            path.record(transition);
            sim.mark(new_pos, &self.config.mark_color)?;

            let step = path.len() - 1;
            for observer in &mut self.observers {
                observer.on_step(episode, step, &transition)?;
            }

            if self.config.update_mode == UpdateMode::Stepwise {
                agent.apply_update(&transition);
                self.notify_value_updated(agent, &transition)?;
            }
        };

        // Terminated: reverse replay in episodic mode, then clean up
        // the visited marks.
        if self.config.update_mode == UpdateMode::Episodic {
            for transition in path.iter_reverse() {
                agent.apply_update(transition);
                self.notify_value_updated(agent, transition)?;
            }
        }

        for pos in path.visited() {
            if let Err(err) = sim.unmark(pos) {
                eprintln!("warning: failed to unmark {pos}: {err}");
            }
        }

        if self.config.draw_policy_arrows {
            self.draw_policy_arrows(agent, sim)?;
        }

        Ok(EpisodeSummary {
            steps: path.len(),
            terminal,
        })
    }

    fn notify_value_updated(
        &mut self,
        agent: &QLearningAgent,
        transition: &Transition,
    ) -> Result<()> {
        let value = agent.values().value(transition.from, transition.action);
        for observer in &mut self.observers {
            observer.on_value_updated(transition.from, transition.action, value)?;
        }
        Ok(())
    }

    /// Render the greedy direction of every visitable non-goal cell
    /// holding a learned value. Cells whose best value is still 0 stay
    /// blank.
    fn draw_policy_arrows(
        &mut self,
        agent: &QLearningAgent,
        sim: &mut dyn Simulator,
    ) -> Result<()> {
        let world = agent.world();
        for x in 0..world.width() {
            for y in 0..world.height() {
                let pos = Position::new(x, y);
                if !world.is_visitable(pos) || world.is_goal(pos) {
                    continue;
                }
                if agent.values().max_value(pos) == 0.0 {
                    continue;
                }
                let best = agent.values().best_direction(pos);
                sim.place_arrow(best, pos)?;
            }
        }
        Ok(())
    }
}
