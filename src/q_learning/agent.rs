//! Q-learning agent composing world model, value table, and policy
//!
//! The agent is a composition rather than a specialization: the
//! navigation capability (the [`Simulator`](crate::ports::Simulator)
//! port) stays outside and is driven by the episode runner, while this
//! type owns everything the learning decisions need.

use rand::{rngs::StdRng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::{
    engine::path::{Path, Transition},
    grid::WorldModel,
    q_learning::{
        policy::{ActionPolicy, GreedyScope},
        value_table::ValueTable,
    },
    types::{Direction, Position},
    Result,
};

/// Learning hyperparameters, fixed at construction.
///
/// The learning loop never mutates them; in particular ε does not
/// decay.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LearningConfig {
    /// Discount factor γ
    pub gamma: f64,
    /// Learning rate α
    pub alpha: f64,
    /// Exploration rate ε
    pub epsilon: f64,
    /// Anti-backtrack heuristic during exploration
    pub no_turning_back: bool,
    /// Action set the greedy branch may pick from
    pub greedy_scope: GreedyScope,
}

impl Default for LearningConfig {
    fn default() -> Self {
        // α = 1 replaces values outright, ε = 1 explores on every
        // step.
        Self {
            gamma: 0.9,
            alpha: 1.0,
            epsilon: 1.0,
            no_turning_back: true,
            greedy_scope: GreedyScope::Candidates,
        }
    }
}

fn build_rng(seed: Option<u64>) -> StdRng {
    if let Some(seed) = seed {
        StdRng::seed_from_u64(seed)
    } else {
        StdRng::from_rng(&mut rand::rng())
    }
}

/// Tabular Q-learning agent for one grid world.
///
/// The value table covers every cell of the world at construction and
/// accumulates learning across episodes.
#[derive(Debug, Clone)]
pub struct QLearningAgent {
    world: WorldModel,
    values: ValueTable,
    policy: ActionPolicy,
    last_direction: Option<Direction>,
    rng: StdRng,
}

impl QLearningAgent {
    /// Create an agent for `world` with the given hyperparameters.
    pub fn new(world: WorldModel, config: LearningConfig) -> Self {
        let values = ValueTable::new(world.width(), world.height(), config.alpha, config.gamma);
        let policy = ActionPolicy::new(config.epsilon, config.no_turning_back, config.greedy_scope);
        Self {
            world,
            values,
            policy,
            last_direction: None,
            rng: build_rng(None),
        }
    }

    /// Seed the agent's RNG for reproducible action sequences.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    pub fn world(&self) -> &WorldModel {
        &self.world
    }

    pub fn values(&self) -> &ValueTable {
        &self.values
    }

    pub fn values_mut(&mut self) -> &mut ValueTable {
        &mut self.values
    }

    pub fn last_direction(&self) -> Option<Direction> {
        self.last_direction
    }

    /// Forget the previous step's direction. Called at episode start
    /// and after the agent is sent home.
    pub fn begin_episode(&mut self) {
        self.last_direction = None;
    }

    /// Choose the direction to take from `pos` and record it as the
    /// last direction taken.
    ///
    /// # Errors
    ///
    /// [`crate::Error::NoLegalMove`] when `pos` has no visitable
    /// neighbour.
    pub fn choose_direction(&mut self, pos: Position) -> Result<Direction> {
        let direction =
            self.policy
                .choose(&self.world, &self.values, pos, self.last_direction, &mut self.rng)?;
        self.last_direction = Some(direction);
        Ok(direction)
    }

    /// Apply the Q-learning update for one transition.
    pub fn apply_update(&mut self, transition: &Transition) {
        self.values.update(
            transition.from,
            transition.to,
            transition.action,
            transition.reward,
        );
    }

    /// Replay a full episode path in reverse chronological order so the
    /// terminal reward propagates backward through the whole path in a
    /// single pass.
    pub fn replay_path(&mut self, path: &Path) {
        for transition in path.iter_reverse() {
            self.apply_update(transition);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open_world(width: usize, height: usize, goal: Position) -> WorldModel {
        WorldModel::from_masks(
            vec![vec![false; height]; width],
            vec![vec![0.0; height]; width],
            vec![vec![false; height]; width],
            goal,
        )
        .unwrap()
    }

    #[test]
    fn test_choose_direction_records_last() {
        let world = open_world(3, 3, Position::new(2, 2));
        let mut agent = QLearningAgent::new(world, LearningConfig::default()).with_seed(3);

        assert_eq!(agent.last_direction(), None);
        let dir = agent.choose_direction(Position::new(1, 1)).unwrap();
        assert_eq!(agent.last_direction(), Some(dir));

        agent.begin_episode();
        assert_eq!(agent.last_direction(), None);
    }

    #[test]
    fn test_seeded_agents_agree() {
        let world = open_world(4, 4, Position::new(3, 3));
        let config = LearningConfig::default();
        let mut a = QLearningAgent::new(world.clone(), config.clone()).with_seed(99);
        let mut b = QLearningAgent::new(world, config).with_seed(99);

        let mut pos = Position::new(0, 0);
        for _ in 0..20 {
            let da = a.choose_direction(pos).unwrap();
            let db = b.choose_direction(pos).unwrap();
            assert_eq!(da, db);
            pos = crate::grid::step_toward(pos, da, 4, 4);
        }
    }

    #[test]
    fn test_replay_matches_reverse_stepwise() {
        let world = open_world(3, 3, Position::new(2, 2));
        let config = LearningConfig {
            alpha: 0.7,
            ..LearningConfig::default()
        };
        let mut episodic = QLearningAgent::new(world.clone(), config.clone());
        let mut stepwise = QLearningAgent::new(world, config);

        let mut path = Path::new();
        path.record(Transition::new(
            Position::new(0, 0),
            Position::new(1, 0),
            Direction::East,
            0.0,
        ));
        path.record(Transition::new(
            Position::new(1, 0),
            Position::new(2, 0),
            Direction::East,
            1.0,
        ));
        path.record(Transition::new(
            Position::new(2, 0),
            Position::new(2, 1),
            Direction::South,
            5.0,
        ));

        episodic.replay_path(&path);
        for transition in path.iter().rev() {
            stepwise.apply_update(transition);
        }

        assert_eq!(episodic.values(), stepwise.values());
    }
}
