//! Integration tests driving the episode runner against the in-memory
//! simulator.

use gridrover::{
    adapters::InMemorySimulator,
    engine::{EpisodeRunner, RunConfig, UpdateMode},
    Direction, Error, GreedyScope, LearningConfig, Position, QLearningAgent, WorldModel,
};

fn greedy_config() -> LearningConfig {
    LearningConfig {
        epsilon: 0.0,
        ..LearningConfig::default()
    }
}

/// A 3x3 world with the goal in the south-east corner paying reward 10.
fn corner_goal_sim() -> InMemorySimulator {
    InMemorySimulator::open(3, 3, Position::new(2, 2), Position::new(0, 0))
        .with_reward(Position::new(2, 2), 10.0)
}

/// Seed the table so the greedy policy walks east, east, south, south
/// from home straight to the corner goal.
fn seed_direct_path(agent: &mut QLearningAgent) {
    let values = agent.values_mut();
    values.set(Position::new(0, 0), Direction::East, 1.0);
    values.set(Position::new(1, 0), Direction::East, 2.0);
    values.set(Position::new(2, 0), Direction::South, 3.0);
    values.set(Position::new(2, 1), Direction::South, 4.0);
}

#[test]
fn test_episodic_replay_propagates_goal_reward_backward() {
    let mut sim = corner_goal_sim();
    let world = WorldModel::fetch(&mut sim).unwrap();
    let mut agent = QLearningAgent::new(world, greedy_config());
    seed_direct_path(&mut agent);

    let config = RunConfig {
        episodes: 1,
        ..RunConfig::default()
    };
    let summary = EpisodeRunner::new(config).run(&mut agent, &mut sim).unwrap();

    assert_eq!(summary.episodes, 1);
    assert_eq!(summary.goal_terminations, 1);
    assert_eq!(summary.total_steps, 4);

    // Reverse replay: the terminal reward lands on the last transition
    // and each earlier step sees the already-updated successor.
    let values = agent.values();
    assert_eq!(values.value(Position::new(2, 1), Direction::South), 10.0);
    assert_eq!(values.value(Position::new(2, 0), Direction::South), 9.0);
    let first = values.value(Position::new(0, 0), Direction::East);
    assert!((first - 7.29).abs() < 1e-12);
}

#[test]
fn test_stepwise_updates_apply_in_walk_order() {
    let mut sim = corner_goal_sim();
    let world = WorldModel::fetch(&mut sim).unwrap();
    let mut agent = QLearningAgent::new(world, greedy_config());
    seed_direct_path(&mut agent);

    let config = RunConfig {
        episodes: 1,
        update_mode: UpdateMode::Stepwise,
        ..RunConfig::default()
    };
    EpisodeRunner::new(config).run(&mut agent, &mut sim).unwrap();

    // Forward order: each update only sees the seeded successor values,
    // so the terminal reward reaches just the final transition.
    let values = agent.values();
    assert!((values.value(Position::new(0, 0), Direction::East) - 1.8).abs() < 1e-12);
    assert!((values.value(Position::new(1, 0), Direction::East) - 2.7).abs() < 1e-12);
    assert!((values.value(Position::new(2, 0), Direction::South) - 3.6).abs() < 1e-12);
    assert_eq!(values.value(Position::new(2, 1), Direction::South), 10.0);
}

#[test]
fn test_target_tile_ends_episode_with_its_reward() {
    let mut sim = InMemorySimulator::open(3, 3, Position::new(2, 2), Position::new(0, 0))
        .with_target(Position::new(1, 0))
        .with_reward(Position::new(1, 0), -5.0);
    let world = WorldModel::fetch(&mut sim).unwrap();
    let mut agent = QLearningAgent::new(world, greedy_config());
    agent
        .values_mut()
        .set(Position::new(0, 0), Direction::East, 1.0);

    let config = RunConfig {
        episodes: 1,
        ..RunConfig::default()
    };
    let summary = EpisodeRunner::new(config).run(&mut agent, &mut sim).unwrap();

    assert_eq!(summary.target_terminations, 1);
    assert_eq!(summary.goal_terminations, 0);
    assert_eq!(summary.total_steps, 1);
    assert_eq!(
        agent.values().value(Position::new(0, 0), Direction::East),
        -5.0
    );
}

#[test]
fn test_trapped_agent_fails_fast() {
    let mut sim = InMemorySimulator::open(3, 3, Position::new(0, 0), Position::new(1, 1))
        .with_obstacle(Position::new(1, 0))
        .with_obstacle(Position::new(1, 2))
        .with_obstacle(Position::new(0, 1))
        .with_obstacle(Position::new(2, 1));
    let world = WorldModel::fetch(&mut sim).unwrap();
    let mut agent = QLearningAgent::new(world, LearningConfig::default()).with_seed(1);

    let config = RunConfig {
        episodes: 1,
        ..RunConfig::default()
    };
    let err = EpisodeRunner::new(config)
        .run(&mut agent, &mut sim)
        .unwrap_err();

    match err {
        Error::NoLegalMove { x, y } => {
            assert_eq!((x, y), (1, 1));
        }
        other => panic!("expected NoLegalMove, got {other:?}"),
    }
}

#[test]
fn test_visited_marks_are_cleaned_up() {
    let mut sim = corner_goal_sim();
    let world = WorldModel::fetch(&mut sim).unwrap();
    let mut agent = QLearningAgent::new(world, greedy_config());
    seed_direct_path(&mut agent);

    let config = RunConfig {
        episodes: 1,
        ..RunConfig::default()
    };
    EpisodeRunner::new(config).run(&mut agent, &mut sim).unwrap();

    // Every tile visited during the walk is unmarked afterwards; only
    // the freshly marked home tile remains for the next episode.
    assert_eq!(sim.marks().len(), 1);
    assert!(sim.marks().contains_key(&Position::new(0, 0)));
}

#[test]
fn test_policy_arrows_only_on_learned_cells() {
    let mut sim = corner_goal_sim();
    let world = WorldModel::fetch(&mut sim).unwrap();
    let mut agent = QLearningAgent::new(world, greedy_config());
    seed_direct_path(&mut agent);

    let config = RunConfig {
        episodes: 1,
        draw_policy_arrows: true,
        ..RunConfig::default()
    };
    EpisodeRunner::new(config).run(&mut agent, &mut sim).unwrap();

    // Only the four cells on the walked path hold nonzero values; the
    // rest of the grid stays blank.
    assert_eq!(sim.arrows().len(), 4);
    assert_eq!(
        sim.arrows().get(&Position::new(2, 1)),
        Some(&Direction::South)
    );
    assert!(!sim.arrows().contains_key(&Position::new(1, 1)));
    assert!(!sim.arrows().contains_key(&Position::new(2, 2)));
}

#[test]
fn test_exploring_run_reaches_goal_every_episode() {
    let mut sim = InMemorySimulator::open(4, 4, Position::new(3, 3), Position::new(0, 0))
        .with_reward(Position::new(3, 3), 10.0);
    let world = WorldModel::fetch(&mut sim).unwrap();
    let config = LearningConfig {
        greedy_scope: GreedyScope::Candidates,
        ..LearningConfig::default()
    };
    let mut agent = QLearningAgent::new(world, config).with_seed(7);

    let run_config = RunConfig {
        episodes: 30,
        ..RunConfig::default()
    };
    let summary = EpisodeRunner::new(run_config)
        .run(&mut agent, &mut sim)
        .unwrap();

    assert_eq!(summary.episodes, 30);
    assert_eq!(summary.goal_terminations, 30);
    assert!(summary.avg_episode_steps >= 1.0);

    // With full replacement the action entering the goal holds exactly
    // the terminal reward, and the goal row itself is never written.
    let goal = Position::new(3, 3);
    let entering_max = (0..4)
        .flat_map(|x| (0..4).map(move |y| Position::new(x, y)))
        .flat_map(|pos| Direction::ALL.into_iter().map(move |dir| (pos, dir)))
        .filter(|&(pos, dir)| gridrover::step_toward(pos, dir, 4, 4) == goal)
        .map(|(pos, dir)| agent.values().value(pos, dir))
        .fold(f64::NEG_INFINITY, f64::max);
    assert_eq!(entering_max, 10.0);
    assert_eq!(agent.values().max_value(goal), 0.0);
}
