//! World model bootstrap against a live simulator port.

use gridrover::{adapters::InMemorySimulator, Position, WorldModel};

#[test]
fn test_fetch_reflects_simulator_layout() {
    let mut sim = InMemorySimulator::open(4, 3, Position::new(3, 2), Position::new(0, 0))
        .with_obstacle(Position::new(2, 1))
        .with_reward(Position::new(0, 2), 3.5)
        .with_reward(Position::new(3, 2), 10.0)
        .with_target(Position::new(1, 2));

    let world = WorldModel::fetch(&mut sim).unwrap();

    assert_eq!((world.width(), world.height()), (4, 3));
    assert_eq!(world.goal(), Position::new(3, 2));
    assert!(!world.is_visitable(Position::new(2, 1)));
    assert!(world.is_visitable(Position::new(1, 2)));
    assert_eq!(world.reward_at(Position::new(0, 2)), 3.5);
    assert_eq!(world.reward_at(Position::new(3, 2)), 10.0);
    assert!(world.is_target(Position::new(1, 2)));
    assert!(!world.is_target(Position::new(3, 2)));
    assert!(world.is_goal(Position::new(3, 2)));
}

#[test]
fn test_fetch_rejects_goal_on_obstacle() {
    let mut sim = InMemorySimulator::open(3, 3, Position::new(1, 1), Position::new(0, 0))
        .with_obstacle(Position::new(1, 1));

    assert!(WorldModel::fetch(&mut sim).is_err());
}
