//! In-memory simulator adapter
//!
//! A deterministic local grid world implementing the same port as the
//! TCP adapter. Moves follow the toroidal topology; a move into an
//! obstacle is acknowledged but leaves the agent in place, matching the
//! remote simulator's behavior. Marks and arrows are kept inspectable
//! so tests can assert on rendering side effects.

use std::collections::BTreeMap;

use crate::{
    grid::step_toward,
    ports::Simulator,
    types::{Direction, Position},
    Result,
};

/// Local simulator holding the world state and the agent's position.
#[derive(Debug, Clone)]
pub struct InMemorySimulator {
    width: usize,
    height: usize,
    obstacles: Vec<Vec<bool>>,
    rewards: Vec<Vec<f64>>,
    targets: Vec<Vec<bool>>,
    goal: Position,
    home: Position,
    position: Position,
    marks: BTreeMap<Position, String>,
    arrows: BTreeMap<Position, Direction>,
    moves_issued: usize,
}

impl InMemorySimulator {
    /// An open world with zero rewards everywhere. Obstacles, rewards,
    /// and targets are painted on with the `with_*` methods.
    pub fn open(width: usize, height: usize, goal: Position, home: Position) -> Self {
        Self {
            width,
            height,
            obstacles: vec![vec![false; height]; width],
            rewards: vec![vec![0.0; height]; width],
            targets: vec![vec![false; height]; width],
            goal,
            home,
            position: home,
            marks: BTreeMap::new(),
            arrows: BTreeMap::new(),
            moves_issued: 0,
        }
    }

    pub fn with_obstacle(mut self, pos: Position) -> Self {
        self.obstacles[pos.x][pos.y] = true;
        self
    }

    pub fn with_reward(mut self, pos: Position, reward: f64) -> Self {
        self.rewards[pos.x][pos.y] = reward;
        self
    }

    pub fn with_target(mut self, pos: Position) -> Self {
        self.targets[pos.x][pos.y] = true;
        self
    }

    /// Marks currently rendered, keyed by cell.
    pub fn marks(&self) -> &BTreeMap<Position, String> {
        &self.marks
    }

    /// Arrows currently rendered, keyed by cell.
    pub fn arrows(&self) -> &BTreeMap<Position, Direction> {
        &self.arrows
    }

    /// Number of move commands acknowledged so far.
    pub fn moves_issued(&self) -> usize {
        self.moves_issued
    }

    fn is_visitable(&self, pos: Position) -> bool {
        !self.obstacles[pos.x][pos.y]
    }
}

impl Simulator for InMemorySimulator {
    fn position(&mut self) -> Result<Position> {
        Ok(self.position)
    }

    fn goal(&mut self) -> Result<Position> {
        Ok(self.goal)
    }

    fn extents(&mut self) -> Result<(usize, usize)> {
        Ok((self.width, self.height))
    }

    fn obstacles(&mut self) -> Result<Vec<Vec<bool>>> {
        Ok(self.obstacles.clone())
    }

    fn rewards(&mut self) -> Result<Vec<Vec<f64>>> {
        Ok(self.rewards.clone())
    }

    fn targets(&mut self) -> Result<Vec<Vec<bool>>> {
        Ok(self.targets.clone())
    }

    fn move_toward(&mut self, direction: Direction) -> Result<()> {
        self.moves_issued += 1;
        let next = step_toward(self.position, direction, self.width, self.height);
        if self.is_visitable(next) {
            self.position = next;
        }
        Ok(())
    }

    fn go_home(&mut self) -> Result<()> {
        self.position = self.home;
        Ok(())
    }

    fn mark(&mut self, pos: Position, color: &str) -> Result<()> {
        self.marks.insert(pos, color.to_string());
        Ok(())
    }

    fn unmark(&mut self, pos: Position) -> Result<()> {
        self.marks.remove(&pos);
        Ok(())
    }

    fn place_arrow(&mut self, direction: Direction, pos: Position) -> Result<()> {
        self.arrows.insert(pos, direction);
        Ok(())
    }
}
