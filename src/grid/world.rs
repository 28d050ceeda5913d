//! Immutable world model fetched once at bootstrap.

use crate::{
    ports::Simulator,
    types::Position,
    Error, Result,
};

/// Static facts about the grid world: extents, obstacle mask, reward
/// mask, target mask, and the goal cell.
///
/// Fetched once per agent lifetime and never mutated afterwards.
#[derive(Debug, Clone)]
pub struct WorldModel {
    width: usize,
    height: usize,
    obstacles: Vec<bool>,
    rewards: Vec<f64>,
    targets: Vec<bool>,
    goal: Position,
}

impl WorldModel {
    /// Fetch and validate the world description from the simulator.
    ///
    /// # Errors
    ///
    /// Fails before any episode runs when the extents are not positive,
    /// any grid's dimensions disagree with the declared extents, the
    /// goal is out of bounds, or the goal lies on an obstacle.
    pub fn fetch(sim: &mut dyn Simulator) -> Result<Self> {
        let (width, height) = sim.extents()?;
        if width == 0 || height == 0 {
            return Err(Error::EmptyWorld {
                width: width as i64,
                height: height as i64,
            });
        }

        let obstacles = flatten_grid("obstacles", sim.obstacles()?, width, height)?;
        let rewards = flatten_grid("rewards", sim.rewards()?, width, height)?;
        let targets = flatten_grid("targets", sim.targets()?, width, height)?;

        let goal = sim.goal()?;
        if goal.x >= width || goal.y >= height {
            return Err(Error::GoalOutOfBounds {
                x: goal.x as i64,
                y: goal.y as i64,
                width,
                height,
            });
        }

        let world = Self {
            width,
            height,
            obstacles,
            rewards,
            targets,
            goal,
        };
        if !world.is_visitable(goal) {
            return Err(Error::GoalOnObstacle {
                x: goal.x,
                y: goal.y,
            });
        }
        Ok(world)
    }

    /// Build a world model directly from column-major masks. Used by
    /// local simulators and tests; applies the same validation as
    /// [`WorldModel::fetch`].
    pub fn from_masks(
        obstacles: Vec<Vec<bool>>,
        rewards: Vec<Vec<f64>>,
        targets: Vec<Vec<bool>>,
        goal: Position,
    ) -> Result<Self> {
        let width = obstacles.len();
        let height = obstacles.first().map_or(0, Vec::len);
        if width == 0 || height == 0 {
            return Err(Error::EmptyWorld {
                width: width as i64,
                height: height as i64,
            });
        }

        let obstacles = flatten_grid("obstacles", obstacles, width, height)?;
        let rewards = flatten_grid("rewards", rewards, width, height)?;
        let targets = flatten_grid("targets", targets, width, height)?;

        if goal.x >= width || goal.y >= height {
            return Err(Error::GoalOutOfBounds {
                x: goal.x as i64,
                y: goal.y as i64,
                width,
                height,
            });
        }
        let world = Self {
            width,
            height,
            obstacles,
            rewards,
            targets,
            goal,
        };
        if !world.is_visitable(goal) {
            return Err(Error::GoalOnObstacle {
                x: goal.x,
                y: goal.y,
            });
        }
        Ok(world)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Whether the cell can be entered (not an obstacle).
    pub fn is_visitable(&self, pos: Position) -> bool {
        !self.obstacles[self.index(pos)]
    }

    /// Reward collected upon entering the cell.
    pub fn reward_at(&self, pos: Position) -> f64 {
        self.rewards[self.index(pos)]
    }

    /// Whether the cell is an absorbing non-goal terminal.
    pub fn is_target(&self, pos: Position) -> bool {
        self.targets[self.index(pos)]
    }

    pub fn is_goal(&self, pos: Position) -> bool {
        pos == self.goal
    }

    pub fn goal(&self) -> Position {
        self.goal
    }

    fn index(&self, pos: Position) -> usize {
        debug_assert!(pos.x < self.width && pos.y < self.height);
        pos.y * self.width + pos.x
    }
}

/// Validate a column-major grid against the declared extents and
/// flatten it to row-major storage.
fn flatten_grid<T: Copy + Default>(
    name: &str,
    grid: Vec<Vec<T>>,
    width: usize,
    height: usize,
) -> Result<Vec<T>> {
    let got_width = grid.len();
    let got_height = grid.first().map_or(0, Vec::len);
    if got_width != width || grid.iter().any(|column| column.len() != height) {
        return Err(Error::GridDimensionMismatch {
            grid: name.to_string(),
            got_width,
            got_height,
            width,
            height,
        });
    }

    let mut flat = vec![T::default(); width * height];
    for (x, column) in grid.iter().enumerate() {
        for (y, value) in column.iter().enumerate() {
            flat[y * width + x] = *value;
        }
    }
    Ok(flat)
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
    fn test_masks_are_column_major() {
        // Obstacle at (x=2, y=0) only.
        let mut obstacles = vec![vec![false; 2]; 3];
        obstacles[2][0] = true;
        let world = WorldModel::from_masks(
            obstacles,
            vec![vec![0.0; 2]; 3],
            vec![vec![false; 2]; 3],
            Position::new(0, 0),
        )
        .unwrap();

        assert!(!world.is_visitable(Position::new(2, 0)));
        assert!(world.is_visitable(Position::new(0, 0)));
        assert!(world.is_visitable(Position::new(2, 1)));
    }

    #[test]
    fn test_goal_accessors() {
        let world = open_world(4, 3, Position::new(3, 2));
        assert!(world.is_goal(Position::new(3, 2)));
        assert!(!world.is_goal(Position::new(0, 0)));
        assert_eq!(world.goal(), Position::new(3, 2));
    }

    #[test]
    fn test_dimension_mismatch_is_fatal() {
        let err = WorldModel::from_masks(
            vec![vec![false; 3]; 2],
            vec![vec![0.0; 2]; 2], // rewards claim height 2, world is 3
            vec![vec![false; 3]; 2],
            Position::new(0, 0),
        )
        .unwrap_err();
        assert!(matches!(err, Error::GridDimensionMismatch { .. }));
    }

    #[test]
    fn test_goal_on_obstacle_is_fatal() {
        let mut obstacles = vec![vec![false; 2]; 2];
        obstacles[1][1] = true;
        let err = WorldModel::from_masks(
            obstacles,
            vec![vec![0.0; 2]; 2],
            vec![vec![false; 2]; 2],
            Position::new(1, 1),
        )
        .unwrap_err();
        assert!(matches!(err, Error::GoalOnObstacle { x: 1, y: 1 }));
    }

    #[test]
    fn test_goal_out_of_bounds_is_fatal() {
        let err = WorldModel::from_masks(
            vec![vec![false; 2]; 2],
            vec![vec![0.0; 2]; 2],
            vec![vec![false; 2]; 2],
            Position::new(5, 0),
        )
        .unwrap_err();
        assert!(matches!(err, Error::GoalOutOfBounds { .. }));
    }
}
