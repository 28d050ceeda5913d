//! Fully populated value table for temporal difference learning

use serde::{Deserialize, Serialize};

use crate::types::{Direction, Position};

/// Q-value table mapping (cell, direction) pairs to learned values.
///
/// Every cell within the world bounds has exactly one row with exactly
/// four direction entries, initialized to 0.0. Learning is cumulative:
/// the table is never reset between episodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValueTable {
    width: usize,
    height: usize,
    /// One row of four direction values per cell, row-major by cell.
    values: Vec<[f64; 4]>,
    /// Learning rate α
    learning_rate: f64,
    /// Discount factor γ
    discount_factor: f64,
}

impl ValueTable {
    /// Create a zero-initialized table covering `width` x `height` cells.
    pub fn new(width: usize, height: usize, learning_rate: f64, discount_factor: f64) -> Self {
        Self {
            width,
            height,
            values: vec![[0.0; 4]; width * height],
            learning_rate,
            discount_factor,
        }
    }

    /// Get the value of taking `direction` from `pos`.
    pub fn value(&self, pos: Position, direction: Direction) -> f64 {
        self.values[self.cell(pos)][direction.index()]
    }

    /// Maximum value over all four directions at `pos`.
    pub fn max_value(&self, pos: Position) -> f64 {
        self.values[self.cell(pos)]
            .iter()
            .fold(f64::NEG_INFINITY, |acc, &v| acc.max(v))
    }

    /// Direction with the highest value at `pos`.
    ///
    /// Ties are broken by the fixed north, south, east, west ordering so
    /// greedy behavior is reproducible.
    pub fn best_direction(&self, pos: Position) -> Direction {
        self.best_direction_among(pos, &Direction::ALL)
    }

    /// Like [`ValueTable::best_direction`] restricted to `allowed`,
    /// keeping the same tie-break ordering.
    ///
    /// # Panics
    ///
    /// Panics if `allowed` is empty; callers guarantee at least one
    /// candidate.
    pub fn best_direction_among(&self, pos: Position, allowed: &[Direction]) -> Direction {
        let row = &self.values[self.cell(pos)];
        let mut best = allowed[0];
        for &dir in &allowed[1..] {
            if row[dir.index()] > row[best.index()] {
                best = dir;
            }
        }
        best
    }

    /// One-step tabular Q-learning update:
    ///
    /// Q(prev,a) ← Q(prev,a) + α[r + γ max_d Q(cur,d) - Q(prev,a)]
    ///
    /// Local by construction: only the (prev, action) cell changes.
    pub fn update(&mut self, prev: Position, cur: Position, action: Direction, reward: f64) {
        let old = self.value(prev, action);
        let target = reward + self.discount_factor * self.max_value(cur);
        let new = old + self.learning_rate * (target - old);
        let cell = self.cell(prev);
        self.values[cell][action.index()] = new;
    }

    pub fn learning_rate(&self) -> f64 {
        self.learning_rate
    }

    pub fn discount_factor(&self) -> f64 {
        self.discount_factor
    }

    /// Overwrite the value of a single (cell, direction) entry.
    pub fn set(&mut self, pos: Position, direction: Direction, value: f64) {
        let cell = self.cell(pos);
        self.values[cell][direction.index()] = value;
    }

    fn cell(&self, pos: Position) -> usize {
        debug_assert!(pos.x < self.width && pos.y < self.height);
        pos.y * self.width + pos.x
    }
}
