//! Episode path recording and reverse replay ordering

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::types::{Direction, Position};

/// One observed step: state before, state after, the action taken, and
/// the reward collected on arrival.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transition {
    pub from: Position,
    pub to: Position,
    pub action: Direction,
    pub reward: f64,
}

impl Transition {
    pub fn new(from: Position, to: Position, action: Direction, reward: f64) -> Self {
        Self {
            from,
            to,
            action,
            reward,
        }
    }
}

/// Ordered sequence of transitions for one episode.
///
/// Consumed either incrementally (stepwise updates) or as a whole in
/// reverse (episodic replay), then discarded.
#[derive(Debug, Clone, Default)]
pub struct Path {
    transitions: Vec<Transition>,
}

impl Path {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, transition: Transition) {
        self.transitions.push(transition);
    }

    pub fn len(&self) -> usize {
        self.transitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transitions.is_empty()
    }

    /// Chronological iteration.
    pub fn iter(&self) -> std::slice::Iter<'_, Transition> {
        self.transitions.iter()
    }

    /// Reverse chronological iteration, the episodic replay order.
    pub fn iter_reverse(&self) -> impl Iterator<Item = &Transition> {
        self.transitions.iter().rev()
    }

    /// Deduplicated set of cells entered during the episode, for
    /// order-independent mark cleanup.
    pub fn visited(&self) -> BTreeSet<Position> {
        self.transitions.iter().map(|t| t.to).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn step(x0: usize, x1: usize, reward: f64) -> Transition {
        Transition::new(
            Position::new(x0, 0),
            Position::new(x1, 0),
            Direction::East,
            reward,
        )
    }

    #[test]
    fn test_reverse_iteration_order() {
        let mut path = Path::new();
        path.record(step(0, 1, 0.0));
        path.record(step(1, 2, 0.0));
        path.record(step(2, 3, 10.0));

        let rewards: Vec<f64> = path.iter_reverse().map(|t| t.reward).collect();
        assert_eq!(rewards, vec![10.0, 0.0, 0.0]);
    }

    #[test]
    fn test_visited_deduplicates() {
        let mut path = Path::new();
        path.record(step(0, 1, 0.0));
        path.record(step(1, 0, 0.0));
        path.record(step(0, 1, 0.0));

        let visited = path.visited();
        assert_eq!(visited.len(), 2);
        assert!(visited.contains(&Position::new(0, 0)));
        assert!(visited.contains(&Position::new(1, 0)));
    }
}
