//! ε-greedy action selection with anti-backtrack filtering

use rand::{rngs::StdRng, seq::IndexedRandom, Rng};
use serde::{Deserialize, Serialize};

use crate::{
    grid::{step_toward, WorldModel},
    q_learning::value_table::ValueTable,
    types::{Direction, Position},
    Error, Result,
};

/// Which action set the greedy branch may pick from.
///
/// Greedy selection over all four directions can pick an illegal
/// neighbour or immediately retrace the previous step. `Candidates`
/// restricts the greedy choice to the same filtered set the
/// exploratory branch uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GreedyScope {
    /// Greedy over the legal, backtrack-filtered candidate set (default).
    Candidates,
    /// Greedy over all four directions, even illegal ones. The move is
    /// then rejected by the simulator and the agent stays in place.
    AllDirections,
}

/// Per-step direction choice.
///
/// With probability ε a direction is drawn uniformly from the legal
/// candidates (excluding, where possible, the direction that would
/// retrace the previous step); otherwise the greedy direction is taken.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionPolicy {
    /// Exploration rate ε
    pub epsilon: f64,
    /// Drop the immediately-reversing direction from candidates when
    /// alternatives exist.
    pub no_turning_back: bool,
    pub greedy_scope: GreedyScope,
}

impl ActionPolicy {
    pub fn new(epsilon: f64, no_turning_back: bool, greedy_scope: GreedyScope) -> Self {
        Self {
            epsilon,
            no_turning_back,
            greedy_scope,
        }
    }

    /// Legal candidate directions from `pos`: those whose toroidal step
    /// lands on a visitable cell, minus the backtracking direction when
    /// the anti-backtrack rule applies. Dead ends keep their single
    /// escape direction.
    ///
    /// # Errors
    ///
    /// [`Error::NoLegalMove`] when all four neighbours are obstacles;
    /// the caller must fail the episode rather than spin.
    pub fn candidates(
        &self,
        world: &WorldModel,
        pos: Position,
        last_direction: Option<Direction>,
    ) -> Result<Vec<Direction>> {
        let mut candidates: Vec<Direction> = Direction::ALL
            .into_iter()
            .filter(|&dir| {
                world.is_visitable(step_toward(pos, dir, world.width(), world.height()))
            })
            .collect();

        if candidates.is_empty() {
            return Err(Error::NoLegalMove { x: pos.x, y: pos.y });
        }

        if self.no_turning_back && candidates.len() > 1 {
            if let Some(last) = last_direction {
                candidates.retain(|&dir| dir != last.opposite());
            }
        }

        Ok(candidates)
    }

    /// Choose the direction to take from `pos`.
    pub fn choose(
        &self,
        world: &WorldModel,
        values: &ValueTable,
        pos: Position,
        last_direction: Option<Direction>,
        rng: &mut StdRng,
    ) -> Result<Direction> {
        let candidates = self.candidates(world, pos, last_direction)?;

        if rng.random::<f64>() < self.epsilon {
            // Explore: uniform over the filtered candidates. The set is
            // non-empty, so choose cannot fail.
            Ok(*candidates
                .choose(rng)
                .ok_or(Error::NoLegalMove { x: pos.x, y: pos.y })?)
        } else {
            // Exploit: greedy over the configured scope.
            match self.greedy_scope {
                GreedyScope::Candidates => Ok(values.best_direction_among(pos, &candidates)),
                GreedyScope::AllDirections => Ok(values.best_direction(pos)),
            }
        }
    }
}
