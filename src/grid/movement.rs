//! Toroidal movement resolution.
//!
//! The grid wraps around on both axes, so every direction is applicable
//! from every cell. Obstacle legality is a separate concern layered on
//! top by the action policy: candidate enumeration legitimately probes
//! cells that turn out to be illegal.

use crate::types::{Direction, Position};

/// Resolve the cell reached by stepping from `pos` toward `direction`
/// on a `width` x `height` torus.
///
/// Pure and total: the affected coordinate wraps to the opposite edge
/// when it would leave `[0, extent)`; the orthogonal axis is unchanged.
pub fn step_toward(pos: Position, direction: Direction, width: usize, height: usize) -> Position {
    let (dx, dy) = direction.offset();
    Position {
        x: wrap(pos.x, dx, width),
        y: wrap(pos.y, dy, height),
    }
}

fn wrap(coord: usize, delta: isize, extent: usize) -> usize {
    match delta {
        1 => {
            if coord + 1 < extent {
                coord + 1
            } else {
                0
            }
        }
        -1 => {
            if coord > 0 {
                coord - 1
            } else {
                extent - 1
            }
        }
        _ => coord,
    }
}
