//! Simulator port - typed request/response surface over the remote world
//!
//! Every call blocks until the simulator replies; the learning loop is
//! strictly synchronous. Implementations translate these intents into
//! their wire protocol and decode the replies into typed values, so
//! parse failures never leak past this boundary as raw text.

use crate::{
    types::{Direction, Position},
    Result,
};

/// Connection to the grid-world simulator.
///
/// Grid queries return column-major nested vectors: the outer index is
/// `x`, the inner index is `y`, matching the simulator's encoding.
pub trait Simulator {
    /// Current agent position.
    fn position(&mut self) -> Result<Position>;

    /// The goal cell.
    fn goal(&mut self) -> Result<Position>;

    /// World extents as (width, height).
    fn extents(&mut self) -> Result<(usize, usize)>;

    /// Obstacle mask; `true` means the cell cannot be entered.
    fn obstacles(&mut self) -> Result<Vec<Vec<bool>>>;

    /// Reward collected upon entering each cell.
    fn rewards(&mut self) -> Result<Vec<Vec<f64>>>;

    /// Absorbing non-goal terminal cells.
    fn targets(&mut self) -> Result<Vec<Vec<bool>>>;

    /// Ask the agent to move one cell in the given direction.
    fn move_toward(&mut self, direction: Direction) -> Result<()>;

    /// Relocate the agent to its start position.
    fn go_home(&mut self) -> Result<()>;

    /// Render the given cell in `color`.
    fn mark(&mut self, pos: Position, color: &str) -> Result<()>;

    /// Clear any rendering on the given cell.
    fn unmark(&mut self, pos: Position) -> Result<()>;

    /// Place a directional arrow glyph on the given cell.
    fn place_arrow(&mut self, direction: Direction, pos: Position) -> Result<()>;
}
