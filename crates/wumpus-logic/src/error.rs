//! Error types for solving a world.

use thiserror::Error;

use crate::geometry::Cell;

/// Failures that stop the controller before it reaches a verdict.
///
/// Declaring a world unsolvable is not an error; see
/// [`crate::robot::Outcome::Unsolvable`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SolveError {
    /// Configuration rejected by validation.
    #[error("invalid config: {0}")]
    InvalidConfig(String),

    /// A caller-supplied cell is off the grid.
    #[error("cell {cell} is outside the grid")]
    OutOfBounds { cell: Cell },

    /// The sensor kept answering with values outside the protocol.
    #[error("no valid reading at {cell} after {attempts} attempts (last raw value {raw:#b})")]
    InvalidReading { cell: Cell, raw: u8, attempts: u32 },

    /// A reading disagrees with what the board already proved.
    #[error("reading at {cell} contradicts earlier evidence")]
    ContradictoryReading { cell: Cell },

    /// Neutralization was requested for a cell with no approach path.
    #[error("no path to aim at {target}")]
    NoPathToTarget { target: Cell },

    /// The one-time disabling action was already used.
    #[error("the arrow has already been fired")]
    ArrowSpent,

    /// A destination chosen as reachable turned out to be blocked.
    #[error("path to {target} is blocked")]
    PathBlocked { target: Cell },
}
