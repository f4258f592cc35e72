//! Robot configuration: board dimensions, starting pose and risk policy.
//!
//! Everything here is plain data with serde derives so a harness can load it
//! from JSON alongside a world description.

use serde::{Deserialize, Serialize};

use crate::error::SolveError;
use crate::geometry::{Cell, Direction, Grid};

/// Whether the robot may rely on the world being solvable.
///
/// The forced-risk strategy is only sound if a safe route to the gold
/// exists. With [`Solvability::Assumed`] the robot commits to the move that
/// must be safe under that assumption; with [`Solvability::Unknown`] it
/// declines and reports the world unsolvable instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Solvability {
    #[default]
    Assumed,
    Unknown,
}

impl Solvability {
    pub fn permits_risk(self) -> bool {
        matches!(self, Solvability::Assumed)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RobotConfig {
    pub grid: Grid,
    /// Starting cell, assumed safe. The robot returns here with the gold.
    pub start: Cell,
    /// Initial heading.
    pub facing: Direction,
    pub assumption: Solvability,
    /// Sensor queries per cell before giving up on invalid answers.
    pub max_sense_attempts: u32,
}

impl Default for RobotConfig {
    fn default() -> Self {
        Self {
            grid: Grid::default(),
            start: Cell::new(0, 0),
            facing: Direction::East,
            assumption: Solvability::Assumed,
            max_sense_attempts: 3,
        }
    }
}

impl RobotConfig {
    /// Default configuration on a board of the given size.
    pub fn for_grid(grid: Grid) -> Self {
        Self {
            grid,
            ..Self::default()
        }
    }

    /// Upper bound on sensing visits before the robot gives up.
    pub fn max_visits(&self) -> usize {
        2 * self.grid.cell_count()
    }

    pub fn validate(&self) -> Result<(), SolveError> {
        if self.grid.width <= 0 || self.grid.height <= 0 {
            return Err(SolveError::InvalidConfig(format!(
                "grid must be non-empty, got {}×{}",
                self.grid.width, self.grid.height
            )));
        }
        if !self.grid.contains(self.start) {
            return Err(SolveError::InvalidConfig(format!(
                "start {} is outside the {}×{} grid",
                self.start, self.grid.width, self.grid.height
            )));
        }
        if self.max_sense_attempts == 0 {
            return Err(SolveError::InvalidConfig(
                "max_sense_attempts must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = RobotConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.max_visits(), 32);
        assert!(config.assumption.permits_risk());
    }

    #[test]
    fn test_rejects_off_grid_start() {
        let config = RobotConfig {
            start: Cell::new(4, 0),
            ..RobotConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(SolveError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_rejects_empty_grid_and_zero_attempts() {
        assert!(RobotConfig::for_grid(Grid::new(0, 3)).validate().is_err());
        let config = RobotConfig {
            max_sense_attempts: 0,
            ..RobotConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_unknown_solvability_forbids_risk() {
        assert!(!Solvability::Unknown.permits_risk());
    }
}
