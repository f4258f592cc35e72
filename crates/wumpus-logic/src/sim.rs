//! In-process world simulation.
//!
//! [`World`] holds the ground truth; [`SimBody`] implements [`RobotBody`]
//! against it so the controller can be exercised without hardware. The body
//! tracks its own pose and records how the run went (deaths, gold pickup,
//! action counts) for harness checks.

use serde::{Deserialize, Serialize};

use crate::body::RobotBody;
use crate::error::SolveError;
use crate::geometry::{Cell, Direction, Grid};
use crate::tile::{Tile, GOLD_HERE};

/// Ground truth for one world.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct World {
    pub grid: Grid,
    pub gold: Cell,
    #[serde(default)]
    pub wumpus: Option<Cell>,
    #[serde(default)]
    pub pits: Vec<Cell>,
}

impl World {
    pub fn is_pit(&self, cell: Cell) -> bool {
        self.pits.contains(&cell)
    }

    /// Raw sensor value at `cell`. A dead wumpus gives off no stench.
    pub fn reading_at(&self, cell: Cell, wumpus_alive: bool) -> u8 {
        if cell == self.gold {
            return GOLD_HERE;
        }
        let mut sensed = Tile::EMPTY;
        for n in self.grid.neighbors(cell) {
            if self.is_pit(n) {
                sensed |= Tile::PIT;
            }
            if wumpus_alive && self.wumpus == Some(n) {
                sensed |= Tile::WUMPUS;
            }
            if n == self.gold {
                sensed |= Tile::GOLD;
            }
        }
        sensed.bits()
    }

    /// Check that every object is on the grid and that `start`, the gold and
    /// the wumpus don't share a cell with anything deadly.
    pub fn validate(&self, start: Cell) -> Result<(), SolveError> {
        let objects = self
            .pits
            .iter()
            .copied()
            .chain(self.wumpus)
            .chain([self.gold, start]);
        for cell in objects {
            if !self.grid.contains(cell) {
                return Err(SolveError::OutOfBounds { cell });
            }
        }
        let deadly = |cell: Cell| self.is_pit(cell) || self.wumpus == Some(cell);
        if deadly(start) {
            return Err(SolveError::InvalidConfig(format!(
                "start {} holds a hazard",
                start
            )));
        }
        if deadly(self.gold) {
            return Err(SolveError::InvalidConfig(format!(
                "gold {} shares a cell with a hazard",
                self.gold
            )));
        }
        if self.wumpus.is_some_and(|w| self.is_pit(w)) {
            return Err(SolveError::InvalidConfig(
                "wumpus sits in a pit".into(),
            ));
        }
        Ok(())
    }
}

/// How the simulated robot died.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Death {
    Pit(Cell),
    Wumpus(Cell),
}

/// Simulated robot body acting on a [`World`].
#[derive(Debug, Clone)]
pub struct SimBody {
    world: World,
    position: Cell,
    facing: Direction,
    wumpus_alive: bool,
    arrows_fired: u32,
    gold_reached: bool,
    death: Option<Death>,
    moves: u32,
    turns: u32,
    readings: u32,
}

impl SimBody {
    pub fn new(world: World, start: Cell, facing: Direction) -> Self {
        let gold_reached = start == world.gold;
        let wumpus_alive = world.wumpus.is_some();
        Self {
            world,
            position: start,
            facing,
            wumpus_alive,
            arrows_fired: 0,
            gold_reached,
            death: None,
            moves: 0,
            turns: 0,
            readings: 0,
        }
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn position(&self) -> Cell {
        self.position
    }

    pub fn facing(&self) -> Direction {
        self.facing
    }

    pub fn wumpus_alive(&self) -> bool {
        self.wumpus_alive
    }

    pub fn arrows_fired(&self) -> u32 {
        self.arrows_fired
    }

    /// Whether the body has stood on the gold.
    pub fn gold_reached(&self) -> bool {
        self.gold_reached
    }

    /// First fatal cell entered, if any.
    pub fn death(&self) -> Option<Death> {
        self.death
    }

    pub fn moves(&self) -> u32 {
        self.moves
    }

    /// Quarter turns performed.
    pub fn turns(&self) -> u32 {
        self.turns
    }

    pub fn readings(&self) -> u32 {
        self.readings
    }
}

impl RobotBody for SimBody {
    fn get_reading(&mut self) -> u8 {
        self.readings += 1;
        self.world.reading_at(self.position, self.wumpus_alive)
    }

    fn trigger_disable_action(&mut self) {
        self.arrows_fired += 1;
        if self.arrows_fired > 1 {
            log::warn!("arrow fired again from {}; nothing happens", self.position);
            return;
        }
        // the arrow flies until it leaves the grid
        let mut cell = self.position.step(self.facing);
        while self.world.grid.contains(cell) {
            if self.wumpus_alive && self.world.wumpus == Some(cell) {
                log::info!("wumpus at {} killed", cell);
                self.wumpus_alive = false;
                break;
            }
            cell = cell.step(self.facing);
        }
    }

    fn rotate_clockwise(&mut self) {
        self.turns += 1;
        self.facing = self.facing.clockwise();
    }

    fn rotate_counterclockwise(&mut self) {
        self.turns += 1;
        self.facing = self.facing.counter_clockwise();
    }

    fn advance(&mut self) {
        let next = self.position.step(self.facing);
        if !self.world.grid.contains(next) {
            log::warn!("bumped into the wall at {} facing {:?}", self.position, self.facing);
            return;
        }
        self.position = next;
        self.moves += 1;
        if next == self.world.gold {
            self.gold_reached = true;
        }
        if self.death.is_none() {
            if self.world.is_pit(next) {
                self.death = Some(Death::Pit(next));
            } else if self.wumpus_alive && self.world.wumpus == Some(next) {
                self.death = Some(Death::Wumpus(next));
            }
        }
    }
}
