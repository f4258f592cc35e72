//! Belief board: what may still be on every cell.
//!
//! Possibility bits only ever get cleared. All mutation goes through
//! [`Board::narrow`], an intersection, so evidence can never be forgotten.
//!
//! Three inference steps work on the board:
//! 1. [`Board::reduce`] folds one reading into the neighbors of the cell it
//!    was taken on. Because there is exactly one wumpus and one gold, a
//!    stench or glitter also clears that bit on every non-neighbor.
//! 2. [`Board::eliminate`] pins a property onto the last neighbor that can
//!    explain a reading, and resolves the gold/wumpus locations once a single
//!    cell remains. It runs to a fixed point.
//! 3. [`Board::deduce`] is a read-only single-cell inference used when the
//!    robot is forced to take a risk.

use crate::error::SolveError;
use crate::geometry::{Cell, Grid};
use crate::scents::Scents;
use crate::tile::{Reading, Tile};

#[derive(Debug, Clone)]
pub struct Board {
    grid: Grid,
    tiles: Vec<Tile>,
    gold: Option<Cell>,
    wumpus: Option<Cell>,
    /// Set once the arrow has flown. From then on the wumpus may be dead
    /// anywhere along the shot, so earlier stenches no longer prove where a
    /// live one stands.
    arrow_fired: bool,
}

impl Board {
    /// A board where nothing has been ruled out.
    pub fn new(grid: Grid) -> Self {
        Self {
            grid,
            tiles: vec![Tile::UNKNOWN; grid.cell_count()],
            gold: None,
            wumpus: None,
            arrow_fired: false,
        }
    }

    pub fn grid(&self) -> Grid {
        self.grid
    }

    /// Possibility set of `cell`; off-grid cells read as [`Tile::EMPTY`].
    pub fn tile(&self, cell: Cell) -> Tile {
        self.grid
            .index(cell)
            .map_or(Tile::EMPTY, |i| self.tiles[i])
    }

    /// Resolved gold location.
    pub fn gold(&self) -> Option<Cell> {
        self.gold
    }

    /// Resolved wumpus location.
    pub fn wumpus(&self) -> Option<Cell> {
        self.wumpus
    }

    /// Intersect `cell` with `mask`. Returns whether anything was cleared.
    pub fn narrow(&mut self, cell: Cell, mask: Tile) -> bool {
        let Some(i) = self.grid.index(cell) else {
            return false;
        };
        let before = self.tiles[i];
        self.tiles[i] &= mask;
        self.tiles[i] != before
    }

    /// Record the arrow fired at `target`, clearing its wumpus bit.
    pub fn record_shot(&mut self, target: Cell) {
        self.narrow(target, !Tile::WUMPUS);
        self.arrow_fired = true;
    }

    /// Whether [`Board::record_shot`] has been called.
    pub fn arrow_fired(&self) -> bool {
        self.arrow_fired
    }

    /// Rule out both hazards on `cell`.
    pub fn mark_safe(&mut self, cell: Cell) -> bool {
        self.narrow(cell, !Tile::HAZARDS)
    }

    /// Fold one reading taken at `at` into the board.
    pub fn reduce(&mut self, reading: Reading, at: Cell) -> Result<(), SolveError> {
        if !self.grid.contains(at) {
            return Err(SolveError::OutOfBounds { cell: at });
        }
        match reading {
            Reading::Gold => {
                if self.gold.is_some_and(|g| g != at) || !self.tile(at).contains(Tile::GOLD) {
                    return Err(SolveError::ContradictoryReading { cell: at });
                }
                self.narrow(at, Tile::GOLD);
                self.gold = Some(at);
                for cell in self.grid.cells().filter(|&c| c != at) {
                    self.narrow(cell, !Tile::GOLD);
                }
            }
            Reading::Nearby(sensed) => {
                // standing here alive without finding gold
                self.narrow(at, Tile::EMPTY);
                for n in self.grid.neighbors(at) {
                    self.narrow(n, sensed);
                }
                let unique = sensed & Tile::SINGLETONS;
                if !unique.is_empty() {
                    for cell in self.grid.cells().filter(|&c| c.distance(at) != 1) {
                        self.narrow(cell, !unique);
                    }
                }
            }
        }
        Ok(())
    }

    /// Propagate recorded evidence until nothing changes.
    ///
    /// Pinning the wumpus clears the pit bit of its cell, so it only happens
    /// while a live wumpus is proven: some stench was sensed and the arrow
    /// has not flown. Otherwise wumpus bits are left for evidence to clear.
    pub fn eliminate(&mut self, scents: &Scents) {
        let stench_trusted = !self.arrow_fired;
        let wumpus_proven =
            stench_trusted && scents.sensed().any(|(_, r)| r.senses(Tile::WUMPUS));
        loop {
            let mut changed = false;

            for (cell, reading) in scents.sensed() {
                for kind in Tile::KINDS {
                    if !reading.senses(kind) || (kind == Tile::WUMPUS && !stench_trusted) {
                        continue;
                    }
                    let candidates: Vec<Cell> = self
                        .grid
                        .neighbors(cell)
                        .into_iter()
                        .filter(|&n| self.tile(n).contains(kind))
                        .collect();
                    if let [only] = candidates.as_slice() {
                        changed |= self.narrow(*only, kind);
                    }
                }
            }

            // Gold first: once it is pinned its cell can no longer count
            // towards the wumpus scan.
            if self.gold.is_none() {
                if let Some(cell) = self.unique_cell(Tile::GOLD) {
                    self.narrow(cell, Tile::GOLD);
                    self.gold = Some(cell);
                    changed = true;
                }
            }
            if self.wumpus.is_none() && wumpus_proven {
                if let Some(cell) = self.unique_cell(Tile::WUMPUS) {
                    self.narrow(cell, Tile::WUMPUS);
                    self.wumpus = Some(cell);
                    changed = true;
                }
            }

            if !changed {
                break;
            }
        }
    }

    /// Infer what `cell` holds from its neighbors' readings alone.
    ///
    /// Returns [`Tile::EMPTY`] if a neighbor sensed nothing, a single
    /// property if some neighbor's reading can only be explained by `cell`,
    /// and [`Tile::UNKNOWN`] otherwise.
    pub fn deduce(&self, cell: Cell, scents: &Scents) -> Tile {
        for n in self.grid.neighbors(cell) {
            let Some(reading) = scents.get(n) else {
                continue;
            };
            if reading == Reading::Nearby(Tile::EMPTY) {
                return Tile::EMPTY;
            }
            for kind in [Tile::PIT, Tile::WUMPUS, Tile::GOLD] {
                if !reading.senses(kind) {
                    continue;
                }
                let elsewhere = self
                    .grid
                    .neighbors(n)
                    .into_iter()
                    .any(|other| other != cell && self.tile(other).contains(kind));
                if !elsewhere {
                    return kind;
                }
            }
        }
        Tile::UNKNOWN
    }

    /// The only cell still allowing `kind`, if there is exactly one.
    fn unique_cell(&self, kind: Tile) -> Option<Cell> {
        let mut found = None;
        for cell in self.grid.cells() {
            if self.tile(cell).contains(kind) {
                if found.is_some() {
                    return None;
                }
                found = Some(cell);
            }
        }
        found
    }
}

impl std::fmt::Display for Board {
    /// One row per line, north at the top.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for y in (0..self.grid.height).rev() {
            let row: Vec<String> = (0..self.grid.width)
                .map(|x| self.tile(Cell::new(x, y)).glyph())
                .collect();
            writeln!(f, "{}", row.join(" "))?;
        }
        Ok(())
    }
}
