//! The exploration and retrieval controller.
//!
//! The robot runs through four stages:
//!
//! 1. **Exploring**: sense safe cells, best-scored first, until the gold's
//!    cell is proven. When no safe cell is left it may shoot the known
//!    wumpus or take a forced risk.
//! 2. **GoldKnown**: walk to the gold, clearing blockers the same way.
//! 3. **HasGold**: walk back to the start.
//! 4. **Done**.
//!
//! Every sensing updates [`Scents`] and [`Board`], then runs
//! [`Board::eliminate`] to a fixed point. Moves only ever cross cells the
//! board proves safe.

use crate::board::Board;
use crate::body::RobotBody;
use crate::config::RobotConfig;
use crate::error::SolveError;
use crate::geometry::{Cell, Direction};
use crate::pathfinding::{is_reachable, shortest_path};
use crate::scents::Scents;
use crate::tile::{Reading, Tile};
use crate::trace::{Discard, TraceSink};

/// Score added per sensed neighbor whose reading included glitter.
pub const GLITTER_BONUS: u32 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Stage {
    Exploring,
    GoldKnown,
    HasGold,
    Done,
}

/// How a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
    /// Gold collected and the robot is back on the start cell.
    Done,
    /// No safe way forward exists under the configured assumption.
    Unsolvable,
}

pub struct Robot<B: RobotBody, T: TraceSink = Discard> {
    body: B,
    config: RobotConfig,
    board: Board,
    scents: Scents,
    position: Cell,
    facing: Direction,
    stage: Stage,
    has_arrow: bool,
    visits: usize,
    halted: bool,
    trace: T,
}

impl<B: RobotBody> Robot<B> {
    /// Robot with a fresh board on which only the start cell is known safe.
    pub fn new(body: B, config: RobotConfig) -> Result<Self, SolveError> {
        let board = Board::new(config.grid);
        Self::with_board(body, config, board)
    }

    /// Robot starting from prior knowledge. The start cell is still marked
    /// safe.
    pub fn with_board(body: B, config: RobotConfig, mut board: Board) -> Result<Self, SolveError> {
        config.validate()?;
        if board.grid() != config.grid {
            return Err(SolveError::InvalidConfig(format!(
                "board is {}×{} but config expects {}×{}",
                board.grid().width,
                board.grid().height,
                config.grid.width,
                config.grid.height
            )));
        }
        board.mark_safe(config.start);
        Ok(Self {
            scents: Scents::new(config.grid),
            position: config.start,
            facing: config.facing,
            stage: Stage::Exploring,
            has_arrow: true,
            visits: 0,
            halted: false,
            trace: Discard,
            body,
            config,
            board,
        })
    }
}

impl<B: RobotBody, T: TraceSink> Robot<B, T> {
    /// Send decision trace lines to `sink`.
    pub fn with_trace<S: TraceSink>(self, sink: S) -> Robot<B, S> {
        Robot {
            body: self.body,
            config: self.config,
            board: self.board,
            scents: self.scents,
            position: self.position,
            facing: self.facing,
            stage: self.stage,
            has_arrow: self.has_arrow,
            visits: self.visits,
            halted: self.halted,
            trace: sink,
        }
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn position(&self) -> Cell {
        self.position
    }

    pub fn facing(&self) -> Direction {
        self.facing
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn scents(&self) -> &Scents {
        &self.scents
    }

    pub fn config(&self) -> &RobotConfig {
        &self.config
    }

    pub fn has_arrow(&self) -> bool {
        self.has_arrow
    }

    /// Number of sensing visits so far.
    pub fn visits(&self) -> usize {
        self.visits
    }

    pub fn body(&self) -> &B {
        &self.body
    }

    pub fn trace(&self) -> &T {
        &self.trace
    }

    pub fn into_body(self) -> B {
        self.body
    }

    /// Drive the robot until it is back at the start with the gold, or
    /// until it proves it cannot safely continue.
    ///
    /// Errors are reserved for protocol failures (invalid readings,
    /// contradictions); an unsolvable world is an ordinary [`Outcome`].
    pub fn run(&mut self) -> Result<Outcome, SolveError> {
        if self.halted {
            return Ok(Outcome::Unsolvable);
        }

        while self.stage == Stage::Exploring {
            if self.visits >= self.config.max_visits() {
                return Ok(self.halt("exploration budget exhausted"));
            }
            let next = match self.next_explore_cell() {
                Some(cell) => cell,
                None => match self.shootable_wumpus() {
                    Some(wumpus) => {
                        self.neutralize_at(wumpus)?;
                        wumpus
                    }
                    None => match self.forced_risk()? {
                        Some(cell) => cell,
                        None => return Ok(self.halt("no cell left that could lead to the gold")),
                    },
                },
            };
            self.visit(next)?;
            if let Some(gold) = self.board.gold() {
                log::info!("gold located at {} after {} visits", gold, self.visits);
                self.note(format!("gold is at {}", gold));
                self.stage = Stage::GoldKnown;
            }
        }

        if self.stage == Stage::GoldKnown {
            let Some(gold) = self.board.gold() else {
                return Ok(self.halt("gold location lost"));
            };
            if !self.reach(gold)? {
                return Ok(self.halt("gold cannot be reached"));
            }
            self.note(format!("picked up the gold at {}", gold));
            self.stage = Stage::HasGold;
        }

        if self.stage == Stage::HasGold {
            let start = self.config.start;
            if !self.reach(start)? {
                return Ok(self.halt("no way back to the start"));
            }
            log::info!("back at {} with the gold", start);
            self.note(format!("returned to {}", start));
            self.stage = Stage::Done;
        }

        Ok(Outcome::Done)
    }

    /// Best safe, unsensed, reachable cell to sense next.
    ///
    /// Cells score the sum of their neighbors' open possibilities, plus
    /// [`GLITTER_BONUS`] per neighbor that sensed glitter. Ties go to the
    /// cell closer to the start, then to the first in grid order.
    pub fn next_explore_cell(&mut self) -> Option<Cell> {
        let snapshot = self.board.to_string();
        self.note(format!("board:\n{}", snapshot));

        let grid = self.config.grid;
        let start = self.config.start;
        let mut best: Option<(u32, u32, Cell)> = None;
        for cell in grid.cells() {
            if !self.board.tile(cell).is_safe()
                || self.scents.is_sensed(cell)
                || !is_reachable(&self.board, self.position, cell)
            {
                continue;
            }
            let score = grid
                .neighbors(cell)
                .into_iter()
                .map(|n| {
                    let glitter = self
                        .scents
                        .get(n)
                        .is_some_and(|reading| reading.senses(Tile::GOLD));
                    self.board.tile(n).possibilities() + if glitter { GLITTER_BONUS } else { 0 }
                })
                .sum::<u32>();
            let distance = cell.distance(start);
            let better = match best {
                None => true,
                Some((s, d, _)) => score > s || (score == s && distance < d),
            };
            if better {
                best = Some((score, distance, cell));
            }
        }
        best.map(|(_, _, cell)| cell)
    }

    /// Walk into firing position next to `target` and shoot it.
    ///
    /// Clears the wumpus possibility from `target` whether or not one was
    /// there.
    pub fn neutralize_at(&mut self, target: Cell) -> Result<(), SolveError> {
        if !self.has_arrow {
            return Err(SolveError::ArrowSpent);
        }
        if !self.config.grid.contains(target) {
            return Err(SolveError::OutOfBounds { cell: target });
        }
        let mut path = shortest_path(&self.board, self.position, target)
            .ok_or(SolveError::NoPathToTarget { target })?;
        let aim = path.pop().ok_or(SolveError::NoPathToTarget { target })?;
        self.follow(&path);
        self.face(aim);
        self.note(format!("shooting {} from {} at {}", aim.letter(), self.position, target));
        self.body.trigger_disable_action();
        self.has_arrow = false;
        self.board.record_shot(target);
        self.board.eliminate(&self.scents);
        Ok(())
    }

    fn halt(&mut self, reason: &str) -> Outcome {
        log::warn!("giving up at {}: {}", self.position, reason);
        self.note(format!("unsolvable: {}", reason));
        self.halted = true;
        Outcome::Unsolvable
    }

    /// Move to `cell`, sense there and propagate.
    fn visit(&mut self, cell: Cell) -> Result<(), SolveError> {
        if !self.move_to(cell) {
            return Err(SolveError::PathBlocked { target: cell });
        }
        self.sense()?;
        self.board.eliminate(&self.scents);
        Ok(())
    }

    /// Get to `target`, clearing blockers when no safe path exists.
    /// Returns false when nothing more can be tried.
    fn reach(&mut self, target: Cell) -> Result<bool, SolveError> {
        for _ in 0..=self.config.grid.cell_count() {
            if self.move_to(target) {
                return Ok(true);
            }
            if let Some(wumpus) = self.shootable_wumpus() {
                self.neutralize_at(wumpus)?;
                continue;
            }
            match self.forced_risk()? {
                Some(cell) => self.visit(cell)?,
                None => return Ok(false),
            }
        }
        Ok(false)
    }

    /// The proven wumpus, if the arrow is left and it can be approached.
    fn shootable_wumpus(&self) -> Option<Cell> {
        let wumpus = self.board.wumpus()?;
        let live = self.has_arrow
            && wumpus != self.position
            && self.board.tile(wumpus).contains(Tile::WUMPUS)
            && is_reachable(&self.board, self.position, wumpus);
        live.then_some(wumpus)
    }

    /// Commit to an unsensed cell that must be safe if the world is
    /// solvable. Shoots first when the cell may hold the wumpus, then marks
    /// it safe.
    fn forced_risk(&mut self) -> Result<Option<Cell>, SolveError> {
        if !self.config.assumption.permits_risk() {
            self.note("no safe move and solvability is not assumed");
            return Ok(None);
        }
        let mut candidates: Vec<Cell> = self
            .config
            .grid
            .cells()
            .filter(|&cell| self.is_risk_candidate(cell))
            .collect();
        if candidates.len() > 1 {
            candidates.retain(|&cell| self.could_lead_to_gold(cell));
        }
        let Some(&cell) = candidates.first() else {
            return Ok(None);
        };

        log::warn!("forced risk: committing to {}", cell);
        self.note(format!("forced risk on {} (tile {})", cell, self.board.tile(cell).glyph()));
        if self.board.tile(cell).contains(Tile::WUMPUS) {
            if self.has_arrow {
                self.neutralize_at(cell)?;
            } else {
                log::warn!("entering {} which may hold the wumpus, arrow already spent", cell);
            }
        }
        self.board.mark_safe(cell);
        Ok(Some(cell))
    }

    fn is_risk_candidate(&self, cell: Cell) -> bool {
        if cell == self.position || self.scents.is_sensed(cell) {
            return false;
        }
        match self.board.deduce(cell, &self.scents) {
            known if known == Tile::PIT => return false,
            known if known == Tile::WUMPUS && !self.has_arrow => return false,
            _ => {}
        }
        is_reachable(&self.board, self.position, cell)
    }

    fn could_lead_to_gold(&self, cell: Cell) -> bool {
        self.board.tile(cell).contains(Tile::GOLD)
            || self
                .config
                .grid
                .neighbors(cell)
                .into_iter()
                .any(|n| self.board.tile(n).contains(Tile::GOLD))
    }

    fn sense(&mut self) -> Result<(), SolveError> {
        let cell = self.position;
        let attempts = self.config.max_sense_attempts;
        let mut raw = 0;
        for attempt in 1..=attempts {
            raw = self.body.get_reading();
            let Some(reading) = Reading::from_raw(raw) else {
                log::warn!(
                    "invalid reading {:#b} at {} (attempt {}/{})",
                    raw,
                    cell,
                    attempt,
                    attempts
                );
                continue;
            };
            self.visits += 1;
            self.note(format!("sensed {} at {} ({:#06b})", reading, cell, reading.raw()));
            if self.scents.record(cell, reading) {
                self.board.reduce(reading, cell)?;
            }
            return Ok(());
        }
        Err(SolveError::InvalidReading {
            cell,
            raw,
            attempts,
        })
    }

    fn move_to(&mut self, target: Cell) -> bool {
        match shortest_path(&self.board, self.position, target) {
            Some(path) => {
                if !path.is_empty() {
                    self.note(format!("moving {} -> {}", self.position, target));
                }
                self.follow(&path);
                true
            }
            None => false,
        }
    }

    fn follow(&mut self, path: &[Direction]) {
        for &dir in path {
            self.face(dir);
            self.body.advance();
            self.position = self.position.step(dir);
        }
    }

    /// Turn to `dir` with the fewest body calls.
    fn face(&mut self, dir: Direction) {
        if dir == self.facing {
            return;
        }
        if dir == self.facing.counter_clockwise() {
            self.body.rotate_counterclockwise();
        } else if dir == self.facing.opposite() {
            self.body.rotate_180();
        } else {
            self.body.rotate_clockwise();
        }
        self.facing = dir;
    }

    fn note(&mut self, line: impl AsRef<str>) {
        for line in line.as_ref().lines() {
            log::debug!("{}", line);
            self.trace.record(line);
        }
    }
}
