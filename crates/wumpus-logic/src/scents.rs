//! Evidence memory: the reading recorded at each visited cell.
//!
//! Append-only: the first reading at a cell is kept, later ones at the same
//! cell carry no new information and are ignored.

use crate::geometry::{Cell, Grid};
use crate::tile::Reading;

#[derive(Debug, Clone)]
pub struct Scents {
    grid: Grid,
    readings: Vec<Option<Reading>>,
}

impl Scents {
    pub fn new(grid: Grid) -> Self {
        Self {
            grid,
            readings: vec![None; grid.cell_count()],
        }
    }

    /// Store `reading` at `cell`. Returns `false` if the cell was already
    /// sensed or lies off the grid.
    pub fn record(&mut self, cell: Cell, reading: Reading) -> bool {
        match self.grid.index(cell) {
            Some(i) if self.readings[i].is_none() => {
                self.readings[i] = Some(reading);
                true
            }
            _ => false,
        }
    }

    pub fn get(&self, cell: Cell) -> Option<Reading> {
        self.grid.index(cell).and_then(|i| self.readings[i])
    }

    pub fn is_sensed(&self, cell: Cell) -> bool {
        self.get(cell).is_some()
    }

    /// Sensed cells with their readings, in grid order.
    pub fn sensed(&self) -> impl Iterator<Item = (Cell, Reading)> + '_ {
        self.grid
            .cells()
            .filter_map(move |c| self.get(c).map(|r| (c, r)))
    }

    pub fn sensed_count(&self) -> usize {
        self.readings.iter().filter(|r| r.is_some()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tile::Tile;

    #[test]
    fn test_first_reading_wins() {
        let mut scents = Scents::new(Grid::default());
        let cell = Cell::new(1, 2);
        assert!(!scents.is_sensed(cell));
        assert!(scents.record(cell, Reading::Nearby(Tile::PIT)));
        assert!(!scents.record(cell, Reading::Nearby(Tile::EMPTY)));
        assert_eq!(scents.get(cell), Some(Reading::Nearby(Tile::PIT)));
        assert_eq!(scents.sensed_count(), 1);
    }

    #[test]
    fn test_off_grid_is_never_sensed() {
        let mut scents = Scents::new(Grid::default());
        assert!(!scents.record(Cell::new(4, 0), Reading::Gold));
        assert_eq!(scents.get(Cell::new(-1, 0)), None);
    }

    #[test]
    fn test_sensed_iterates_in_grid_order() {
        let mut scents = Scents::new(Grid::default());
        scents.record(Cell::new(2, 0), Reading::Gold);
        scents.record(Cell::new(0, 3), Reading::Nearby(Tile::EMPTY));
        let cells: Vec<Cell> = scents.sensed().map(|(c, _)| c).collect();
        assert_eq!(cells, vec![Cell::new(0, 3), Cell::new(2, 0)]);
    }
}
