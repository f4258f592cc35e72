//! Grid geometry: cells, headings and the 4-neighborhood.
//!
//! Coordinates put `(0, 0)` in the lower-left corner with `x` growing east
//! and `y` growing north. Every function that enumerates neighbors uses the
//! same fixed direction order (east, north, west, south), which is what makes
//! tie-breaking in the planner and the explorer deterministic.

use serde::{Deserialize, Serialize};

/// A grid position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cell {
    pub x: i32,
    pub y: i32,
}

impl Cell {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// The cell one step away in `dir` (may be off the grid).
    pub fn step(self, dir: Direction) -> Cell {
        let (dx, dy) = dir.delta();
        Cell::new(self.x + dx, self.y + dy)
    }

    /// Manhattan distance between two cells.
    pub fn distance(self, other: Cell) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }
}

impl std::fmt::Display for Cell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// One of the four unit headings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    East,
    North,
    West,
    South,
}

impl Direction {
    /// Enumeration order used everywhere ties matter.
    pub const ALL: [Direction; 4] = [
        Direction::East,
        Direction::North,
        Direction::West,
        Direction::South,
    ];

    /// Unit vector `(dx, dy)`.
    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::East => (1, 0),
            Direction::North => (0, 1),
            Direction::West => (-1, 0),
            Direction::South => (0, -1),
        }
    }

    /// Heading after a 90° clockwise turn.
    pub fn clockwise(self) -> Direction {
        match self {
            Direction::East => Direction::South,
            Direction::South => Direction::West,
            Direction::West => Direction::North,
            Direction::North => Direction::East,
        }
    }

    /// Heading after a 90° counter-clockwise turn.
    pub fn counter_clockwise(self) -> Direction {
        match self {
            Direction::East => Direction::North,
            Direction::North => Direction::West,
            Direction::West => Direction::South,
            Direction::South => Direction::East,
        }
    }

    pub fn opposite(self) -> Direction {
        self.clockwise().clockwise()
    }

    /// Single-letter compass name (`e`, `n`, `w`, `s`).
    pub fn letter(self) -> char {
        match self {
            Direction::East => 'e',
            Direction::North => 'n',
            Direction::West => 'w',
            Direction::South => 's',
        }
    }
}

/// Fixed board dimensions, threaded through every component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
    pub width: i32,
    pub height: i32,
}

impl Default for Grid {
    fn default() -> Self {
        Self::new(4, 4)
    }
}

impl Grid {
    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }

    pub fn contains(&self, cell: Cell) -> bool {
        (0..self.width).contains(&cell.x) && (0..self.height).contains(&cell.y)
    }

    /// Number of cells on the board.
    pub fn cell_count(&self) -> usize {
        (self.width.max(0) * self.height.max(0)) as usize
    }

    /// Dense index of an in-bounds cell (column-major, matching [`Grid::cells`]).
    pub fn index(&self, cell: Cell) -> Option<usize> {
        if self.contains(cell) {
            Some((cell.x * self.height + cell.y) as usize)
        } else {
            None
        }
    }

    /// All cells, `x` outer and `y` inner.
    pub fn cells(&self) -> impl Iterator<Item = Cell> {
        let (width, height) = (self.width, self.height);
        (0..width).flat_map(move |x| (0..height).map(move |y| Cell::new(x, y)))
    }

    /// In-bounds orthogonal neighbors of `cell`, in [`Direction::ALL`] order.
    pub fn neighbors(&self, cell: Cell) -> Vec<Cell> {
        Direction::ALL
            .iter()
            .map(|&dir| cell.step(dir))
            .filter(|&n| self.contains(n))
            .collect()
    }

    /// Neighbors paired with the heading that reaches them.
    pub fn neighbor_steps(&self, cell: Cell) -> Vec<(Direction, Cell)> {
        Direction::ALL
            .iter()
            .map(|&dir| (dir, cell.step(dir)))
            .filter(|&(_, n)| self.contains(n))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_corner_has_two_neighbors() {
        let grid = Grid::default();
        let n = grid.neighbors(Cell::new(0, 0));
        assert_eq!(n, vec![Cell::new(1, 0), Cell::new(0, 1)]);
    }

    #[test]
    fn test_interior_order_is_east_north_west_south() {
        let grid = Grid::default();
        let n = grid.neighbors(Cell::new(1, 1));
        assert_eq!(
            n,
            vec![
                Cell::new(2, 1),
                Cell::new(1, 2),
                Cell::new(0, 1),
                Cell::new(1, 0)
            ]
        );
    }

    #[test]
    fn test_neighbors_in_bounds_and_unique() {
        for grid in [Grid::new(4, 4), Grid::new(1, 1), Grid::new(5, 2)] {
            for cell in grid.cells() {
                let n = grid.neighbors(cell);
                assert!(n.len() <= 4);
                assert!(n.iter().all(|&c| grid.contains(c)));
                for (i, a) in n.iter().enumerate() {
                    assert!(!n[i + 1..].contains(a), "duplicate neighbor of {}", cell);
                    assert_eq!(a.distance(cell), 1);
                }
            }
        }
    }

    #[test]
    fn test_single_cell_grid_has_no_neighbors() {
        assert!(Grid::new(1, 1).neighbors(Cell::new(0, 0)).is_empty());
    }

    #[test]
    fn test_rotation_cycle() {
        let mut dir = Direction::East;
        for _ in 0..4 {
            let next = dir.clockwise();
            assert_eq!(next.counter_clockwise(), dir);
            dir = next;
        }
        assert_eq!(dir, Direction::East);
        assert_eq!(Direction::North.opposite(), Direction::South);
        assert_eq!(Direction::East.clockwise(), Direction::South);
    }

    #[test]
    fn test_index_matches_cell_order() {
        let grid = Grid::new(3, 2);
        for (i, cell) in grid.cells().enumerate() {
            assert_eq!(grid.index(cell), Some(i));
        }
        assert_eq!(grid.index(Cell::new(3, 0)), None);
        assert_eq!(grid.index(Cell::new(0, -1)), None);
        assert_eq!(grid.cell_count(), 6);
    }
}
