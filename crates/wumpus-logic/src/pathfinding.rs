//! Shortest safe paths over the belief board.
//!
//! BFS runs backwards from the goal, labelling every reachable cell with its
//! number of moves to the goal. The path is then read off forwards from the
//! start by always stepping to a neighbor labelled one less, trying
//! directions in east, north, west, south order. All moves cost 1, so BFS
//! order is already cost order.
//!
//! Intermediate cells must rule out both hazards. The start (where the
//! robot already stands) and the goal (which may be an unexplored or hazard
//! cell the robot wants to approach) are never checked.

use std::collections::VecDeque;

use crate::board::Board;
use crate::geometry::{Cell, Direction};

/// Minimal sequence of headings leading from `start` to `goal`.
///
/// Returns `Some(vec![])` if `start == goal`, and `None` if either cell is
/// off the grid or no safe route exists.
pub fn shortest_path(board: &Board, start: Cell, goal: Cell) -> Option<Vec<Direction>> {
    let grid = board.grid();
    let (start_idx, goal_idx) = (grid.index(start)?, grid.index(goal)?);
    if start == goal {
        return Some(Vec::new());
    }

    // no route can take this many moves
    let unreached = grid.cell_count();
    let blocked = unreached + 1;
    let mut costs = vec![unreached; grid.cell_count()];
    costs[goal_idx] = 0;

    let mut queue = VecDeque::new();
    queue.push_back(goal);
    while let Some(cell) = queue.pop_front() {
        if cell == start {
            break;
        }
        let Some(idx) = grid.index(cell) else {
            continue;
        };
        if cell != goal && !board.tile(cell).is_safe() {
            costs[idx] = blocked;
            continue;
        }
        for next in grid.neighbors(cell) {
            if let Some(next_idx) = grid.index(next) {
                if costs[next_idx] == unreached {
                    costs[next_idx] = costs[idx] + 1;
                    queue.push_back(next);
                }
            }
        }
    }

    if costs[start_idx] >= unreached {
        return None;
    }

    let mut path = Vec::with_capacity(costs[start_idx]);
    let mut cell = start;
    let mut cost = costs[start_idx];
    while cost > 0 {
        let (dir, next) = grid
            .neighbor_steps(cell)
            .into_iter()
            .find(|&(_, n)| grid.index(n).is_some_and(|i| costs[i] == cost - 1))?;
        path.push(dir);
        cell = next;
        cost -= 1;
    }
    Some(path)
}

/// Whether a safe route from `start` to `goal` exists.
pub fn is_reachable(board: &Board, start: Cell, goal: Cell) -> bool {
    shortest_path(board, start, goal).is_some()
}

/// Cells visited when following `path` from `start` (excluding `start`).
pub fn trace_path(start: Cell, path: &[Direction]) -> Vec<Cell> {
    path.iter()
        .scan(start, |cell, &dir| {
            *cell = cell.step(dir);
            Some(*cell)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Grid;
    use crate::tile::Tile;

    fn c(x: i32, y: i32) -> Cell {
        Cell::new(x, y)
    }

    /// Every cell known empty except the listed pits.
    fn board_with_pits(pits: &[Cell]) -> Board {
        let grid = Grid::default();
        let mut board = Board::new(grid);
        for cell in grid.cells() {
            let mask = if pits.contains(&cell) {
                Tile::PIT
            } else {
                Tile::EMPTY
            };
            board.narrow(cell, mask);
        }
        board
    }

    #[test]
    fn test_same_cell() {
        let board = board_with_pits(&[]);
        assert_eq!(shortest_path(&board, c(2, 2), c(2, 2)), Some(vec![]));
    }

    #[test]
    fn test_adjacent_cells() {
        let board = board_with_pits(&[]);
        assert_eq!(
            shortest_path(&board, c(0, 0), c(1, 0)),
            Some(vec![Direction::East])
        );
        assert_eq!(
            shortest_path(&board, c(1, 1), c(1, 0)),
            Some(vec![Direction::South])
        );
    }

    #[test]
    fn test_detour_around_pits() {
        let pits = [c(1, 1), c(2, 1)];
        let board = board_with_pits(&pits);
        let path = shortest_path(&board, c(0, 0), c(2, 2)).unwrap();
        assert_eq!(path.len(), 4);
        let cells = trace_path(c(0, 0), &path);
        assert_eq!(cells.last(), Some(&c(2, 2)));
        assert!(cells.iter().all(|cell| !pits.contains(cell)));
        // north before east on ties
        assert_eq!(
            path,
            vec![
                Direction::North,
                Direction::North,
                Direction::East,
                Direction::East
            ]
        );
    }

    #[test]
    fn test_enclosed_goal_unreachable() {
        let board = board_with_pits(&[c(2, 3), c(3, 2)]);
        assert_eq!(shortest_path(&board, c(0, 0), c(3, 3)), None);
        assert!(!is_reachable(&board, c(0, 0), c(3, 3)));
    }

    #[test]
    fn test_goal_is_not_checked() {
        let board = board_with_pits(&[c(3, 3)]);
        assert_eq!(
            shortest_path(&board, c(3, 2), c(3, 3)),
            Some(vec![Direction::North])
        );
    }

    #[test]
    fn test_start_is_not_checked() {
        let board = board_with_pits(&[c(0, 0)]);
        assert_eq!(
            shortest_path(&board, c(0, 0), c(0, 2)),
            Some(vec![Direction::North, Direction::North])
        );
    }

    #[test]
    fn test_possible_wumpus_blocks_traversal() {
        let grid = Grid::default();
        // wall of possible wumpus cells across y = 1
        let mut wall = Board::new(grid);
        for cell in grid.cells() {
            let mask = if cell.y == 1 { Tile::WUMPUS } else { Tile::EMPTY };
            wall.narrow(cell, mask);
        }
        assert_eq!(shortest_path(&wall, c(0, 0), c(0, 3)), None);
        // but one of them can still be the goal
        assert_eq!(
            shortest_path(&wall, c(0, 0), c(0, 1)),
            Some(vec![Direction::North])
        );

        let mut single = Board::new(grid);
        for cell in grid.cells() {
            let mask = if cell == c(0, 1) { Tile::WUMPUS } else { Tile::EMPTY };
            single.narrow(cell, mask);
        }
        let path = shortest_path(&single, c(0, 0), c(0, 2)).unwrap();
        assert_eq!(
            trace_path(c(0, 0), &path),
            vec![c(1, 0), c(1, 1), c(1, 2), c(0, 2)]
        );
    }

    #[test]
    fn test_out_of_bounds() {
        let board = board_with_pits(&[]);
        assert_eq!(shortest_path(&board, c(0, 0), c(4, 0)), None);
        assert_eq!(shortest_path(&board, c(-1, 0), c(0, 0)), None);
    }

    #[test]
    fn test_unknown_board_only_reaches_neighbors() {
        let board = Board::new(Grid::default());
        assert!(is_reachable(&board, c(0, 0), c(1, 0)));
        assert!(!is_reachable(&board, c(0, 0), c(2, 0)));
    }

    #[test]
    fn test_path_length_is_minimal_on_open_board() {
        let board = board_with_pits(&[]);
        let grid = board.grid();
        for goal in grid.cells() {
            let path = shortest_path(&board, c(0, 0), goal).unwrap();
            assert_eq!(path.len() as u32, goal.distance(c(0, 0)));
        }
    }
}
