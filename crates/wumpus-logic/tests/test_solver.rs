//! End-to-end runs of the controller against simulated worlds.
//!
//! Exercises: SimBody → Robot::run → Board/Scents/planner → Outcome

use wumpus_logic::config::{RobotConfig, Solvability};
use wumpus_logic::geometry::{Cell, Grid};
use wumpus_logic::robot::{Outcome, Robot, Stage};
use wumpus_logic::sim::{SimBody, World};
use wumpus_logic::tile::Tile;

// ── Helpers ────────────────────────────────────────────────────────────

fn c(x: i32, y: i32) -> Cell {
    Cell::new(x, y)
}

fn world(gold: Cell, wumpus: Option<Cell>, pits: &[Cell]) -> World {
    World {
        grid: Grid::default(),
        gold,
        wumpus,
        pits: pits.to_vec(),
    }
}

/// Solve `world` and return the finished robot.
fn solve(world: World, config: RobotConfig) -> (Outcome, Robot<SimBody, Vec<String>>) {
    world.validate(config.start).unwrap();
    let body = SimBody::new(world, config.start, config.facing);
    let mut robot = Robot::new(body, config).unwrap().with_trace(Vec::<String>::new());
    let outcome = robot.run().unwrap();
    (outcome, robot)
}

fn assert_retrieved(robot: &Robot<SimBody, Vec<String>>) {
    let body = robot.body();
    assert_eq!(body.death(), None, "robot died");
    assert!(body.gold_reached(), "gold never reached");
    assert_eq!(body.position(), robot.config().start);
    assert_eq!(robot.position(), robot.config().start);
    assert_eq!(robot.facing(), body.facing());
    assert_eq!(robot.stage(), Stage::Done);
    assert!(robot.visits() <= robot.config().max_visits());
}

// ── Hand-checked worlds ────────────────────────────────────────────────

#[test]
fn glitter_leads_straight_to_gold() {
    let (outcome, robot) = solve(
        world(c(0, 2), Some(c(3, 3)), &[c(3, 0)]),
        RobotConfig::default(),
    );
    assert_eq!(outcome, Outcome::Done);
    assert_retrieved(&robot);
    assert_eq!(robot.visits(), 3);
    assert!(robot.scents().is_sensed(c(0, 2)));
    assert!(robot.has_arrow());
}

#[test]
fn breeze_at_start_forces_a_safe_guess() {
    let (outcome, robot) = solve(world(c(0, 2), None, &[c(1, 0)]), RobotConfig::default());
    assert_eq!(outcome, Outcome::Done);
    assert_retrieved(&robot);
    assert!(!robot.scents().is_sensed(c(1, 0)));
    assert_eq!(robot.board().gold(), Some(c(0, 2)));
    assert_eq!(robot.board().tile(c(1, 0)), Tile::PIT);
}

#[test]
fn stench_at_start_shoots_before_stepping() {
    let (outcome, robot) = solve(world(c(2, 0), Some(c(0, 1)), &[]), RobotConfig::default());
    assert_eq!(outcome, Outcome::Done);
    assert_retrieved(&robot);
    assert!(!robot.has_arrow());
    assert_eq!(robot.body().arrows_fired(), 1);
    assert!(!robot.body().wumpus_alive());
    assert!(robot.trace().iter().any(|line| line.starts_with("forced risk on (0, 1)")));
}

#[test]
fn gold_only_worlds_always_finish() {
    let grid = Grid::default();
    for gold in grid.cells() {
        let (outcome, robot) = solve(world(gold, None, &[]), RobotConfig::default());
        assert_eq!(outcome, Outcome::Done, "gold at {}", gold);
        assert_retrieved(&robot);
        assert!(robot.has_arrow(), "no reason to shoot with gold at {}", gold);
    }
}

#[test]
fn non_square_grid() {
    let grid = Grid::new(3, 2);
    let world = World {
        grid,
        gold: c(2, 1),
        wumpus: None,
        pits: vec![],
    };
    let (outcome, robot) = solve(world, RobotConfig::for_grid(grid));
    assert_eq!(outcome, Outcome::Done);
    assert_retrieved(&robot);
}

#[test]
fn boxed_in_start_without_assumption_is_unsolvable() {
    let config = RobotConfig {
        assumption: Solvability::Unknown,
        ..RobotConfig::default()
    };
    let (outcome, robot) = solve(world(c(3, 3), None, &[c(1, 0), c(0, 1)]), config);
    assert_eq!(outcome, Outcome::Unsolvable);
    assert_eq!(robot.body().moves(), 0);
    assert_eq!(robot.body().turns(), 0);
    assert_eq!(robot.stage(), Stage::Exploring);
    assert!(robot.trace().iter().any(|line| line.starts_with("unsolvable")));
}

#[test]
fn unsolvable_halt_issues_no_more_moves() {
    let config = RobotConfig {
        assumption: Solvability::Unknown,
        ..RobotConfig::default()
    };
    let (_, mut robot) = solve(world(c(3, 3), None, &[c(1, 0), c(0, 1)]), config);
    let moves = robot.body().moves();
    assert_eq!(robot.run(), Ok(Outcome::Unsolvable));
    assert_eq!(robot.body().moves(), moves);
}

#[test]
fn gold_under_start_needs_no_moves() {
    let (outcome, robot) = solve(world(c(0, 0), Some(c(3, 3)), &[c(2, 2)]), RobotConfig::default());
    assert_eq!(outcome, Outcome::Done);
    assert_retrieved(&robot);
    assert_eq!(robot.body().moves(), 0);
    assert_eq!(robot.visits(), 1);
}

#[test]
fn start_away_from_corner() {
    let config = RobotConfig {
        start: c(2, 1),
        ..RobotConfig::default()
    };
    let (outcome, robot) = solve(world(c(0, 3), None, &[]), config);
    assert_eq!(outcome, Outcome::Done);
    assert_retrieved(&robot);
}

#[test]
fn board_stays_consistent_with_truth() {
    let truth = world(c(0, 2), Some(c(3, 3)), &[c(3, 0)]);
    let (_, robot) = solve(truth.clone(), RobotConfig::default());
    let board = robot.board();
    assert!(board.tile(truth.gold).contains(Tile::GOLD));
    for pit in &truth.pits {
        assert!(board.tile(*pit).contains(Tile::PIT));
    }
    if let Some(w) = truth.wumpus {
        assert!(board.tile(w).contains(Tile::WUMPUS));
    }
}

// ── Worlds without a wumpus ────────────────────────────────────────────

#[test]
fn lone_wumpus_candidate_keeps_its_pit_bit() {
    // after glitter at (2,2) only (3,3) can still hold a wumpus, but none
    // was ever smelled, so (3,3) must stay unsafe
    let (outcome, robot) = solve(
        world(c(3, 2), None, &[c(1, 3), c(3, 3)]),
        RobotConfig::default(),
    );
    assert_eq!(outcome, Outcome::Done);
    assert_retrieved(&robot);
    assert_eq!(robot.board().wumpus(), None);
    assert_eq!(robot.board().tile(c(3, 3)), Tile::PIT);
    assert!(!robot.trace().iter().any(|line| line.starts_with("forced risk")));
}

#[test]
fn pits_only_worlds_never_die_without_a_forced_risk() {
    let grid = Grid::default();
    let start = RobotConfig::default().start;
    let mut runs = 0;
    for gold in grid.cells().filter(|&g| g != start) {
        let free: Vec<Cell> = grid
            .cells()
            .filter(|&cell| cell != start && cell != gold)
            .collect();
        let mut pit_sets: Vec<Vec<Cell>> = vec![Vec::new()];
        for (i, &a) in free.iter().enumerate() {
            pit_sets.push(vec![a]);
            for &b in &free[i + 1..] {
                pit_sets.push(vec![a, b]);
            }
        }
        for pits in pit_sets {
            let (outcome, robot) = solve(world(gold, None, &pits), RobotConfig::default());
            runs += 1;
            assert_eq!(robot.board().wumpus(), None, "gold {} pits {:?}", gold, pits);
            if robot.trace().iter().any(|line| line.starts_with("forced risk")) {
                continue;
            }
            assert_eq!(robot.body().death(), None, "gold {} pits {:?}", gold, pits);
            if outcome == Outcome::Done {
                assert_retrieved(&robot);
            }
        }
    }
    assert!(runs > 1000);
}
