//! Wumpus World Headless Harness
//!
//! Replays the world catalogue, checks the planner and sweeps random worlds
//! through the real controller. Runs entirely in-process; no robot needed.
//!
//! Usage:
//!   cargo run -p wumpus-simtest
//!   cargo run -p wumpus-simtest -- --verbose
//!   cargo run -p wumpus-simtest -- --seed 7 --sweep 500 --trace trace.txt
//!   cargo run -p wumpus-simtest -- --console

use std::io::{self, BufRead, Write};

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::Deserialize;
use wumpus_logic::board::Board;
use wumpus_logic::body::RobotBody;
use wumpus_logic::config::{RobotConfig, Solvability};
use wumpus_logic::error::SolveError;
use wumpus_logic::geometry::{Cell, Direction, Grid};
use wumpus_logic::pathfinding::{shortest_path, trace_path};
use wumpus_logic::robot::{Outcome, Robot};
use wumpus_logic::sim::{SimBody, World};
use wumpus_logic::tile::Tile;
use wumpus_logic::trace::{FileTrace, TraceSink};

// ── World catalogue (compiled in) ───────────────────────────────────────
const WORLDS_JSON: &str = include_str!("../../../data/worlds.json");

const DEFAULT_SEED: u64 = 42;
const DEFAULT_SWEEP: usize = 200;
const PIT_PROBABILITY: f64 = 0.2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
enum Expect {
    Done,
    Unsolvable,
    Any,
}

#[derive(Debug, Deserialize)]
struct WorldCase {
    name: String,
    expect: Expect,
    #[serde(default)]
    assumption: Solvability,
    #[serde(flatten)]
    world: World,
}

// ── Test harness ────────────────────────────────────────────────────────

struct TestResult {
    name: String,
    passed: bool,
    detail: String,
}

struct Args {
    verbose: bool,
    console: bool,
    trace: Option<String>,
    seed: u64,
    sweep: usize,
}

fn parse_args() -> Args {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let value_of = |flag: &str| {
        args.iter()
            .position(|a| a == flag)
            .and_then(|i| args.get(i + 1))
            .cloned()
    };
    Args {
        verbose: args.iter().any(|a| a == "--verbose"),
        console: args.iter().any(|a| a == "--console"),
        trace: value_of("--trace"),
        seed: value_of("--seed")
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_SEED),
        sweep: value_of("--sweep")
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_SWEEP),
    }
}

fn main() {
    let args = parse_args();
    let default_filter = if args.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format(|buf, record| {
            writeln!(
                buf,
                "[{}] {} - {}",
                record.level(),
                record.target(),
                record.args()
            )
        })
        .init();

    if args.console {
        std::process::exit(run_console(&args));
    }

    println!("=== Wumpus World Harness ===\n");

    let mut results = Vec::new();

    // 1. Catalogue replay
    results.extend(validate_catalogue(&args));

    // 2. Planner on synthetic boards
    results.extend(validate_planner());

    // 3. Random worlds
    results.extend(validate_sweep(&args));

    // ── Summary ──
    println!();
    let passed = results.iter().filter(|r| r.passed).count();
    let failed = results.iter().filter(|r| !r.passed).count();
    let total = results.len();

    for r in &results {
        let icon = if r.passed { "✓" } else { "✗" };
        if !r.passed || args.verbose {
            println!("  {} {}: {}", icon, r.name, r.detail);
        }
    }

    println!(
        "\n=== RESULT: {}/{} passed, {} failed ===",
        passed, total, failed
    );

    if failed > 0 {
        std::process::exit(1);
    }
}

/// Run the controller on `world` to completion.
fn solve(
    world: &World,
    config: RobotConfig,
    label: &str,
    trace: Option<&str>,
) -> Result<(Outcome, SimBody), SolveError> {
    let body = SimBody::new(world.clone(), config.start, config.facing);
    let robot = Robot::new(body, config)?;
    let Some(path) = trace else {
        return drive(robot);
    };
    match FileTrace::append(path) {
        Ok(mut sink) => {
            sink.record(&format!("=== {} ===", label));
            drive(robot.with_trace(sink))
        }
        Err(e) => {
            log::warn!("cannot open trace file {}: {}", path, e);
            drive(robot)
        }
    }
}

fn drive<T: TraceSink>(mut robot: Robot<SimBody, T>) -> Result<(Outcome, SimBody), SolveError> {
    let outcome = robot.run()?;
    Ok((outcome, robot.into_body()))
}

/// Alive, holding the gold and back on the start cell.
fn retrieved(body: &SimBody, start: Cell) -> bool {
    body.death().is_none() && body.gold_reached() && body.position() == start
}

fn summarize(outcome: Outcome, body: &SimBody) -> String {
    format!(
        "{:?} after {} moves, {} turns, {} readings, {} arrow(s){}",
        outcome,
        body.moves(),
        body.turns(),
        body.readings(),
        body.arrows_fired(),
        body.death()
            .map(|d| format!(", died: {:?}", d))
            .unwrap_or_default()
    )
}

// ── 1. World Catalogue ──────────────────────────────────────────────────

fn validate_catalogue(args: &Args) -> Vec<TestResult> {
    println!("--- World Catalogue ---");
    let mut results = Vec::new();

    let cases: Vec<WorldCase> = match serde_json::from_str(WORLDS_JSON) {
        Ok(c) => c,
        Err(e) => {
            results.push(TestResult {
                name: "catalogue_parse".into(),
                passed: false,
                detail: format!("JSON parse error: {}", e),
            });
            return results;
        }
    };

    results.push(TestResult {
        name: "catalogue_not_empty".into(),
        passed: !cases.is_empty(),
        detail: format!("{} worlds loaded", cases.len()),
    });

    for case in &cases {
        let config = RobotConfig {
            assumption: case.assumption,
            ..RobotConfig::for_grid(case.world.grid)
        };
        if let Err(e) = case.world.validate(config.start) {
            results.push(TestResult {
                name: format!("{}_well_formed", case.name),
                passed: false,
                detail: e.to_string(),
            });
            continue;
        }

        let (outcome, body) = match solve(&case.world, config.clone(), &case.name, args.trace.as_deref()) {
            Ok(r) => r,
            Err(e) => {
                results.push(TestResult {
                    name: case.name.clone(),
                    passed: false,
                    detail: format!("solver error: {}", e),
                });
                continue;
            }
        };

        let passed = match case.expect {
            Expect::Done => outcome == Outcome::Done && retrieved(&body, config.start),
            Expect::Unsolvable => outcome == Outcome::Unsolvable && body.death().is_none(),
            Expect::Any => true,
        };
        results.push(TestResult {
            name: case.name.clone(),
            passed,
            detail: format!("expected {:?}, {}", case.expect, summarize(outcome, &body)),
        });
    }

    results
}

// ── 2. Planner ──────────────────────────────────────────────────────────

/// Every cell known empty except the listed pits.
fn open_board(grid: Grid, pits: &[Cell]) -> Board {
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

fn validate_planner() -> Vec<TestResult> {
    println!("--- Planner ---");
    let mut results = Vec::new();
    let grid = Grid::default();
    let origin = Cell::new(0, 0);

    let open = open_board(grid, &[]);
    let same = shortest_path(&open, Cell::new(2, 2), Cell::new(2, 2));
    results.push(TestResult {
        name: "planner_same_cell".into(),
        passed: same == Some(vec![]),
        detail: "start == goal → empty path".into(),
    });

    let adjacent = shortest_path(&open, origin, Cell::new(1, 0));
    results.push(TestResult {
        name: "planner_adjacent".into(),
        passed: adjacent == Some(vec![Direction::East]),
        detail: "(0, 0) → (1, 0) = [e]".into(),
    });

    let pits = [Cell::new(1, 1), Cell::new(2, 1)];
    let detour = shortest_path(&open_board(grid, &pits), origin, Cell::new(2, 2));
    let avoids = detour
        .as_ref()
        .map(|path| trace_path(origin, path))
        .is_some_and(|cells| cells.iter().all(|c| !pits.contains(c)));
    results.push(TestResult {
        name: "planner_detour".into(),
        passed: avoids && detour.as_ref().map(Vec::len) == Some(4),
        detail: format!(
            "around pits {:?}: {}",
            pits,
            detour
                .as_ref()
                .map(|p| p.iter().map(|d| d.letter()).collect::<String>())
                .unwrap_or_else(|| "none".into())
        ),
    });

    let enclosed = open_board(grid, &[Cell::new(2, 3), Cell::new(3, 2)]);
    results.push(TestResult {
        name: "planner_enclosed".into(),
        passed: shortest_path(&enclosed, origin, Cell::new(3, 3)).is_none(),
        detail: "walled-off corner → no path".into(),
    });

    results.push(TestResult {
        name: "planner_out_of_bounds".into(),
        passed: shortest_path(&open, origin, Cell::new(4, 0)).is_none()
            && shortest_path(&open, Cell::new(-1, 0), origin).is_none(),
        detail: "off-grid endpoints → no path".into(),
    });

    let hazard_goal = open_board(grid, &[Cell::new(3, 3)]);
    results.push(TestResult {
        name: "planner_goal_unchecked".into(),
        passed: shortest_path(&hazard_goal, Cell::new(3, 2), Cell::new(3, 3))
            == Some(vec![Direction::North]),
        detail: "goal may be a hazard cell".into(),
    });

    let fresh = Board::new(grid);
    results.push(TestResult {
        name: "planner_unknown_board".into(),
        passed: shortest_path(&fresh, origin, Cell::new(1, 0)).is_some()
            && shortest_path(&fresh, origin, Cell::new(2, 0)).is_none(),
        detail: "unknown board reaches only neighbors".into(),
    });

    results
}

// ── 3. Random sweep ─────────────────────────────────────────────────────

fn random_world(rng: &mut StdRng, grid: Grid, start: Cell, hazards: bool) -> World {
    let cells: Vec<Cell> = grid.cells().collect();
    let gold = cells.choose(rng).copied().unwrap_or(start);
    if !hazards {
        return World {
            grid,
            gold,
            wumpus: None,
            pits: Vec::new(),
        };
    }
    let free: Vec<Cell> = cells
        .into_iter()
        .filter(|&c| c != start && c != gold)
        .collect();
    let wumpus = free.choose(rng).copied();
    let pits = free
        .into_iter()
        .filter(|&c| Some(c) != wumpus && rng.gen_bool(PIT_PROBABILITY))
        .collect();
    World {
        grid,
        gold,
        wumpus,
        pits,
    }
}

fn validate_sweep(args: &Args) -> Vec<TestResult> {
    println!("--- Random Sweep (seed {}, {} worlds) ---", args.seed, args.sweep);
    let mut results = Vec::new();
    let mut rng = StdRng::seed_from_u64(args.seed);

    // Gold only: always solvable, on varied board sizes
    let mut failures = Vec::new();
    for _ in 0..args.sweep {
        let grid = Grid::new(rng.gen_range(2..=5), rng.gen_range(2..=5));
        let config = RobotConfig::for_grid(grid);
        let world = random_world(&mut rng, grid, config.start, false);
        match solve(&world, config.clone(), "sweep_gold_only", None) {
            Ok((Outcome::Done, body)) if retrieved(&body, config.start) => {}
            Ok((outcome, body)) => failures.push(format!(
                "{}×{} gold {}: {}",
                grid.width,
                grid.height,
                world.gold,
                summarize(outcome, &body)
            )),
            Err(e) => failures.push(format!("gold {}: {}", world.gold, e)),
        }
    }
    results.push(TestResult {
        name: "sweep_gold_only".into(),
        passed: failures.is_empty(),
        detail: match failures.first() {
            None => format!("{} worlds retrieved", args.sweep),
            Some(first) => format!("{} failures, first: {}", failures.len(), first),
        },
    });

    // With hazards: must always terminate, and a claimed success must be real
    let grid = Grid::default();
    let config = RobotConfig::for_grid(grid);
    let (mut done, mut unsolvable, mut died) = (0, 0, 0);
    let mut errors = Vec::new();
    let mut false_success = 0;
    for _ in 0..args.sweep {
        let world = random_world(&mut rng, grid, config.start, true);
        match solve(&world, config.clone(), "sweep_hazards", None) {
            Ok((_, body)) if body.death().is_some() => died += 1,
            Ok((Outcome::Done, body)) => {
                done += 1;
                if !retrieved(&body, config.start) {
                    false_success += 1;
                }
            }
            Ok((Outcome::Unsolvable, _)) => unsolvable += 1,
            Err(e) => errors.push(format!("{:?}: {}", world, e)),
        }
    }
    results.push(TestResult {
        name: "sweep_hazards_terminate".into(),
        passed: errors.is_empty(),
        detail: match errors.first() {
            None => format!(
                "{} done, {} unsolvable, {} died on unsolvable worlds",
                done, unsolvable, died
            ),
            Some(first) => format!("{} errors, first: {}", errors.len(), first),
        },
    });
    results.push(TestResult {
        name: "sweep_hazards_success_is_real".into(),
        passed: false_success == 0,
        detail: format!("{} of {} successes verified", done - false_success, done),
    });

    results
}

// ── Console moderator ───────────────────────────────────────────────────

/// Speaks the line protocol of a human or scripted moderator: moves print
/// `e`/`w`/`n`/`s`, the arrow prints `kill <dir>`, readings are read as
/// integers after an `input:` prompt. The start cell is never asked about.
struct ConsoleBody<R, W> {
    input: R,
    output: W,
    origin: Cell,
    position: Cell,
    facing: Direction,
}

impl<R: BufRead, W: Write> ConsoleBody<R, W> {
    fn new(input: R, output: W, config: &RobotConfig) -> Self {
        Self {
            input,
            output,
            origin: config.start,
            position: config.start,
            facing: config.facing,
        }
    }

    fn say(&mut self, line: &str) {
        if let Err(e) = writeln!(self.output, "{}", line).and_then(|_| self.output.flush()) {
            log::warn!("console write failed: {}", e);
        }
    }
}

impl<R: BufRead, W: Write> RobotBody for ConsoleBody<R, W> {
    fn get_reading(&mut self) -> u8 {
        if self.position == self.origin {
            return 0;
        }
        self.say("input:");
        let mut line = String::new();
        match self.input.read_line(&mut line) {
            Ok(0) => {
                log::warn!("console input closed");
                u8::MAX
            }
            Ok(_) => line.trim().parse().unwrap_or_else(|_| {
                log::warn!("unreadable reading {:?}", line.trim());
                u8::MAX
            }),
            Err(e) => {
                log::warn!("console read failed: {}", e);
                u8::MAX
            }
        }
    }

    fn trigger_disable_action(&mut self) {
        let line = format!("kill {}", self.facing.letter());
        self.say(&line);
    }

    fn rotate_clockwise(&mut self) {
        self.facing = self.facing.clockwise();
    }

    fn rotate_counterclockwise(&mut self) {
        self.facing = self.facing.counter_clockwise();
    }

    fn rotate_180(&mut self) {
        self.facing = self.facing.opposite();
    }

    fn advance(&mut self) {
        let line = self.facing.letter().to_string();
        self.say(&line);
        self.position = self.position.step(self.facing);
    }
}

/// Play one game against stdin/stdout. Returns the process exit code.
fn run_console(args: &Args) -> i32 {
    let config = RobotConfig::default();
    let body = ConsoleBody::new(io::stdin().lock(), io::stdout(), &config);
    let robot = match Robot::new(body, config) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("invalid configuration: {}", e);
            return 1;
        }
    };
    let outcome = match args.trace.as_deref().map(FileTrace::append) {
        Some(Ok(sink)) => robot.with_trace(sink).run(),
        Some(Err(e)) => {
            log::warn!("cannot open trace file: {}", e);
            let mut robot = robot;
            robot.run()
        }
        None => {
            let mut robot = robot;
            robot.run()
        }
    };
    match outcome {
        Ok(Outcome::Done) => 0,
        Ok(Outcome::Unsolvable) => {
            eprintln!("this world is not solvable");
            2
        }
        Err(e) => {
            eprintln!("stopped: {}", e);
            1
        }
    }
}
