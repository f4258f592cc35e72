//! Belief tracking, safe path planning and control for a Wumpus-world robot.
//!
//! This crate holds all decision logic and no I/O beyond an optional trace
//! file. The robot's hardware sits behind the [`body::RobotBody`] trait; the
//! [`sim`] module provides an in-process world for tests and the harness.
//!
//! # Module Overview
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`body`] | Blocking interface to the physical or simulated robot |
//! | [`board`] | Per-cell possibility sets and inference (reduce, eliminate, deduce) |
//! | [`config`] | Grid, starting pose, solvability assumption, retry limits |
//! | [`error`] | `SolveError` for protocol and configuration failures |
//! | [`geometry`] | Cells, compass directions, grid bounds and neighbor order |
//! | [`pathfinding`] | Reverse-BFS shortest path over proven-safe cells |
//! | [`robot`] | Stage machine: explore, fetch the gold, return |
//! | [`scents`] | First reading recorded per cell |
//! | [`sim`] | Ground-truth worlds and a simulated body |
//! | [`tile`] | Possibility bitflags and decoded sensor readings |
//! | [`trace`] | Human-readable decision trace sinks |

pub mod board;
pub mod body;
pub mod config;
pub mod error;
pub mod geometry;
pub mod pathfinding;
pub mod robot;
pub mod scents;
pub mod sim;
pub mod tile;
pub mod trace;
