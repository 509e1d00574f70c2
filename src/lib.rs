//! # Torus Life
//!
//! Core of a Conway's Game of Life simulation on a toroidal grid.
//!
//! ## Features
//!
//! * Double-buffered generation stepping with wrap-around neighbours
//! * Fixed-timestep loop decoupled from the caller's frame rate
//! * Freehand painting gestures and stamping of named patterns
//! * Random pattern placement that keeps the pattern inside the grid
//!
//! The [`Engine`] owns all state. Rendering and input wiring are left to the
//! caller; the `torus-life` binary drives it from a terminal UI.

pub mod config;
pub mod controller;
pub mod error;
pub mod grid;
pub mod patterns;
pub mod placement;
pub mod simulation;

pub use config::SimConfig;
pub use controller::{Engine, PlacementMode, RunState};
pub use error::{LifeError, Result};
pub use grid::Grid;
pub use patterns::{Pattern, PATTERNS};
pub use simulation::{Stats, StepOutcome};
