//! Lattice gas kernel: grid state, the collision + streaming transition, and
//! the simulation driver that owns the grid between ticks.
//!
//! # Invariants
//! - A step never mutates its input; output is written to a separate buffer.
//! - Total particle count is conserved by every step.
//! - Wall cells hold no particles and survive every step unchanged.
//! - Channel values stay within `0..=MAX_OCCUPANCY`.

pub mod cell;
pub mod collision;
pub mod config;
pub mod error;
pub mod grid;
pub mod seed;
pub mod sim;
pub mod streaming;
pub mod transition;
pub mod wall;

pub use cell::{Cell, MAX_OCCUPANCY};
pub use config::SimConfig;
pub use error::GridError;
pub use grid::Grid;
pub use seed::{SeedRegion, initialize};
pub use sim::{RunOutcome, Simulation, TickReport};
pub use transition::{StepMode, step, step_with};
pub use wall::{Orientation, WallSpec};

pub fn crate_info() -> &'static str {
    "latgas-kernel v0.1.0"
}
