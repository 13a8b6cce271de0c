//! Shared types and utilities for the lattice gas workspace.

mod types;

pub use types::{Dimensions, Direction, Rgb};
