//! Rendering Adapter: renderer-agnostic interface over the lattice gas grid.
//!
//! # Invariants
//! - Renderers only read the grid; they never mutate simulation state.
//! - Output is derived solely from `Grid::is_wall` and `Grid::occupancy_sum`.

mod raster;
mod renderer;

pub use raster::{Frame, Palette, RasterRenderer, RenderConfig, RenderError};
pub use renderer::{AsciiRenderer, Renderer};

pub fn crate_info() -> &'static str {
    "latgas-render v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("render"));
    }
}
