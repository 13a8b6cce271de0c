//! One full tick: collision over every cell, then streaming over the
//! collided grid. Input and output buffers are always distinct.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::collision::collide;
use crate::grid::Grid;
use crate::streaming::stream_row;

/// How rows are scheduled within a tick. Both modes produce identical grids.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StepMode {
    Serial,
    /// Rows are distributed across the rayon thread pool.
    #[default]
    Parallel,
}

/// Apply the collision rule to every cell of `input`, writing into `out`.
pub fn collide_into(input: &Grid, out: &mut Grid, mode: StepMode) {
    check_shape(input, out);
    let src = input.cells();
    let dst = out.cells_mut();
    match mode {
        StepMode::Serial => dst
            .iter_mut()
            .zip(src)
            .for_each(|(d, s)| *d = collide(*s)),
        StepMode::Parallel => dst
            .par_iter_mut()
            .zip(src.par_iter())
            .for_each(|(d, s)| *d = collide(*s)),
    }
}

/// Stream the already-collided `input` into `out`.
pub fn stream_into(input: &Grid, out: &mut Grid, mode: StepMode) {
    check_shape(input, out);
    let width = input.width();
    let rows = out.cells_mut();
    match mode {
        StepMode::Serial => rows
            .chunks_mut(width)
            .enumerate()
            .for_each(|(row, chunk)| stream_row(input, row, chunk)),
        StepMode::Parallel => rows
            .par_chunks_mut(width)
            .enumerate()
            .for_each(|(row, chunk)| stream_row(input, row, chunk)),
    }
}

/// Advance `input` by one tick into `out`, using `scratch` for the collided
/// intermediate state. All three grids must share a shape.
pub fn step_into(input: &Grid, scratch: &mut Grid, out: &mut Grid, mode: StepMode) {
    let _span = tracing::debug_span!("lga_step", ?mode).entered();
    collide_into(input, scratch, mode);
    stream_into(scratch, out, mode);
}

/// Advance `grid` by one tick in the given mode, returning a new grid.
pub fn step_with(grid: &Grid, mode: StepMode) -> Grid {
    let mut scratch = Grid::blank_like(grid);
    let mut out = Grid::blank_like(grid);
    step_into(grid, &mut scratch, &mut out, mode);
    out
}

/// Advance `grid` by one tick. The input is left untouched.
pub fn step(grid: &Grid) -> Grid {
    step_with(grid, StepMode::Parallel)
}

fn check_shape(input: &Grid, out: &Grid) {
    assert_eq!(
        input.dimensions(),
        out.dimensions(),
        "input and output grids must share dimensions"
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::Cell;
    use latgas_common::Direction;

    #[test]
    fn step_does_not_mutate_input() {
        let mut g = Grid::new(4, 4).unwrap();
        g.set_cell(1, 1, Cell::new([1, 1, 0, 0]).unwrap()).unwrap();
        let before = g.clone();
        let _ = step(&g);
        assert_eq!(g, before);
    }

    #[test]
    fn collision_happens_before_streaming() {
        // A vertical head-on pair becomes horizontal, then both move sideways.
        let mut g = Grid::new(3, 3).unwrap();
        g.set_cell(1, 1, Cell::new([1, 1, 0, 0]).unwrap()).unwrap();
        let next = step(&g);
        assert_eq!(*next.cell(1, 0).unwrap(), Cell::single(Direction::Left));
        assert_eq!(*next.cell(1, 2).unwrap(), Cell::single(Direction::Right));
        assert!(next.cell(0, 1).unwrap().is_empty());
        assert!(next.cell(2, 1).unwrap().is_empty());
    }

    #[test]
    fn serial_and_parallel_agree() {
        let mut g = Grid::new(5, 6).unwrap();
        g.set_cell(0, 0, Cell::new([1, 0, 1, 0]).unwrap()).unwrap();
        g.set_cell(2, 3, Cell::new([0, 0, 1, 1]).unwrap()).unwrap();
        g.set_cell(4, 5, Cell::new([1, 1, 1, 1]).unwrap()).unwrap();
        g.set_wall(2, 2).unwrap();
        assert_eq!(
            step_with(&g, StepMode::Serial),
            step_with(&g, StepMode::Parallel)
        );
    }

    #[test]
    #[should_panic(expected = "share dimensions")]
    fn mismatched_buffers_panic() {
        let a = Grid::new(2, 2).unwrap();
        let mut b = Grid::new(3, 2).unwrap();
        collide_into(&a, &mut b, StepMode::Serial);
    }
}
