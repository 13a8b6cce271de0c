//! Streaming (propagation) with bounce-back at walls and grid edges.
//!
//! Formulated as a gather: output cell `(i, j)` channel `c` has exactly one
//! source. Let `n` be the neighbour of `(i, j)` in direction `opposite(c)`,
//! i.e. the cell a `c`-moving particle would arrive from.
//! - If `n` is an open in-grid cell, its channel `c` advances into `(i, j)`.
//! - Otherwise a particle at `(i, j)` heading towards `n` in channel
//!   `opposite(c)` has bounced back into channel `c`.
//!
//! Each output cell depends only on the immutable input, so rows can be
//! written concurrently without coordination.

use latgas_common::Direction;

use crate::cell::{Cell, MAX_OCCUPANCY};
use crate::grid::Grid;

/// Post-streaming state of `(row, col)` computed from the pre-streaming grid.
///
/// # Panics
/// If `(row, col)` is outside the grid, or if a channel value above
/// `MAX_OCCUPANCY` would be produced.
pub fn gather(input: &Grid, row: usize, col: usize) -> Cell {
    let dims = input.dimensions();
    let here = match input.cell(row, col) {
        Some(cell) if cell.is_wall() => return Cell::WALL,
        Some(cell) => *cell,
        None => panic!("gather outside grid at ({row}, {col})"),
    };

    let mut channels = [0u8; 4];
    for dir in Direction::ALL {
        let back = dir.opposite();
        let source = dims
            .neighbor(row, col, back)
            .and_then(|(r, c)| input.cell(r, c))
            .filter(|n| !n.is_wall());
        let value = match source {
            Some(n) => n.get(dir),
            None => here.get(back),
        };
        assert!(
            value <= MAX_OCCUPANCY,
            "channel overflow at ({row}, {col}) {dir:?}: {value} > {MAX_OCCUPANCY}"
        );
        channels[dir.index()] = value;
    }
    Cell::from_channels_unchecked(channels)
}

/// Fill one output row from the pre-streaming grid.
pub(crate) fn stream_row(input: &Grid, row: usize, out: &mut [Cell]) {
    for (col, slot) in out.iter_mut().enumerate() {
        *slot = gather(input, row, col);
    }
}
