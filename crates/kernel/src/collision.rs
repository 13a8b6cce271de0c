//! Local collision rule.
//!
//! Only exact head-on pairs interact: a vertical pair with both horizontal
//! channels empty turns into a horizontal pair, and vice versa. Every other
//! configuration passes through untouched.

use crate::cell::Cell;

const VERTICAL_PAIR: [u8; 4] = [1, 1, 0, 0];
const HORIZONTAL_PAIR: [u8; 4] = [0, 0, 1, 1];

/// Apply the collision rule to one cell. Walls are returned unchanged.
///
/// The cell is taken by value, so all four inputs are read before any output
/// channel is produced.
pub fn collide(cell: Cell) -> Cell {
    if cell.is_wall() {
        return cell;
    }
    match cell.channels() {
        VERTICAL_PAIR => Cell::from_channels_unchecked(HORIZONTAL_PAIR),
        HORIZONTAL_PAIR => Cell::from_channels_unchecked(VERTICAL_PAIR),
        _ => cell,
    }
}
