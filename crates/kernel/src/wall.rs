use latgas_common::Dimensions;
use serde::{Deserialize, Serialize};

use crate::error::GridError;
use crate::grid::Grid;

/// Which way the barrier runs across the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    /// A full column at `index`; holes are row numbers.
    Vertical,
    /// A full row at `index`; holes are column numbers.
    Horizontal,
}

/// A single straight barrier with passable holes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WallSpec {
    pub orientation: Orientation,
    /// Column (vertical) or row (horizontal) the barrier occupies.
    pub index: usize,
    /// Positions along the barrier that stay open.
    #[serde(default)]
    pub holes: Vec<usize>,
}

impl WallSpec {
    pub fn vertical(column: usize, holes: impl IntoIterator<Item = usize>) -> Self {
        Self {
            orientation: Orientation::Vertical,
            index: column,
            holes: holes.into_iter().collect(),
        }
    }

    pub fn horizontal(row: usize, holes: impl IntoIterator<Item = usize>) -> Self {
        Self {
            orientation: Orientation::Horizontal,
            index: row,
            holes: holes.into_iter().collect(),
        }
    }

    /// Vertical barrier a quarter of the way across, with a seven-row gap
    /// centred on the middle row (clipped to the grid).
    pub fn centered_gap(dims: Dimensions) -> Self {
        let mid = dims.height / 2;
        let start = mid.saturating_sub(3);
        let end = (mid + 4).min(dims.height);
        Self::vertical(dims.width / 4, start..end)
    }

    /// Length of the barrier and the extent it is placed across.
    fn extents(&self, dims: Dimensions) -> (usize, usize) {
        match self.orientation {
            Orientation::Vertical => (dims.height, dims.width),
            Orientation::Horizontal => (dims.width, dims.height),
        }
    }

    /// Check that the barrier and every hole fit inside `dims`.
    pub fn validate(&self, dims: Dimensions) -> Result<(), GridError> {
        let (length, across) = self.extents(dims);
        if self.index >= across {
            return Err(GridError::BarrierOutOfBounds {
                index: self.index,
                extent: across,
            });
        }
        if let Some(&hole) = self.holes.iter().find(|&&h| h >= length) {
            return Err(GridError::HoleOutOfBounds {
                hole,
                extent: length,
            });
        }
        Ok(())
    }

    /// Grid coordinates of every wall cell this barrier produces.
    pub fn cells(&self, dims: Dimensions) -> impl Iterator<Item = (usize, usize)> + '_ {
        let (length, _) = self.extents(dims);
        (0..length)
            .filter(move |pos| !self.holes.contains(pos))
            .map(move |pos| match self.orientation {
                Orientation::Vertical => (pos, self.index),
                Orientation::Horizontal => (self.index, pos),
            })
    }

    /// Stamp the barrier into `grid`. Holes are left as they are.
    pub fn apply(&self, grid: &mut Grid) -> Result<(), GridError> {
        let dims = grid.dimensions();
        self.validate(dims)?;
        for (row, col) in self.cells(dims) {
            grid.set_wall(row, col)?;
        }
        Ok(())
    }
}
