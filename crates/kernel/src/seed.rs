use std::ops::Range;

use latgas_common::{Dimensions, Direction};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::cell::Cell;
use crate::error::GridError;
use crate::grid::Grid;
use crate::wall::WallSpec;

/// Rectangular block of cells that receives random particles at startup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedRegion {
    pub rows: Range<usize>,
    pub cols: Range<usize>,
}

impl SeedRegion {
    pub fn new(rows: Range<usize>, cols: Range<usize>) -> Self {
        Self { rows, cols }
    }

    /// Every cell of the grid.
    pub fn whole(dims: Dimensions) -> Self {
        Self::new(0..dims.height, 0..dims.width)
    }

    /// All rows, columns left of `col`.
    pub fn left_of(dims: Dimensions, col: usize) -> Self {
        Self::new(0..dims.height, 0..col.min(dims.width))
    }

    pub fn validate(&self, dims: Dimensions) -> Result<(), GridError> {
        if self.rows.end > dims.height || self.cols.end > dims.width {
            return Err(GridError::RegionOutOfBounds {
                rows: self.rows.clone(),
                cols: self.cols.clone(),
                height: dims.height,
                width: dims.width,
            });
        }
        Ok(())
    }
}

/// Build a grid of `height x width`, stamp `wall` into it, then fill each
/// channel of every open cell in `region` with a particle at rate `density`.
///
/// Nothing is drawn from `rng` unless all inputs are valid.
pub fn initialize<R: Rng + ?Sized>(
    height: usize,
    width: usize,
    density: f64,
    wall: Option<&WallSpec>,
    region: &SeedRegion,
    rng: &mut R,
) -> Result<Grid, GridError> {
    let mut grid = Grid::new(height, width)?;
    if !(0.0..=1.0).contains(&density) {
        return Err(GridError::InvalidDensity(density));
    }
    let dims = grid.dimensions();
    region.validate(dims)?;
    if let Some(wall) = wall {
        wall.apply(&mut grid)?;
    }

    for row in region.rows.clone() {
        for col in region.cols.clone() {
            if grid.is_wall(row, col) {
                continue;
            }
            let mut cell = Cell::EMPTY;
            for dir in Direction::ALL {
                if rng.random_bool(density) {
                    cell = cell.with(dir, 1)?;
                }
            }
            grid.set_cell(row, col, cell)?;
        }
    }

    tracing::info!(
        height,
        width,
        density,
        walls = grid.wall_count(),
        particles = grid.particle_count(),
        "grid initialized"
    );
    Ok(grid)
}
