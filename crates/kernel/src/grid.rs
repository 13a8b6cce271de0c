use latgas_common::Dimensions;

use crate::cell::Cell;
use crate::error::GridError;

/// Fixed-size, row-major lattice of cells.
///
/// Dimensions never change after construction. Walls are carried per cell;
/// the transition engine reads them from its input and stamps them unchanged
/// into its output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    dims: Dimensions,
    cells: Vec<Cell>,
}

impl Grid {
    /// An empty, wall-free grid.
    pub fn new(height: usize, width: usize) -> Result<Self, GridError> {
        if height == 0 || width == 0 {
            return Err(GridError::InvalidDimensions { height, width });
        }
        let dims = Dimensions::new(height, width);
        Ok(Self {
            dims,
            cells: vec![Cell::EMPTY; dims.area()],
        })
    }

    /// Blank grid of the same shape, used as an output buffer.
    pub(crate) fn blank_like(other: &Grid) -> Self {
        Self {
            dims: other.dims,
            cells: vec![Cell::EMPTY; other.cells.len()],
        }
    }

    pub fn dimensions(&self) -> Dimensions {
        self.dims
    }

    pub fn height(&self) -> usize {
        self.dims.height
    }

    pub fn width(&self) -> usize {
        self.dims.width
    }

    /// All cells in row-major order.
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub(crate) fn cells_mut(&mut self) -> &mut [Cell] {
        &mut self.cells
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<&Cell> {
        self.dims.index(row, col).map(|i| &self.cells[i])
    }

    /// Replace the cell at `(row, col)`.
    ///
    /// Every `Cell` value is range-checked when built or deserialized, so the
    /// grid stores it as is.
    pub fn set_cell(&mut self, row: usize, col: usize, cell: Cell) -> Result<(), GridError> {
        let i = self
            .dims
            .index(row, col)
            .ok_or(GridError::OutOfBounds { row, col })?;
        self.cells[i] = cell;
        Ok(())
    }

    /// Turn `(row, col)` into a wall, discarding any particles it held.
    pub fn set_wall(&mut self, row: usize, col: usize) -> Result<(), GridError> {
        self.set_cell(row, col, Cell::WALL)
    }

    /// Turn `(row, col)` back into an empty open cell.
    pub fn clear_wall(&mut self, row: usize, col: usize) -> Result<(), GridError> {
        self.set_cell(row, col, Cell::EMPTY)
    }

    /// Whether `(row, col)` is an obstacle.
    ///
    /// # Panics
    /// If `(row, col)` is outside the grid.
    pub fn is_wall(&self, row: usize, col: usize) -> bool {
        self.at(row, col).is_wall()
    }

    /// Sum of the four channels at `(row, col)`. Zero for walls.
    ///
    /// # Panics
    /// If `(row, col)` is outside the grid.
    pub fn occupancy_sum(&self, row: usize, col: usize) -> u32 {
        self.at(row, col).occupancy()
    }

    /// Per-cell particle counts in row-major order.
    pub fn occupancy_field(&self) -> Vec<u32> {
        self.cells.iter().map(Cell::occupancy).collect()
    }

    /// Total particles over all channels of all cells.
    pub fn particle_count(&self) -> u64 {
        self.cells.iter().map(|c| u64::from(c.occupancy())).sum()
    }

    /// Number of open cells holding at least one particle.
    pub fn occupied_cells(&self) -> usize {
        self.cells.iter().filter(|c| !c.is_empty()).count()
    }

    pub fn wall_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_wall()).count()
    }

    /// FNV-1a hash over dimensions, walls, and channel values.
    pub fn state_hash(&self) -> u64 {
        let mut h: u64 = 0xcbf2_9ce4_8422_2325;
        let mut mix = |bytes: &[u8]| {
            for &b in bytes {
                h ^= u64::from(b);
                h = h.wrapping_mul(0x0100_0000_01b3);
            }
        };
        mix(&(self.dims.height as u64).to_le_bytes());
        mix(&(self.dims.width as u64).to_le_bytes());
        for cell in &self.cells {
            mix(&cell.channels());
            mix(&[u8::from(cell.is_wall())]);
        }
        h
    }

    fn at(&self, row: usize, col: usize) -> &Cell {
        match self.cell(row, col) {
            Some(cell) => cell,
            None => panic!(
                "cell ({row}, {col}) outside {}x{} grid",
                self.dims.height, self.dims.width
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use latgas_common::Direction;

    #[test]
    fn zero_dimensions_are_rejected() {
        assert_eq!(
            Grid::new(0, 5),
            Err(GridError::InvalidDimensions {
                height: 0,
                width: 5
            })
        );
        assert!(Grid::new(4, 0).is_err());
    }

    #[test]
    fn new_grid_is_empty() {
        let g = Grid::new(3, 7).unwrap();
        assert_eq!(g.cells().len(), 21);
        assert_eq!(g.particle_count(), 0);
        assert_eq!(g.wall_count(), 0);
    }

    #[test]
    fn set_cell_and_query() {
        let mut g = Grid::new(3, 3).unwrap();
        g.set_cell(1, 2, Cell::new([1, 0, 1, 1]).unwrap()).unwrap();
        assert_eq!(g.occupancy_sum(1, 2), 3);
        assert_eq!(g.particle_count(), 3);
        assert_eq!(g.occupied_cells(), 1);
        assert_eq!(g.occupancy_field()[5], 3);
    }

    #[test]
    fn set_cell_out_of_bounds() {
        let mut g = Grid::new(2, 2).unwrap();
        assert_eq!(
            g.set_cell(2, 0, Cell::EMPTY),
            Err(GridError::OutOfBounds { row: 2, col: 0 })
        );
    }

    #[test]
    fn only_validated_cells_reach_the_grid() {
        let mut g = Grid::new(3, 3).unwrap();
        assert!(serde_yaml::from_str::<Cell>("channels: [1, 0, 0, 0]\nwall: true").is_err());
        assert!(serde_yaml::from_str::<Cell>("channels: [0, 0, 3, 0]").is_err());

        let wall: Cell = serde_yaml::from_str("channels: [0, 0, 0, 0]\nwall: true").unwrap();
        let mover: Cell = serde_yaml::from_str("channels: [0, 0, 0, 1]").unwrap();
        g.set_cell(1, 1, wall).unwrap();
        g.set_cell(1, 0, mover).unwrap();
        let next = crate::transition::step(&g);
        assert_eq!(next.particle_count(), 1);
        assert_eq!(next.occupancy_sum(1, 1), 0);
        assert_eq!(next.cell(1, 0).unwrap().get(Direction::Left), 1);
    }

    #[test]
    fn walls_drop_occupancy() {
        let mut g = Grid::new(2, 2).unwrap();
        g.set_cell(0, 0, Cell::single(Direction::Up)).unwrap();
        g.set_wall(0, 0).unwrap();
        assert!(g.is_wall(0, 0));
        assert_eq!(g.occupancy_sum(0, 0), 0);
        g.clear_wall(0, 0).unwrap();
        assert!(!g.is_wall(0, 0));
    }

    #[test]
    fn state_hash_tracks_content() {
        let a = Grid::new(4, 4).unwrap();
        let mut b = a.clone();
        assert_eq!(a.state_hash(), b.state_hash());
        b.set_cell(3, 3, Cell::single(Direction::Right)).unwrap();
        assert_ne!(a.state_hash(), b.state_hash());
    }

    #[test]
    #[should_panic]
    fn is_wall_panics_out_of_bounds() {
        let g = Grid::new(2, 2).unwrap();
        g.is_wall(5, 5);
    }
}
