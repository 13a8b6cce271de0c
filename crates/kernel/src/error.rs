/// Errors from building or editing a grid.
///
/// The transition engine itself never returns these: it is total over
/// well-formed grids.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GridError {
    #[error("invalid grid dimensions {height}x{width}: both must be at least 1")]
    InvalidDimensions { height: usize, width: usize },
    #[error("invalid density {0}: must lie in [0, 1]")]
    InvalidDensity(f64),
    #[error("channel value {value} exceeds the allowed maximum {max}")]
    ChannelOverflow { value: u8, max: u8 },
    #[error("wall cell holds particles {channels:?}")]
    OccupiedWall { channels: [u8; 4] },
    #[error("barrier index {index} outside grid extent {extent}")]
    BarrierOutOfBounds { index: usize, extent: usize },
    #[error("hole {hole} outside barrier length {extent}")]
    HoleOutOfBounds { hole: usize, extent: usize },
    #[error("seed region rows {rows:?} cols {cols:?} does not fit a {height}x{width} grid")]
    RegionOutOfBounds {
        rows: std::ops::Range<usize>,
        cols: std::ops::Range<usize>,
        height: usize,
        width: usize,
    },
    #[error("cell ({row}, {col}) is outside the grid")]
    OutOfBounds { row: usize, col: usize },
}
