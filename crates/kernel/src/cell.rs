use latgas_common::Direction;
use serde::{Deserialize, Serialize};

use crate::error::GridError;

/// Largest count a single channel may hold.
pub const MAX_OCCUPANCY: u8 = 1;

/// One lattice site: four directional channels plus a wall marker.
///
/// A wall cell never carries occupancy. Channel values stay within
/// `0..=MAX_OCCUPANCY`; `new`, `with` and deserialization check this, the
/// engine asserts it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawCell")]
pub struct Cell {
    channels: [u8; 4],
    wall: bool,
}

/// Unchecked wire form of a [`Cell`].
#[derive(Deserialize)]
struct RawCell {
    channels: [u8; 4],
    #[serde(default)]
    wall: bool,
}

impl TryFrom<RawCell> for Cell {
    type Error = GridError;

    fn try_from(raw: RawCell) -> Result<Self, Self::Error> {
        if raw.wall {
            if raw.channels != [0; 4] {
                return Err(GridError::OccupiedWall {
                    channels: raw.channels,
                });
            }
            return Ok(Cell::WALL);
        }
        Cell::new(raw.channels)
    }
}

impl Cell {
    /// An open cell with no particles.
    pub const EMPTY: Cell = Cell {
        channels: [0; 4],
        wall: false,
    };

    /// An impassable obstacle.
    pub const WALL: Cell = Cell {
        channels: [0; 4],
        wall: true,
    };

    /// Build an open cell from channel counts in `[up, down, left, right]` order.
    pub fn new(channels: [u8; 4]) -> Result<Self, GridError> {
        if let Some(&value) = channels.iter().find(|&&v| v > MAX_OCCUPANCY) {
            return Err(GridError::ChannelOverflow {
                value,
                max: MAX_OCCUPANCY,
            });
        }
        Ok(Self {
            channels,
            wall: false,
        })
    }

    /// Open cell holding a single particle moving in `dir`.
    pub fn single(dir: Direction) -> Self {
        let mut channels = [0; 4];
        channels[dir.index()] = 1;
        Self {
            channels,
            wall: false,
        }
    }

    /// Construct without range checks. Callers inside the engine uphold the
    /// bound themselves.
    pub(crate) const fn from_channels_unchecked(channels: [u8; 4]) -> Self {
        Self {
            channels,
            wall: false,
        }
    }

    /// Copy of this cell with channel `dir` set to `value`.
    pub fn with(self, dir: Direction, value: u8) -> Result<Self, GridError> {
        let mut channels = self.channels;
        channels[dir.index()] = value;
        Self::new(channels)
    }

    pub fn is_wall(&self) -> bool {
        self.wall
    }

    pub fn get(&self, dir: Direction) -> u8 {
        self.channels[dir.index()]
    }

    /// Channel counts in `[up, down, left, right]` order.
    pub fn channels(&self) -> [u8; 4] {
        self.channels
    }

    /// Number of particles in the cell.
    pub fn occupancy(&self) -> u32 {
        self.channels.iter().map(|&v| u32::from(v)).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.channels == [0; 4]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_rejects_values_above_max() {
        assert_eq!(
            Cell::new([0, 2, 0, 0]),
            Err(GridError::ChannelOverflow { value: 2, max: 1 })
        );
        assert!(Cell::new([1, 1, 1, 1]).is_ok());
    }

    #[test]
    fn wall_has_no_occupancy() {
        assert!(Cell::WALL.is_wall());
        assert_eq!(Cell::WALL.occupancy(), 0);
        assert!(!Cell::EMPTY.is_wall());
    }

    #[test]
    fn single_sets_only_its_channel() {
        let c = Cell::single(Direction::Left);
        assert_eq!(c.channels(), [0, 0, 1, 0]);
        assert_eq!(c.occupancy(), 1);
    }

    #[test]
    fn with_replaces_one_channel() {
        let c = Cell::EMPTY.with(Direction::Down, 1).unwrap();
        assert_eq!(c.get(Direction::Down), 1);
        assert!(Cell::EMPTY.with(Direction::Down, 3).is_err());
    }

    #[test]
    fn deserialize_rejects_overfull_channel() {
        let err = serde_yaml::from_str::<Cell>("channels: [2, 0, 0, 0]\nwall: false").unwrap_err();
        assert!(err.to_string().contains("exceeds the allowed maximum"), "{err}");
    }

    #[test]
    fn deserialize_rejects_wall_with_particles() {
        let err = serde_yaml::from_str::<Cell>("channels: [1, 0, 0, 0]\nwall: true").unwrap_err();
        assert!(err.to_string().contains("wall cell holds particles"), "{err}");
    }

    #[test]
    fn deserialize_accepts_valid_cells() {
        let open: Cell = serde_yaml::from_str("channels: [1, 0, 1, 0]").unwrap();
        assert_eq!(open, Cell::new([1, 0, 1, 0]).unwrap());
        let wall: Cell = serde_yaml::from_str("channels: [0, 0, 0, 0]\nwall: true").unwrap();
        assert_eq!(wall, Cell::WALL);
    }

    #[test]
    fn serialized_cell_reads_back() {
        let c = Cell::new([0, 1, 1, 0]).unwrap();
        let text = serde_yaml::to_string(&c).unwrap();
        assert_eq!(serde_yaml::from_str::<Cell>(&text).unwrap(), c);
    }
}
