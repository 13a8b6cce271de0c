use latgas_common::Dimensions;
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

use crate::error::GridError;
use crate::grid::Grid;
use crate::seed::{SeedRegion, initialize};
use crate::transition::StepMode;
use crate::wall::WallSpec;

/// Default grid height: a 1000 px tall window at 10 px per cell.
pub const DEFAULT_HEIGHT: usize = 100;
/// Default grid width: a 1400 px wide window at 10 px per cell.
pub const DEFAULT_WIDTH: usize = 140;
pub const DEFAULT_DENSITY: f64 = 0.3;
pub const DEFAULT_SEED: u64 = 42;

/// Everything needed to build and run a simulation.
///
/// Missing fields fall back to [`SimConfig::default`] when deserialized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub height: usize,
    pub width: usize,
    /// Per-channel probability of a particle in the seed region.
    pub density: f64,
    /// Barrier layout; `None` for an open box.
    pub wall: Option<WallSpec>,
    /// Cells that receive particles. `None` seeds everything left of the
    /// barrier, or the left quarter when there is no vertical barrier.
    pub seed_region: Option<SeedRegion>,
    pub rng_seed: u64,
    pub mode: StepMode,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self::for_dimensions(DEFAULT_HEIGHT, DEFAULT_WIDTH)
    }
}

impl SimConfig {
    /// Reference layout scaled to `height x width`: a vertical barrier a
    /// quarter of the way across with a centred gap, gas seeded to its left.
    pub fn for_dimensions(height: usize, width: usize) -> Self {
        Self {
            height,
            width,
            density: DEFAULT_DENSITY,
            wall: Some(WallSpec::centered_gap(Dimensions::new(height, width))),
            seed_region: None,
            rng_seed: DEFAULT_SEED,
            mode: StepMode::default(),
        }
    }

    pub fn dimensions(&self) -> Dimensions {
        Dimensions::new(self.height, self.width)
    }

    /// The seed region after applying the default rule.
    pub fn resolved_seed_region(&self) -> SeedRegion {
        let dims = self.dimensions();
        match (&self.seed_region, &self.wall) {
            (Some(region), _) => region.clone(),
            (None, Some(wall)) if wall.orientation == crate::wall::Orientation::Vertical => {
                SeedRegion::left_of(dims, wall.index)
            }
            (None, _) => SeedRegion::left_of(dims, self.width / 4),
        }
    }

    /// Build the initial grid with an RNG seeded from `rng_seed`.
    pub fn build_grid(&self) -> Result<Grid, GridError> {
        let mut rng = StdRng::seed_from_u64(self.rng_seed);
        initialize(
            self.height,
            self.width,
            self.density,
            self.wall.as_ref(),
            &self.resolved_seed_region(),
            &mut rng,
        )
    }
}
