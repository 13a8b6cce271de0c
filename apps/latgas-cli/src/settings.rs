use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use latgas_kernel::{SimConfig, StepMode, WallSpec};

/// Grid and seeding options shared by every simulating subcommand.
///
/// A YAML file given with `--config` is loaded first; flags then override
/// individual fields.
#[derive(Debug, Default, Args)]
pub struct GridArgs {
    /// YAML file with a full simulation config
    #[arg(short, long)]
    pub config: Option<PathBuf>,
    /// Grid height in cells
    #[arg(long)]
    pub height: Option<usize>,
    /// Grid width in cells
    #[arg(long)]
    pub width: Option<usize>,
    /// Per-channel seeding probability in [0, 1]
    #[arg(short, long)]
    pub density: Option<f64>,
    /// RNG seed for the initial grid
    #[arg(short, long)]
    pub seed: Option<u64>,
    /// Column of the vertical barrier
    #[arg(long, conflicts_with = "no_wall")]
    pub barrier: Option<usize>,
    /// Comma-separated rows left open in the barrier
    #[arg(long, value_delimiter = ',', conflicts_with = "no_wall")]
    pub holes: Option<Vec<usize>>,
    /// Run without any barrier
    #[arg(long)]
    pub no_wall: bool,
    /// Step on the calling thread only
    #[arg(long)]
    pub serial: bool,
}

impl GridArgs {
    /// Resolve the file (if any) and flags into a simulation config.
    pub fn resolve(&self) -> Result<SimConfig> {
        let mut cfg = match &self.config {
            Some(path) => {
                let text = std::fs::read_to_string(path)
                    .with_context(|| format!("reading config {}", path.display()))?;
                serde_yaml::from_str::<SimConfig>(&text)
                    .with_context(|| format!("parsing config {}", path.display()))?
            }
            None => SimConfig::default(),
        };

        if self.height.is_some() || self.width.is_some() {
            let height = self.height.unwrap_or(cfg.height);
            let width = self.width.unwrap_or(cfg.width);
            if self.config.is_none() {
                cfg = SimConfig {
                    density: cfg.density,
                    rng_seed: cfg.rng_seed,
                    mode: cfg.mode,
                    ..SimConfig::for_dimensions(height, width)
                };
            } else {
                cfg.height = height;
                cfg.width = width;
            }
        }

        if self.no_wall {
            cfg.wall = None;
        } else if self.barrier.is_some() || self.holes.is_some() {
            let default_wall = WallSpec::centered_gap(cfg.dimensions());
            let column = self.barrier.unwrap_or(default_wall.index);
            let holes = self.holes.clone().unwrap_or(default_wall.holes);
            cfg.wall = Some(WallSpec::vertical(column, holes));
        }

        if let Some(density) = self.density {
            cfg.density = density;
        }
        if let Some(seed) = self.seed {
            cfg.rng_seed = seed;
        }
        if self.serial {
            cfg.mode = StepMode::Serial;
        }
        Ok(cfg)
    }
}
