use std::sync::atomic::{AtomicBool, Ordering};

use serde::{Deserialize, Serialize};

use crate::config::SimConfig;
use crate::error::GridError;
use crate::grid::Grid;
use crate::transition::{StepMode, step_into};

/// Summary produced after each tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickReport {
    pub tick: u64,
    pub particles: u64,
    pub occupied_cells: usize,
}

/// Why [`Simulation::run`] returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// The requested number of ticks completed.
    Completed { ticks: u64 },
    /// The shutdown flag was raised; `ticks` ran before it was seen.
    Stopped { ticks: u64 },
}

/// Owns the current grid and advances it one tick at a time.
///
/// Keeps a scratch buffer for the collided state and a back buffer for the
/// next state; after each tick the front and back buffers swap, so steady
/// state ticking does not allocate.
#[derive(Debug, Clone)]
pub struct Simulation {
    front: Grid,
    scratch: Grid,
    back: Grid,
    tick: u64,
    mode: StepMode,
}

impl Simulation {
    /// Wrap an existing grid at tick 0.
    pub fn new(grid: Grid, mode: StepMode) -> Self {
        let scratch = Grid::blank_like(&grid);
        let back = Grid::blank_like(&grid);
        Self {
            front: grid,
            scratch,
            back,
            tick: 0,
            mode,
        }
    }

    /// Build the initial grid from `config` and wrap it.
    pub fn from_config(config: &SimConfig) -> Result<Self, GridError> {
        Ok(Self::new(config.build_grid()?, config.mode))
    }

    /// Current grid, read-only. This is what renderers draw.
    pub fn grid(&self) -> &Grid {
        &self.front
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// Current state summary.
    pub fn report(&self) -> TickReport {
        TickReport {
            tick: self.tick,
            particles: self.front.particle_count(),
            occupied_cells: self.front.occupied_cells(),
        }
    }

    /// Advance the simulation by one tick.
    pub fn step(&mut self) -> TickReport {
        step_into(&self.front, &mut self.scratch, &mut self.back, self.mode);
        std::mem::swap(&mut self.front, &mut self.back);
        self.tick += 1;
        let report = self.report();
        tracing::debug!(
            tick = report.tick,
            particles = report.particles,
            occupied = report.occupied_cells,
            "stepped"
        );
        report
    }

    /// Step up to `max_ticks` times, calling `on_tick` after each one.
    ///
    /// `stop` is checked before every tick; once it is set the loop returns
    /// without starting another. The grid is always left at a tick boundary.
    pub fn run<F>(&mut self, max_ticks: u64, stop: &AtomicBool, mut on_tick: F) -> RunOutcome
    where
        F: FnMut(&Simulation, TickReport),
    {
        let _span = tracing::info_span!("simulation_run", max_ticks).entered();
        let mut ticks = 0;
        while ticks < max_ticks {
            if stop.load(Ordering::Relaxed) {
                tracing::info!(ticks, "shutdown requested");
                return RunOutcome::Stopped { ticks };
            }
            let report = self.step();
            ticks += 1;
            on_tick(self, report);
        }
        RunOutcome::Completed { ticks }
    }

    /// Hash of the tick counter and grid for determinism checks.
    pub fn state_hash(&self) -> u64 {
        let mut h = self.front.state_hash();
        for &b in &self.tick.to_le_bytes() {
            h ^= u64::from(b);
            h = h.wrapping_mul(0x0100_0000_01b3);
        }
        h
    }
}
