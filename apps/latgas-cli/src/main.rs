mod settings;

use std::io::BufRead;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use latgas_kernel::{RunOutcome, SimConfig, Simulation, StepMode};
use latgas_render::{AsciiRenderer, RasterRenderer, RenderConfig, Renderer};
use tracing_subscriber::EnvFilter;

use crate::settings::GridArgs;

#[derive(Parser)]
#[command(name = "latgas-cli", about = "Lattice gas automaton simulator")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print crate versions and the default config as YAML
    Info,
    /// Run the simulation; type `q` and Enter to stop early
    Run {
        #[command(flatten)]
        grid: GridArgs,
        /// Number of ticks; runs until quit when omitted
        #[arg(short, long)]
        ticks: Option<u64>,
        /// Print the grid as text every N ticks (0 disables)
        #[arg(long, default_value = "0")]
        render_every: u64,
        /// Write a PPM image per tick into this directory
        #[arg(long)]
        frames_dir: Option<PathBuf>,
        /// Pixel size of one cell in written frames
        #[arg(long, default_value = "10")]
        cell_size: u32,
        /// Emit one JSON tick report per line
        #[arg(long)]
        json: bool,
    },
    /// Step serial and parallel engines side by side and check they agree
    Verify {
        #[command(flatten)]
        grid: GridArgs,
        /// Number of ticks to compare
        #[arg(short, long, default_value = "200")]
        ticks: u64,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Info => {
            println!("latgas-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("kernel: {}", latgas_kernel::crate_info());
            println!("render: {}", latgas_render::crate_info());
            println!("default config:");
            print!("{}", serde_yaml::to_string(&SimConfig::default())?);
        }
        Commands::Run {
            grid,
            ticks,
            render_every,
            frames_dir,
            cell_size,
            json,
        } => {
            let config = grid.resolve()?;
            let raster = match &frames_dir {
                Some(dir) => {
                    std::fs::create_dir_all(dir)
                        .with_context(|| format!("creating {}", dir.display()))?;
                    Some(RasterRenderer::new(RenderConfig {
                        cell_size,
                        ..RenderConfig::default()
                    })?)
                }
                None => None,
            };
            let output = Output {
                ascii: AsciiRenderer::new(),
                raster,
                frames_dir,
                render_every,
                json,
            };
            run(&config, ticks.unwrap_or(u64::MAX), &output)?;
        }
        Commands::Verify { grid, ticks } => {
            let config = grid.resolve()?;
            verify(&config, ticks)?;
        }
    }

    Ok(())
}

/// Where each tick's state goes.
struct Output {
    ascii: AsciiRenderer,
    raster: Option<RasterRenderer>,
    frames_dir: Option<PathBuf>,
    render_every: u64,
    json: bool,
}

impl Output {
    fn emit(&self, sim: &Simulation) -> Result<()> {
        let tick = sim.tick();
        if self.json {
            println!("{}", serde_json::to_string(&sim.report())?);
        }
        if self.render_every > 0 && tick % self.render_every == 0 {
            println!("tick {tick}");
            print!("{}", self.ascii.render(sim.grid()));
        }
        if let (Some(raster), Some(dir)) = (&self.raster, &self.frames_dir) {
            write_frame(raster, sim, dir)?;
        }
        Ok(())
    }
}

fn write_frame(raster: &RasterRenderer, sim: &Simulation, dir: &Path) -> Result<()> {
    let path = dir.join(format!("frame_{:06}.ppm", sim.tick()));
    let frame = raster
        .render(sim.grid())
        .with_context(|| format!("rendering tick {}", sim.tick()))?;
    let file = std::fs::File::create(&path)
        .with_context(|| format!("creating frame {}", path.display()))?;
    frame
        .write_ppm(std::io::BufWriter::new(file))
        .with_context(|| format!("writing frame {}", path.display()))?;
    Ok(())
}

/// Raise the returned flag when the user types `q` on stdin.
fn spawn_quit_listener() -> Arc<AtomicBool> {
    let stop = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&stop);
    std::thread::spawn(move || {
        for line in std::io::stdin().lock().lines() {
            match line {
                Ok(l) if l.trim().eq_ignore_ascii_case("q") => {
                    flag.store(true, Ordering::Relaxed);
                    break;
                }
                Ok(_) => continue,
                Err(_) => break,
            }
        }
    });
    stop
}

fn run(config: &SimConfig, max_ticks: u64, output: &Output) -> Result<()> {
    let mut sim = Simulation::from_config(config).context("initializing grid")?;
    let initial = sim.report();
    tracing::info!(
        height = config.height,
        width = config.width,
        particles = initial.particles,
        mode = ?config.mode,
        "simulation ready"
    );
    output.emit(&sim)?;

    let stop = spawn_quit_listener();
    let mut failure = None;
    let outcome = sim.run(max_ticks, &stop, |sim, _| {
        if let Err(e) = output.emit(sim) {
            failure = Some(e);
            stop.store(true, Ordering::Relaxed);
        }
    });
    if let Some(e) = failure {
        return Err(e);
    }

    let last = sim.report();
    match outcome {
        RunOutcome::Completed { ticks } => tracing::info!(ticks, "run completed"),
        RunOutcome::Stopped { ticks } => tracing::info!(ticks, "run stopped by user"),
    }
    println!(
        "tick={} particles={} occupied={} hash={:#x}",
        last.tick,
        last.particles,
        last.occupied_cells,
        sim.state_hash()
    );
    Ok(())
}

fn verify(config: &SimConfig, ticks: u64) -> Result<()> {
    let grid = config.build_grid().context("initializing grid")?;
    let walls = grid.wall_count();
    let mut serial = Simulation::new(grid.clone(), StepMode::Serial);
    let mut parallel = Simulation::new(grid, StepMode::Parallel);
    let particles = serial.report().particles;
    println!("Verify: {}x{}, {particles} particles, {ticks} ticks", config.height, config.width);

    for _ in 0..ticks {
        let s = serial.step();
        let p = parallel.step();
        if s.particles != particles {
            anyhow::bail!(
                "conservation violated at tick {}: {} != {particles}",
                s.tick,
                s.particles
            );
        }
        if serial.grid().wall_count() != walls {
            anyhow::bail!("wall layout changed at tick {}", s.tick);
        }
        if serial.state_hash() != parallel.state_hash() || s != p {
            anyhow::bail!("serial and parallel diverged at tick {}", s.tick);
        }
    }

    println!(
        "Match: OK (tick={}, hash={:#x})",
        serial.tick(),
        serial.state_hash()
    );
    Ok(())
}
