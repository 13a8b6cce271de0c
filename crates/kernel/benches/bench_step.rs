use std::hint::black_box;
use std::time::Instant;

use latgas_kernel::{Grid, SimConfig, StepMode, step_with};

fn make_grid(height: usize, width: usize) -> Grid {
    let config = SimConfig {
        density: 0.5,
        ..SimConfig::for_dimensions(height, width)
    };
    config.build_grid().expect("benchmark config is valid")
}

fn bench_step(height: usize, width: usize, mode: StepMode, iterations: usize) {
    let mut grid = make_grid(height, width);

    let start = Instant::now();
    for _ in 0..iterations {
        grid = step_with(black_box(&grid), mode);
    }
    let elapsed = start.elapsed();
    let per_iter = elapsed / iterations as u32;
    let cells_per_sec = (height * width * iterations) as f64 / elapsed.as_secs_f64();
    println!(
        "  {mode:?} {height}x{width} ({iterations} iters): {per_iter:?}/iter, {cells_per_sec:.3e} cells/s"
    );
}

fn main() {
    println!("=== Lattice Gas Step Benchmarks ===\n");

    for mode in [StepMode::Serial, StepMode::Parallel] {
        println!("{mode:?}:");
        bench_step(100, 140, mode, 1000);
        bench_step(500, 700, mode, 100);
        bench_step(2000, 2800, mode, 10);
        println!();
    }

    println!("=== Done ===");
}
