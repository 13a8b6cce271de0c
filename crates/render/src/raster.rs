use std::io::Write;

use latgas_common::Rgb;
use latgas_kernel::Grid;
use serde::{Deserialize, Serialize};

use crate::renderer::Renderer;

/// Errors from raster rendering and frame export.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("cell size must be at least 1 pixel")]
    InvalidCellSize,
    #[error("frame of {width}x{height} pixels is too large")]
    FrameTooLarge { width: usize, height: usize },
}

/// Colors used for the three kinds of cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Palette {
    pub empty: Rgb,
    pub occupied: Rgb,
    pub wall: Rgb,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            empty: Rgb::WHITE,
            occupied: Rgb::LIGHT_BLUE,
            wall: Rgb::RED,
        }
    }
}

/// Raster output settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Side length of one cell's square, in pixels.
    pub cell_size: u32,
    pub palette: Palette,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            cell_size: 10,
            palette: Palette::default(),
        }
    }
}

/// An RGB image, row-major, top-left origin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<Rgb>,
}

impl Frame {
    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgb> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let index = y as usize * self.width as usize + x as usize;
        self.pixels.get(index).copied()
    }

    /// Encode as a binary PPM (P6) image.
    pub fn write_ppm<W: Write>(&self, mut out: W) -> Result<(), RenderError> {
        write!(out, "P6\n{} {}\n255\n", self.width, self.height)?;
        let bytes: Vec<u8> = self
            .pixels
            .iter()
            .flat_map(|&Rgb(r, g, b)| [r, g, b])
            .collect();
        out.write_all(&bytes)?;
        out.flush()?;
        Ok(())
    }
}

/// Draws every cell as a filled square: wall, occupied, or empty color.
#[derive(Debug, Clone)]
pub struct RasterRenderer {
    config: RenderConfig,
}

impl RasterRenderer {
    pub fn new(config: RenderConfig) -> Result<Self, RenderError> {
        if config.cell_size == 0 {
            return Err(RenderError::InvalidCellSize);
        }
        Ok(Self { config })
    }

    fn color(&self, wall: bool, count: u32) -> Rgb {
        let palette = &self.config.palette;
        if wall {
            palette.wall
        } else if count > 0 {
            palette.occupied
        } else {
            palette.empty
        }
    }
}

impl Renderer for RasterRenderer {
    type Output = Result<Frame, RenderError>;

    fn render(&self, grid: &Grid) -> Result<Frame, RenderError> {
        let size = self.config.cell_size as usize;
        let too_large = || RenderError::FrameTooLarge {
            width: grid.width().saturating_mul(size),
            height: grid.height().saturating_mul(size),
        };
        let width = grid.width().checked_mul(size).ok_or_else(too_large)?;
        let height = grid.height().checked_mul(size).ok_or_else(too_large)?;
        let frame_width = u32::try_from(width).map_err(|_| too_large())?;
        let frame_height = u32::try_from(height).map_err(|_| too_large())?;
        let area = width.checked_mul(height).ok_or_else(too_large)?;

        let field = grid.occupancy_field();
        let mut pixels = Vec::with_capacity(area);
        for (row, counts) in field.chunks_exact(grid.width()).enumerate() {
            let line: Vec<Rgb> = counts
                .iter()
                .enumerate()
                .flat_map(|(col, &count)| {
                    std::iter::repeat_n(self.color(grid.is_wall(row, col), count), size)
                })
                .collect();
            for _ in 0..size {
                pixels.extend_from_slice(&line);
            }
        }
        tracing::trace!(width, height, "rasterized frame");
        Ok(Frame {
            width: frame_width,
            height: frame_height,
            pixels,
        })
    }
}
