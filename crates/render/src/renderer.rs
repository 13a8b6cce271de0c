use latgas_kernel::Grid;

/// Renderer-agnostic interface. All renderers implement this trait.
///
/// The renderer reads grid state and produces output. It never mutates the
/// grid; simulation truth is kernel-owned.
pub trait Renderer {
    /// The output type produced by this renderer.
    type Output;

    /// Render one frame from the given grid.
    fn render(&self, grid: &Grid) -> Self::Output;
}

/// Text renderer for terminals and logs.
///
/// One character per cell: `#` for walls, `.` for empty cells, otherwise the
/// particle count.
#[derive(Debug, Default)]
pub struct AsciiRenderer {
    /// Print a header line with grid size and particle count.
    pub header: bool,
}

impl AsciiRenderer {
    pub fn new() -> Self {
        Self { header: true }
    }

    fn glyph(wall: bool, count: u32) -> char {
        match (wall, count) {
            (true, _) => '#',
            (false, 0) => '.',
            (false, n) => char::from_digit(n, 10).unwrap_or('+'),
        }
    }
}

impl Renderer for AsciiRenderer {
    type Output = String;

    fn render(&self, grid: &Grid) -> String {
        let mut out = String::with_capacity((grid.width() + 1) * (grid.height() + 1));
        if self.header {
            out.push_str(&format!(
                "=== Grid {}x{} particles={} ===\n",
                grid.height(),
                grid.width(),
                grid.particle_count()
            ));
        }
        let field = grid.occupancy_field();
        for (row, counts) in field.chunks_exact(grid.width()).enumerate() {
            for (col, &count) in counts.iter().enumerate() {
                out.push(Self::glyph(grid.is_wall(row, col), count));
            }
            out.push('\n');
        }
        out
    }
}
