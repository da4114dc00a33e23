use super::cell::CellData;
use crate::core::grid::Segment;
use crate::core::point_generator::Point;
use crate::shared::{constants, GridExtent};

const HORIZONTAL: u8 = 0b01;
const VERTICAL: u8 = 0b10;

/// Rasterizes world-space grid lines and points into terminal cells.
///
/// World x grows to the right, world y grows upward. Each world unit takes
/// `cell_width` columns; the first column holds the grid crossing or the dot,
/// the rest hold the horizontal connector. With `rows_per_cell == 2` two world
/// rows share a terminal row and dots are drawn as upper/lower half blocks.
pub struct Canvas {
    extent: GridExtent,
    cell_width: usize,
    rows_per_cell: usize,
    grid_mask: Vec<u8>,
    lit: Vec<bool>,
    cells: Vec<CellData>,
}

impl Canvas {
    pub fn new(extent: GridExtent, cell_width: usize, rows_per_cell: usize) -> Self {
        let cell_width = cell_width.max(1);
        let rows_per_cell = rows_per_cell.clamp(1, 2);
        let units = extent.columns() * extent.rows();
        let cell_rows = (extent.rows() + rows_per_cell - 1) / rows_per_cell;
        Self {
            extent,
            cell_width,
            rows_per_cell,
            grid_mask: vec![0; units],
            lit: vec![false; units],
            cells: vec![CellData::blank(); extent.columns() * cell_rows * cell_width],
        }
    }

    /// Width of the canvas in terminal columns
    pub fn width(&self) -> usize {
        self.extent.columns() * self.cell_width
    }

    /// Whether this canvas was built for the given cell layout
    pub fn matches(&self, cell_width: usize, rows_per_cell: usize) -> bool {
        self.cell_width == cell_width.max(1) && self.rows_per_cell == rows_per_cell.clamp(1, 2)
    }

    pub fn cells(&self) -> &[CellData] {
        &self.cells
    }

    fn unit_index(&self, x: i32, y: i32) -> Option<usize> {
        if !self.extent.contains(x, y) {
            return None;
        }
        let col = (x - self.extent.xmin) as usize;
        let row = (self.extent.ymax - y) as usize;
        Some(row * self.extent.columns() + col)
    }

    /// Record grid lines. Only axis-aligned segments are supported.
    pub fn set_grid(&mut self, lines: &[Segment]) {
        self.grid_mask.iter_mut().for_each(|m| *m = 0);

        for line in lines {
            let ((x0, y0), (x1, y1)) = (line.from, line.to);
            if y0 == y1 {
                for x in x0.min(x1)..=x0.max(x1) {
                    if let Some(i) = self.unit_index(x, y0) {
                        self.grid_mask[i] |= HORIZONTAL;
                    }
                }
            } else if x0 == x1 {
                for y in y0.min(y1)..=y0.max(y1) {
                    if let Some(i) = self.unit_index(x0, y) {
                        self.grid_mask[i] |= VERTICAL;
                    }
                }
            }
        }
    }

    /// Redraw every cell: grid background first, then the points on top.
    pub fn draw(&mut self, points: &[Point]) {
        self.lit.iter_mut().for_each(|l| *l = false);
        for point in points {
            if let Some(unit) = self.unit_index(point.x, point.y) {
                self.lit[unit] = true;
            }
        }

        let columns = self.extent.columns();
        let rows = self.extent.rows();
        for row in (0..rows).step_by(self.rows_per_cell) {
            let cell_row = row / self.rows_per_cell;
            let lower_row = (self.rows_per_cell == 2 && row + 1 < rows).then_some(row + 1);

            for col in 0..columns {
                let upper = row * columns + col;
                let lower = lower_row.map(|r| r * columns + col);
                let mask = self.grid_mask[upper] | lower.map_or(0, |i| self.grid_mask[i]);

                let upper_on = self.lit[upper];
                let lower_on = match lower {
                    Some(i) => self.lit[i],
                    None if self.rows_per_cell == 1 => upper_on,
                    None => false,
                };

                let base = (cell_row * columns + col) * self.cell_width;
                let dot = match (upper_on, lower_on) {
                    (true, true) => Some(constants::POINT_GLYPH),
                    (true, false) => Some(constants::UPPER_HALF_GLYPH),
                    (false, true) => Some(constants::LOWER_HALF_GLYPH),
                    (false, false) => None,
                };

                if let Some(glyph) = dot {
                    for cell in &mut self.cells[base..base + self.cell_width] {
                        *cell = CellData {
                            char: glyph,
                            fg: constants::POINT_COLOR,
                            bg: constants::BACKGROUND_COLOR,
                        };
                    }
                    continue;
                }

                let glyph = match mask {
                    m if m == HORIZONTAL | VERTICAL => '┼',
                    HORIZONTAL => '─',
                    VERTICAL => '│',
                    _ => ' ',
                };
                let connector = if mask & HORIZONTAL != 0 && col != columns - 1 {
                    '─'
                } else {
                    ' '
                };
                for offset in 0..self.cell_width {
                    self.cells[base + offset] = CellData {
                        char: if offset == 0 { glyph } else { connector },
                        fg: constants::GRID_COLOR,
                        bg: constants::BACKGROUND_COLOR,
                    };
                }
            }
        }
    }
}
