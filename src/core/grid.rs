use crate::shared::{constants, GridExtent};

/// A straight grid line between two world-space endpoints
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Segment {
    pub from: (i32, i32),
    pub to: (i32, i32),
}

/// Vertical lines first (one per integer x), then horizontal ones.
pub fn generate_grid_lines(extent: &GridExtent) -> Vec<Segment> {
    let mut lines = Vec::with_capacity(extent.columns() + extent.rows());

    for x in extent.xmin..=extent.xmax {
        lines.push(Segment {
            from: (x, extent.ymin),
            to: (x, extent.ymax),
        });
    }
    for y in extent.ymin..=extent.ymax {
        lines.push(Segment {
            from: (extent.xmin, y),
            to: (extent.xmax, y),
        });
    }
    lines
}

pub fn grid_line_count(extent: &GridExtent) -> u32 {
    (extent.xmax.max(extent.ymax).max(0) as u32) * 2 + 3
}

/// Dot size that stays a little smaller than the spacing between grid lines
pub fn point_size(viewport: (u16, u16), extent: &GridExtent) -> f32 {
    let dist = viewport.0.min(viewport.1) as f32;
    dist / grid_line_count(extent) as f32
}

/// Terminal columns per world unit. Cells are about twice as tall as wide,
/// so two columns keep the grid square when the terminal is wide enough.
pub fn cell_width(viewport: (u16, u16), extent: &GridExtent) -> usize {
    if viewport.0 as usize >= extent.columns() * 2 {
        2
    } else {
        1
    }
}

/// World rows per terminal row. When the extent is taller than the space
/// above the status line, two world rows share one cell using half blocks.
pub fn rows_per_cell(viewport: (u16, u16), extent: &GridExtent) -> usize {
    let available = viewport.1.saturating_sub(constants::STATUS_ROWS) as usize;
    if extent.rows() <= available {
        1
    } else {
        2
    }
}

/// Terminal size a canvas needs, status line included
pub fn required_viewport(extent: &GridExtent, cell_width: usize, rows_per_cell: usize) -> (usize, usize) {
    let rows_per_cell = rows_per_cell.max(1);
    let cols = extent.columns() * cell_width.max(1);
    let rows = (extent.rows() + rows_per_cell - 1) / rows_per_cell + constants::STATUS_ROWS as usize;
    (cols, rows)
}

/// Whether the whole grid can be shown in the viewport at its densest layout
pub fn fits(viewport: (u16, u16), extent: &GridExtent) -> bool {
    let (cols, rows) = required_viewport(extent, 1, rows_per_cell(viewport, extent));
    viewport.0 as usize >= cols && viewport.1 as usize >= rows
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_grid_segment_count() {
        let extent = GridExtent::default();
        let lines = generate_grid_lines(&extent);
        assert_eq!(lines.len(), 49 + 37);
        assert_eq!(lines[0], Segment { from: (-24, -18), to: (-24, 18) });
        assert_eq!(lines[49], Segment { from: (-24, -18), to: (24, -18) });
    }

    #[test]
    fn test_point_size_follows_smaller_side() {
        let extent = GridExtent::default();
        assert_eq!(grid_line_count(&extent), 51);
        assert_eq!(point_size((500, 510), &extent), 500.0 / 51.0);
        assert_eq!(point_size((800, 102), &extent), 2.0);
    }

    #[test]
    fn test_cell_width_falls_back_on_narrow_terminal() {
        let extent = GridExtent::default();
        assert_eq!(cell_width((98, 40), &extent), 2);
        assert_eq!(cell_width((97, 40), &extent), 1);
    }

    #[test]
    fn test_rows_per_cell_keeps_status_row_free() {
        let extent = GridExtent::default();
        // 37 grid rows need 38 terminal rows with the status line
        assert_eq!(rows_per_cell((120, 38), &extent), 1);
        assert_eq!(rows_per_cell((120, 37), &extent), 2);
        assert_eq!(rows_per_cell((80, 24), &extent), 2);
    }

    #[test]
    fn test_required_viewport_rounds_half_rows_up() {
        let extent = GridExtent::default();
        assert_eq!(required_viewport(&extent, 2, 1), (98, 38));
        assert_eq!(required_viewport(&extent, 1, 2), (49, 20));
    }

    #[test]
    fn test_fits_standard_terminal() {
        let extent = GridExtent::default();
        assert!(fits((80, 24), &extent));
        assert!(!fits((80, 19), &extent));
        assert!(!fits((40, 24), &extent));
    }
}
