//! Geometry resolution: maps (row, column) grid positions onto physical boxes
//!
//! All coordinates are millimetres with the origin at the top-left corner and
//! the y axis pointing down. Cell boxes are relative to the grid origin, the
//! inner corner of the page after body padding; [`SheetLayout::to_page`]
//! shifts them onto the page.

use crate::config::SheetConfig;
use crate::style::Padding;
use tracing::{debug, trace, warn};

/// Whether `cellVerticalGap` contributes to row offsets.
///
/// `Ignore` stacks rows with no extra space, which is how sheets have always
/// been printed; `Apply` separates rows by the configured gap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VerticalGap {
    #[default]
    Ignore,
    Apply,
}

/// An axis-aligned rectangle in millimetres
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    pub fn right(&self) -> f32 {
        self.left + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.top + self.height
    }

    /// Shrink by the padding on each side. Sizes never go below zero.
    pub fn inset(&self, padding: &Padding) -> Rect {
        Rect {
            left: self.left + padding.left,
            top: self.top + padding.top,
            width: (self.width - padding.horizontal()).max(0.0),
            height: (self.height - padding.vertical()).max(0.0),
        }
    }

    pub fn translate(&self, dx: f32, dy: f32) -> Rect {
        Rect {
            left: self.left + dx,
            top: self.top + dy,
            ..*self
        }
    }

    /// True if the interiors of both rectangles intersect
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.left < other.right()
            && other.left < self.right()
            && self.top < other.bottom()
            && other.top < self.bottom()
    }
}

/// The absolute box of one cell
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellBox {
    pub row: usize,
    pub column: usize,
    pub bounds: Rect,
    pub padding: Padding,
}

impl CellBox {
    pub fn left(&self) -> f32 {
        self.bounds.left
    }

    pub fn top(&self) -> f32 {
        self.bounds.top
    }

    pub fn width(&self) -> f32 {
        self.bounds.width
    }

    pub fn height(&self) -> f32 {
        self.bounds.height
    }

    /// The area available to cell content after the cell padding
    pub fn content_box(&self) -> Rect {
        self.bounds.inset(&self.padding)
    }
}

/// Resolved geometry of a whole sheet
#[derive(Debug, Clone, PartialEq)]
pub struct SheetLayout {
    /// Page size, origin at (0, 0)
    pub page: Rect,
    /// Offset of the grid origin from the page corner
    pub body_padding: Padding,
    /// Cell boxes relative to the grid origin, row-major
    pub cells: Vec<CellBox>,
    pub rows: usize,
    pub columns: usize,
}

impl SheetLayout {
    /// The grid origin as a page coordinate
    pub fn grid_origin(&self) -> (f32, f32) {
        (self.body_padding.left, self.body_padding.top)
    }

    /// Move a grid-relative rectangle onto the page
    pub fn to_page(&self, rect: &Rect) -> Rect {
        let (dx, dy) = self.grid_origin();
        rect.translate(dx, dy)
    }

    pub fn cell(&self, row: usize, column: usize) -> Option<&CellBox> {
        if row >= self.rows || column >= self.columns {
            return None;
        }
        self.cells.get(row * self.columns + column)
    }
}

/// Resolve the box of one cell, relative to the grid origin.
///
/// `row` and `column` must be inside the grid; the resolver is driven by a
/// bounded loop and does not check them outside debug builds.
pub fn resolve_cell(
    config: &SheetConfig,
    row: usize,
    column: usize,
    vertical_gap: VerticalGap,
) -> CellBox {
    debug_assert!(row < config.rows as usize, "row {row} outside grid");
    debug_assert!(column < config.columns as usize, "column {column} outside grid");

    let c = column as f64;
    let r = row as f64;
    let left = c * config.cell_width + c * config.cell_horizontal_gap;
    let top = match vertical_gap {
        VerticalGap::Ignore => r * config.cell_height,
        VerticalGap::Apply => r * (config.cell_height + config.cell_vertical_gap),
    };

    CellBox {
        row,
        column,
        bounds: Rect::new(
            left as f32,
            top as f32,
            config.cell_width as f32,
            config.cell_height as f32,
        ),
        padding: config.cell_padding(),
    }
}

/// Resolve every cell of the sheet in row-major order
pub fn resolve_grid(config: &SheetConfig, vertical_gap: VerticalGap) -> SheetLayout {
    let rows = config.rows as usize;
    let columns = config.columns as usize;

    debug!("Resolving geometry for {}x{} grid", rows, columns);

    if config.overflows_page(vertical_gap) {
        warn!(
            "Grid of {}x{} cells extends past the {}x{}{} page",
            rows,
            columns,
            config.page_width,
            config.page_height,
            config.unit.as_str()
        );
    }

    let mut cells = Vec::with_capacity(config.capacity());
    for row in 0..rows {
        for column in 0..columns {
            cells.push(resolve_cell(config, row, column, vertical_gap));
        }
    }

    trace!("Resolved {} cell boxes", cells.len());

    SheetLayout {
        page: Rect::new(
            0.0,
            0.0,
            config.page_width as f32,
            config.page_height as f32,
        ),
        body_padding: config.body_padding(),
        cells,
        rows,
        columns,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SheetPreset;

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-3
    }

    #[test]
    fn test_herma_second_column_offset() {
        let config = SheetPreset::Herma5076.config();
        let cell = resolve_cell(&config, 0, 1, VerticalGap::Ignore);
        assert!(close(cell.left(), 101.6));
        assert_eq!(cell.top(), 0.0);
        assert!(close(cell.width(), 99.06));
        assert!(close(cell.height(), 38.1));
        assert_eq!(cell.padding, Padding::uniform(5.0));
    }

    #[test]
    fn test_grid_is_row_major_and_complete() {
        let config = SheetPreset::Herma5076.config();
        let layout = resolve_grid(&config, VerticalGap::Ignore);
        assert_eq!(layout.cells.len(), 14);
        for (index, cell) in layout.cells.iter().enumerate() {
            assert_eq!(cell.row, index / 2);
            assert_eq!(cell.column, index % 2);
        }
        assert_eq!(layout.cell(6, 1), layout.cells.last());
        assert!(layout.cell(7, 0).is_none());
        assert!(layout.cell(0, 2).is_none());
    }

    #[test]
    fn test_offsets_increase_and_boxes_do_not_overlap() {
        let mut config = SheetPreset::Herma5076.config();
        config.columns = 3;
        config.rows = 4;
        config.cell_vertical_gap = 3.0;
        let layout = resolve_grid(&config, VerticalGap::Ignore);

        for row in 0..4 {
            for column in 1..3 {
                let prev = layout.cell(row, column - 1).unwrap();
                let cur = layout.cell(row, column).unwrap();
                assert!(cur.left() > prev.left());
            }
        }
        for row in 1..4 {
            let prev = layout.cell(row - 1, 0).unwrap();
            let cur = layout.cell(row, 0).unwrap();
            // The vertical gap is ignored: rows stack exactly one cell height apart
            assert!(close(cur.top() - prev.top(), config.cell_height as f32));
        }
        for (i, a) in layout.cells.iter().enumerate() {
            for b in layout.cells.iter().skip(i + 1) {
                assert!(!a.bounds.overlaps(&b.bounds), "{a:?} overlaps {b:?}");
            }
        }
    }

    #[test]
    fn test_applied_vertical_gap_spaces_rows() {
        let mut config = SheetPreset::Herma5076.config();
        config.cell_vertical_gap = 2.0;
        let cell = resolve_cell(&config, 3, 0, VerticalGap::Apply);
        assert!(close(cell.top(), 3.0 * 40.1));
    }

    #[test]
    fn test_content_box_and_page_offset() {
        let config = SheetPreset::Herma5076.config();
        let layout = resolve_grid(&config, VerticalGap::Ignore);
        let cell = layout.cell(1, 1).unwrap();

        let content = cell.content_box();
        assert!(close(content.left, 106.6));
        assert!(close(content.top, 43.1));
        assert!(close(content.width, 89.06));
        assert!(close(content.height, 28.1));

        let on_page = layout.to_page(&cell.bounds);
        assert!(close(on_page.left, 106.27));
        assert!(close(on_page.top, 53.25));
        assert_eq!(layout.page, Rect::new(0.0, 0.0, 210.0, 297.0));
    }

    #[test]
    fn test_inset_never_negative() {
        let rect = Rect::new(0.0, 0.0, 4.0, 4.0);
        let inner = rect.inset(&Padding::uniform(5.0));
        assert_eq!(inner.width, 0.0);
        assert_eq!(inner.height, 0.0);
    }
}
