//! Sheet rendering: projects geometry and bound content into a positioned
//! render tree, ready to be drawn onto any surface
//!
//! The tree is plain data. Rendering the same configuration and grid twice
//! yields equal trees.

use crate::Result;
use crate::config::SheetConfig;
use crate::constants::{DEFAULT_LINE_HEIGHT_MULTIPLIER, GROUP_GAP_MM, mm_to_pt, pt_to_mm};
use crate::content::{CellContent, RenderedGrid};
use crate::geometry::{Rect, SheetLayout, resolve_grid};
use crate::qr::QrMatrix;
use crate::style::RenderOptions;
use crate::text::{TextLine, layout_description};
use tracing::{debug, instrument, trace};

/// A fully positioned sheet. Boxes are page coordinates in millimetres,
/// origin top-left.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedSheet {
    pub page: Rect,
    /// The page area inside the body padding
    pub body: Rect,
    pub cells: Vec<PlacedCell>,
    pub show_borders: bool,
}

/// One cell with its page position and content
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedCell {
    pub row: usize,
    pub column: usize,
    /// The cell border box
    pub bounds: Rect,
    /// The area inside the cell padding
    pub content_box: Rect,
    pub content: PlacedContent,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PlacedContent {
    Empty,
    QrWithDescription {
        qr: QrMatrix,
        /// Square area of the QR symbol
        qr_box: Rect,
        text: TextBlock,
    },
}

/// Wrapped description lines and where they go
#[derive(Debug, Clone, PartialEq)]
pub struct TextBlock {
    /// The column the text may occupy
    pub area: Rect,
    /// Top of the first line, vertically centred in the area
    pub top: f32,
    pub lines: Vec<TextLine>,
    /// Font size in points
    pub font_size: f32,
    /// Distance between baselines, in millimetres
    pub line_height: f32,
}

impl TextBlock {
    pub fn height(&self) -> f32 {
        self.lines.len() as f32 * self.line_height
    }
}

/// Render a bound grid onto the sheet geometry
#[instrument(skip_all, fields(rows = config.rows, columns = config.columns))]
pub fn render_sheet(
    config: &SheetConfig,
    grid: &RenderedGrid,
    options: &RenderOptions,
) -> Result<RenderedSheet> {
    let layout = resolve_grid(config, options.vertical_gap);
    render_layout(&layout, grid, options)
}

/// Render a bound grid onto an already resolved layout
pub fn render_layout(
    layout: &SheetLayout,
    grid: &RenderedGrid,
    options: &RenderOptions,
) -> Result<RenderedSheet> {
    debug!(
        "Rendering {} cells, {} with content",
        layout.cells.len(),
        grid.filled()
    );

    let mut cells = Vec::with_capacity(layout.cells.len());
    for cell in &layout.cells {
        let bounds = layout.to_page(&cell.bounds);
        let content_box = layout.to_page(&cell.content_box());
        let content = match grid.get(cell.row, cell.column) {
            Some(CellContent::QrWithDescription {
                qr_code_text,
                description,
            }) => place_qr_with_description(qr_code_text, description, content_box, options)?,
            Some(CellContent::Empty) | None => PlacedContent::Empty,
        };
        cells.push(PlacedCell {
            row: cell.row,
            column: cell.column,
            bounds,
            content_box,
            content,
        });
    }

    let body = layout.page.inset(&layout.body_padding);
    trace!("Rendered sheet body {:?}", body);

    Ok(RenderedSheet {
        page: layout.page,
        body,
        cells,
        show_borders: options.show_borders,
    })
}

/// Lay out the QR symbol and the description side by side: the symbol is a
/// square as tall as the content box, the text takes what is left
fn place_qr_with_description(
    qr_code_text: &str,
    description: &str,
    content_box: Rect,
    options: &RenderOptions,
) -> Result<PlacedContent> {
    let qr = QrMatrix::encode(qr_code_text)?;

    let side = content_box.height.min(content_box.width);
    let qr_box = Rect::new(
        content_box.left,
        content_box.top + (content_box.height - side) / 2.0,
        side,
        side,
    );

    let text_left = qr_box.right() + GROUP_GAP_MM;
    let area = Rect::new(
        text_left,
        content_box.top,
        (content_box.right() - text_left).max(0.0),
        content_box.height,
    );

    let lines = layout_description(
        description,
        options.description_format,
        mm_to_pt(area.width),
        options.font_size,
        options.font_metrics.as_deref(),
    );
    let line_height = pt_to_mm(options.font_size * DEFAULT_LINE_HEIGHT_MULTIPLIER);
    let text_height = lines.len() as f32 * line_height;

    Ok(PlacedContent::QrWithDescription {
        qr,
        qr_box,
        text: TextBlock {
            area,
            top: area.top + (area.height - text_height) / 2.0,
            lines,
            font_size: options.font_size,
            line_height,
        },
    })
}
