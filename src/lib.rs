//! Printable label sheets with QR codes, built on lopdf
//!
//! A sheet is a grid of equally sized labels on a fixed page, described by a
//! [`SheetConfig`] in millimetres. Records are bound onto the grid in
//! row-major order and every filled cell carries a QR code next to its
//! description. The result is a single-page PDF ready to print onto
//! pre-cut label stock.
//!
//! ```no_run
//! use lopdf_label_sheet::{QrTextRecord, RenderOptions, SheetPreset, bind_content, render_pdf};
//!
//! let config = SheetPreset::Herma5076.config();
//! let records = vec![QrTextRecord::new("ASN00001", "ASN00001")];
//! let grid = bind_content(&records, config.rows as usize, config.columns as usize);
//! let pdf = render_pdf(&config, &grid, &RenderOptions::default())?;
//! std::fs::write("labels.pdf", pdf)?;
//! # Ok::<(), lopdf_label_sheet::SheetError>(())
//! ```

use lopdf::content::Operation;
use lopdf::{Document, ObjectId};
use tracing::{debug, instrument, trace};

pub mod config;
pub mod constants;
pub mod content;
mod drawing;
pub mod drawing_utils;
pub mod error;
pub mod font;
pub mod generate;
pub mod geometry;
pub mod project;
pub mod qr;
pub mod render;
pub mod store;
pub mod style;
pub mod text;
pub mod workspace;

pub use config::{SheetConfig, SheetPreset, Unit};
pub use content::{
    CellContent, ContentRecord, LocationRecord, PageKind, QrTextRecord, RenderedGrid,
    bind_content,
};
pub use error::{Result, SheetError};
#[cfg(feature = "ttf-parser")]
pub use font::TtfFontMetrics;
pub use font::FontMetrics;
pub use generate::{asn_records, format_asn};
pub use geometry::{CellBox, Rect, SheetLayout, VerticalGap, resolve_cell, resolve_grid};
pub use project::{Project, export_json, import_json};
pub use render::{RenderedSheet, render_sheet};
pub use store::{FileStore, KeyValueStore, MemoryStore};
pub use style::{Color, Padding, RenderOptions};
pub use text::DescriptionFormat;
pub use workspace::Workspace;

/// Extension trait for lopdf::Document to draw label sheets onto pages
pub trait SheetDrawing {
    /// Draw a sheet onto an existing page
    ///
    /// # Arguments
    /// * `page_id` - The object ID of the page to draw on
    /// * `config` - The sheet geometry
    /// * `grid` - The content bound to each cell
    /// * `options` - Border and text settings
    ///
    /// The page's resources must provide the `F1` and `F1-Bold` fonts, see
    /// [`render_pdf`] for a document that does.
    fn draw_sheet(
        &mut self,
        page_id: ObjectId,
        config: &SheetConfig,
        grid: &RenderedGrid,
        options: &RenderOptions,
    ) -> Result<()>;

    /// Create sheet content operations without adding to document
    fn create_sheet_content(
        &self,
        config: &SheetConfig,
        grid: &RenderedGrid,
        options: &RenderOptions,
    ) -> Result<Vec<Operation>>;
}

impl SheetDrawing for Document {
    #[instrument(skip_all, fields(cells = grid.len()))]
    fn draw_sheet(
        &mut self,
        page_id: ObjectId,
        config: &SheetConfig,
        grid: &RenderedGrid,
        options: &RenderOptions,
    ) -> Result<()> {
        debug!("Drawing sheet on page {:?}", page_id);

        let operations = self.create_sheet_content(config, grid, options)?;
        drawing::add_operations_to_page(self, page_id, operations)?;

        Ok(())
    }

    fn create_sheet_content(
        &self,
        config: &SheetConfig,
        grid: &RenderedGrid,
        options: &RenderOptions,
    ) -> Result<Vec<Operation>> {
        let sheet = render_sheet(config, grid, options)?;
        trace!("Rendered sheet with {} cells", sheet.cells.len());
        Ok(drawing::generate_sheet_operations(&sheet, options))
    }
}

/// Render a complete single-page PDF of the sheet
#[instrument(skip_all, fields(rows = config.rows, columns = config.columns))]
pub fn render_pdf(
    config: &SheetConfig,
    grid: &RenderedGrid,
    options: &RenderOptions,
) -> Result<Vec<u8>> {
    let (mut doc, page_id) = drawing::create_sheet_document(config);
    doc.draw_sheet(page_id, config, grid, options)?;

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes)?;
    debug!("Rendered PDF of {} bytes", bytes.len());
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn asn_grid(config: &SheetConfig) -> RenderedGrid {
        let records: Vec<QrTextRecord> = asn_records(1, config.capacity());
        bind_content(&records, config.rows as usize, config.columns as usize)
    }

    #[test]
    fn test_sheet_content_is_wrapped_in_graphics_state() {
        let config = SheetPreset::Herma5076.config();
        let doc = Document::with_version("1.5");
        let ops = doc
            .create_sheet_content(&config, &asn_grid(&config), &RenderOptions::default())
            .unwrap();

        assert_eq!(ops.first().map(|op| op.operator.as_str()), Some("q"));
        assert_eq!(ops.last().map(|op| op.operator.as_str()), Some("Q"));
        let text_objects = ops.iter().filter(|op| op.operator == "BT").count();
        assert_eq!(text_objects, 14);
    }

    #[test]
    fn test_borders_only_when_requested() {
        let config = SheetPreset::Herma5076.config();
        let grid = RenderedGrid::from_cells(Vec::new(), 7, 2);
        let doc = Document::with_version("1.5");

        let plain = doc
            .create_sheet_content(&config, &grid, &RenderOptions::default())
            .unwrap();
        assert!(!plain.iter().any(|op| op.operator == "S"));

        let preview = doc
            .create_sheet_content(&config, &grid, &RenderOptions::preview())
            .unwrap();
        // page outline plus one rounded outline per cell
        assert_eq!(preview.iter().filter(|op| op.operator == "S").count(), 15);
    }

    #[test]
    fn test_draw_sheet_on_missing_page() {
        let config = SheetPreset::Herma5076.config();
        let mut doc = Document::with_version("1.5");
        let result = doc.draw_sheet(
            (99, 0),
            &config,
            &asn_grid(&config),
            &RenderOptions::default(),
        );
        assert!(matches!(result, Err(SheetError::PageNotFound(_))));
    }

    #[test]
    fn test_render_pdf_is_a_pdf() {
        let config = SheetPreset::Herma5076.config();
        let bytes = render_pdf(&config, &asn_grid(&config), &RenderOptions::default()).unwrap();
        assert!(bytes.starts_with(b"%PDF-1.5"));
    }
}
