//! PDF drawing operations for rendered sheets

use crate::Result;
use crate::config::SheetConfig;
use crate::constants::*;
use crate::drawing_utils::*;
use crate::error::SheetError;
use crate::geometry::Rect;
use crate::qr::QrMatrix;
use crate::render::{PlacedContent, RenderedSheet, TextBlock};
use crate::style::{Color, RenderOptions};
use crate::text::encode_win_ansi;
use lopdf::{
    Document, Object, ObjectId,
    content::{Content, Operation},
    dictionary,
};
use tracing::{debug, trace};

/// Maps millimetre boxes with a top-left origin into PDF user space
#[derive(Debug, Clone, Copy)]
struct PageSpace {
    height_pt: f32,
}

impl PageSpace {
    fn new(page: &Rect) -> Self {
        Self {
            height_pt: mm_to_pt(page.height),
        }
    }

    /// (x, y, width, height) of the box in points, y measured from the page bottom
    fn rect(&self, rect: &Rect) -> (f32, f32, f32, f32) {
        (
            mm_to_pt(rect.left),
            self.height_pt - mm_to_pt(rect.bottom()),
            mm_to_pt(rect.width),
            mm_to_pt(rect.height),
        )
    }

    fn y(&self, top_mm: f32) -> f32 {
        self.height_pt - mm_to_pt(top_mm)
    }
}

/// Generate PDF operations for drawing a rendered sheet
pub fn generate_sheet_operations(sheet: &RenderedSheet, options: &RenderOptions) -> Vec<Operation> {
    let space = PageSpace::new(&sheet.page);
    let mut operations = vec![Operation::new("q", vec![])];

    debug!("Generating operations for {} cells", sheet.cells.len());

    for cell in &sheet.cells {
        if let PlacedContent::QrWithDescription { qr, qr_box, text } = &cell.content {
            operations.extend(draw_qr(qr, qr_box, &space));
            operations.extend(draw_text_block(text, options.text_color, &space));
        }
    }

    if sheet.show_borders {
        operations.extend(set_stroke_style(options.border_color, options.border_width));

        let (x, y, w, h) = space.rect(&sheet.page);
        operations.extend(draw_rectangle_stroke(x, y, w, h));

        let radius = mm_to_pt(CELL_CORNER_RADIUS_MM);
        for cell in &sheet.cells {
            let (x, y, w, h) = space.rect(&cell.bounds);
            operations.extend(draw_rounded_rectangle_stroke(x, y, w, h, radius));
        }
    }

    operations.push(Operation::new("Q", vec![]));

    trace!("Generated {} operations", operations.len());
    operations
}

/// Draw the dark modules of a QR symbol as filled rectangles
fn draw_qr(qr: &QrMatrix, qr_box: &Rect, space: &PageSpace) -> Vec<Operation> {
    if qr.width() == 0 || qr_box.width <= 0.0 {
        return Vec::new();
    }

    let module = mm_to_pt(qr_box.width) / qr.width() as f32;
    let (origin_x, origin_y, _, side) = space.rect(qr_box);
    let top = origin_y + side;

    let mut operations = vec![set_fill_color(Color::black())];
    for run in qr.dark_runs() {
        operations.push(rectangle(
            origin_x + run.start as f32 * module,
            top - (run.row + 1) as f32 * module,
            run.len as f32 * module,
            module,
        ));
    }
    operations.push(fill());
    operations
}

/// Draw wrapped description lines, one text object per block
fn draw_text_block(text: &TextBlock, color: Color, space: &PageSpace) -> Vec<Operation> {
    if text.lines.iter().all(|line| line.text.is_empty()) {
        return Vec::new();
    }

    let mut operations = vec![Operation::new("BT", vec![]), set_fill_color(color)];

    let x = mm_to_pt(text.area.left);
    let line_height = mm_to_pt(text.line_height);
    let first_baseline = space.y(text.top) - text.font_size;
    let mut current_bold = None;

    operations.push(Operation::new(
        "Td",
        vec![x.into(), first_baseline.into()],
    ));

    for (line_idx, line) in text.lines.iter().enumerate() {
        if line_idx > 0 {
            operations.push(Operation::new(
                "Td",
                vec![0.0f32.into(), (-line_height).into()],
            ));
        }
        if line.text.is_empty() {
            continue;
        }

        if current_bold != Some(line.bold) {
            let font_name = if line.bold { FONT_BOLD } else { FONT_REGULAR };
            operations.push(Operation::new(
                "Tf",
                vec![
                    Object::Name(font_name.as_bytes().to_vec()),
                    text.font_size.into(),
                ],
            ));
            current_bold = Some(line.bold);
        }

        operations.push(Operation::new(
            "Tj",
            vec![text_string(encode_win_ansi(&line.text))],
        ));
    }

    operations.push(Operation::new("ET", vec![]));
    operations
}

/// Add operations to a page in the document
pub fn add_operations_to_page(
    doc: &mut Document,
    page_id: ObjectId,
    operations: Vec<Operation>,
) -> Result<()> {
    if doc.get_dictionary(page_id).is_err() {
        return Err(SheetError::PageNotFound(page_id));
    }

    debug!(
        "Adding {} operations to page {:?}",
        operations.len(),
        page_id
    );

    let content = Content { operations };
    let content_bytes = content.encode()?;
    doc.add_page_contents(page_id, content_bytes)?;

    Ok(())
}

/// Add the standard fonts the sheet text is set in and return the
/// resources dictionary that references them
pub fn add_font_resources(doc: &mut Document) -> ObjectId {
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
        "Encoding" => "WinAnsiEncoding",
    });

    let font_bold_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica-Bold",
        "Encoding" => "WinAnsiEncoding",
    });

    doc.add_object(dictionary! {
        "Font" => dictionary! {
            FONT_REGULAR => font_id,
            FONT_BOLD => font_bold_id,
        },
    })
}

/// Create a single-page document sized to the sheet and return it with the
/// page's object ID
pub fn create_sheet_document(config: &SheetConfig) -> (Document, ObjectId) {
    let mut doc = Document::with_version("1.5");

    let width = mm_to_pt(config.page_width as f32);
    let height = mm_to_pt(config.page_height as f32);
    let media_box: Vec<Object> = vec![0.into(), 0.into(), width.into(), height.into()];

    let pages_id = doc.new_object_id();
    let resources_id = add_font_resources(&mut doc);

    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "MediaBox" => media_box.clone(),
        "Resources" => resources_id,
    });

    let kids: Vec<Object> = vec![page_id.into()];
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => 1,
            "MediaBox" => media_box,
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    trace!("Created {}x{} pt sheet page {:?}", width, height, page_id);
    (doc, page_id)
}
