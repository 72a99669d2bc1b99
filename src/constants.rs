//! Constants for physical units and rendering defaults

/// Points per millimetre (72 pt per inch, 25.4 mm per inch)
pub const PT_PER_MM: f32 = 72.0 / 25.4;

/// Millimetres per CSS pixel (96 px per inch)
pub const MM_PER_CSS_PX: f32 = 25.4 / 96.0;

/// Horizontal space between the QR symbol and the description, in millimetres (16 CSS px)
pub const GROUP_GAP_MM: f32 = 16.0 * MM_PER_CSS_PX;

/// Border width used when borders are shown, in points (1 CSS px)
pub const BORDER_WIDTH_PT: f32 = 0.75;

/// Corner radius of cell borders, in millimetres (10 CSS px)
pub const CELL_CORNER_RADIUS_MM: f32 = 10.0 * MM_PER_CSS_PX;

/// Bezier control point factor approximating a quarter circle
pub const KAPPA: f32 = 0.552_284_8;

/// Default character width ratio for text estimation
/// (average character width as a fraction of font size)
pub const DEFAULT_CHAR_WIDTH_RATIO: f32 = 0.5;

/// Default line height multiplier
pub const DEFAULT_LINE_HEIGHT_MULTIPLIER: f32 = 1.2;

/// Default description font size in points
pub const DEFAULT_FONT_SIZE: f32 = 10.0;

/// Resource name of the regular text font
pub const FONT_REGULAR: &str = "F1";

/// Resource name of the bold text font
pub const FONT_BOLD: &str = "F1-Bold";

/// Convert millimetres to PDF points
pub fn mm_to_pt(mm: f32) -> f32 {
    mm * PT_PER_MM
}

/// Convert PDF points to millimetres
pub fn pt_to_mm(pt: f32) -> f32 {
    pt / PT_PER_MM
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_a4_width_in_points() {
        assert!((mm_to_pt(210.0) - 595.2756).abs() < 0.001);
        assert!((pt_to_mm(mm_to_pt(38.1)) - 38.1).abs() < 0.0001);
    }
}
