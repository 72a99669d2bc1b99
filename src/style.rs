//! Styling and render options for sheets and cells

use std::sync::Arc;

use crate::constants::{BORDER_WIDTH_PT, DEFAULT_FONT_SIZE};
use crate::font::FontMetrics;
use crate::geometry::VerticalGap;
use crate::text::DescriptionFormat;

/// RGB color representation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    /// Create a new RGB color (values should be 0.0-1.0)
    pub fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self {
            r: r.clamp(0.0, 1.0),
            g: g.clamp(0.0, 1.0),
            b: b.clamp(0.0, 1.0),
        }
    }

    /// Black color
    pub fn black() -> Self {
        Self::rgb(0.0, 0.0, 0.0)
    }

    /// White color
    pub fn white() -> Self {
        Self::rgb(1.0, 1.0, 1.0)
    }

    /// Gray color
    pub fn gray(level: f32) -> Self {
        let l = level.clamp(0.0, 1.0);
        Self::rgb(l, l, l)
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::black()
    }
}

/// Insets on the four sides of a box, in millimetres
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Padding {
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
    pub left: f32,
}

impl Padding {
    /// Padding in CSS order: top, right, bottom, left
    pub fn new(top: f32, right: f32, bottom: f32, left: f32) -> Self {
        Self {
            top,
            right,
            bottom,
            left,
        }
    }

    /// Create uniform padding
    pub fn uniform(value: f32) -> Self {
        Self::new(value, value, value, value)
    }

    pub fn horizontal(&self) -> f32 {
        self.left + self.right
    }

    pub fn vertical(&self) -> f32 {
        self.top + self.bottom
    }
}

/// Options controlling how a sheet is rendered.
///
/// The print surface uses the defaults; a preview typically turns on
/// `show_borders` so the label outlines are visible.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Outline the page and every cell
    pub show_borders: bool,
    pub border_color: Color,
    /// Border width in points
    pub border_width: f32,
    /// Whether `cellVerticalGap` contributes to row offsets
    pub vertical_gap: VerticalGap,
    pub description_format: DescriptionFormat,
    /// Description font size in points
    pub font_size: f32,
    pub text_color: Color,
    /// Metrics for text measurement. If None, a fixed width ratio is assumed.
    pub font_metrics: Option<Arc<dyn FontMetrics>>,
}

impl RenderOptions {
    /// Options for an on-screen style preview with outlines
    pub fn preview() -> Self {
        Self {
            show_borders: true,
            ..Self::default()
        }
    }

    pub fn with_borders(mut self, show: bool) -> Self {
        self.show_borders = show;
        self
    }

    pub fn with_vertical_gap(mut self, vertical_gap: VerticalGap) -> Self {
        self.vertical_gap = vertical_gap;
        self
    }

    pub fn with_description_format(mut self, format: DescriptionFormat) -> Self {
        self.description_format = format;
        self
    }

    pub fn with_font_size(mut self, size: f32) -> Self {
        self.font_size = size;
        self
    }

    pub fn with_font_metrics(mut self, metrics: Arc<dyn FontMetrics>) -> Self {
        self.font_metrics = Some(metrics);
        self
    }
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            show_borders: false,
            border_color: Color::black(),
            border_width: BORDER_WIDTH_PT,
            vertical_gap: VerticalGap::default(),
            description_format: DescriptionFormat::default(),
            font_size: DEFAULT_FONT_SIZE,
            text_color: Color::black(),
            font_metrics: None,
        }
    }
}
