//! Sheet configuration: the physical geometry of one printable page

use serde::{Deserialize, Serialize};

use crate::error::{Result, SheetError};
use crate::geometry::VerticalGap;
use crate::style::Padding;

/// Length unit of every geometry value. Only millimetres are supported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Unit {
    #[default]
    #[serde(rename = "mm")]
    Mm,
}

impl Unit {
    pub fn as_str(&self) -> &'static str {
        match self {
            Unit::Mm => "mm",
        }
    }
}

/// Sheet-wide geometry. All lengths are in [`Unit::Mm`].
///
/// Lengths are kept as `f64` so stored and imported values survive a round
/// trip unchanged; layout narrows them to `f32`.
///
/// The grid is not required to fit the page: a grid wider or taller than
/// `page_width`/`page_height` is accepted and simply runs off the page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SheetConfig {
    pub columns: u32,
    pub rows: u32,
    pub body_padding_top: f64,
    pub body_padding_right: f64,
    pub body_padding_bottom: f64,
    pub body_padding_left: f64,
    pub cell_horizontal_gap: f64,
    pub cell_vertical_gap: f64,
    pub cell_width: f64,
    pub cell_height: f64,
    pub cell_padding_top: f64,
    pub cell_padding_right: f64,
    pub cell_padding_bottom: f64,
    pub cell_padding_left: f64,
    pub page_width: f64,
    pub page_height: f64,
    pub unit: Unit,
}

impl SheetConfig {
    /// Number of cells on the sheet
    pub fn capacity(&self) -> usize {
        self.rows as usize * self.columns as usize
    }

    pub fn body_padding(&self) -> Padding {
        Padding::new(
            self.body_padding_top as f32,
            self.body_padding_right as f32,
            self.body_padding_bottom as f32,
            self.body_padding_left as f32,
        )
    }

    pub fn cell_padding(&self) -> Padding {
        Padding::new(
            self.cell_padding_top as f32,
            self.cell_padding_right as f32,
            self.cell_padding_bottom as f32,
            self.cell_padding_left as f32,
        )
    }

    /// Horizontal extent of the grid, from the left edge of the first column
    /// to the right edge of the last
    pub fn grid_width(&self) -> f64 {
        let columns = f64::from(self.columns);
        columns * self.cell_width + (columns - 1.0).max(0.0) * self.cell_horizontal_gap
    }

    /// Vertical extent of the grid under the given gap policy
    pub fn grid_height(&self, vertical_gap: VerticalGap) -> f64 {
        let rows = f64::from(self.rows);
        let gap = match vertical_gap {
            VerticalGap::Ignore => 0.0,
            VerticalGap::Apply => self.cell_vertical_gap,
        };
        rows * self.cell_height + (rows - 1.0).max(0.0) * gap
    }

    /// Whether the padded grid extends past the page edges
    pub fn overflows_page(&self, vertical_gap: VerticalGap) -> bool {
        let width = self.body_padding_left + self.grid_width() + self.body_padding_right;
        let height =
            self.body_padding_top + self.grid_height(vertical_gap) + self.body_padding_bottom;
        width > self.page_width || height > self.page_height
    }

    /// Check every field against the ranges the configuration editor enforces
    pub fn validate(&self) -> Result<()> {
        if self.columns < 1 {
            return Err(invalid("columns", "must be at least 1"));
        }
        if self.rows < 1 {
            return Err(invalid("rows", "must be at least 1"));
        }

        let at_least_one = [
            ("cellWidth", self.cell_width),
            ("cellHeight", self.cell_height),
            ("pageWidth", self.page_width),
            ("pageHeight", self.page_height),
        ];
        for (field, value) in at_least_one {
            check_finite(field, value)?;
            if value < 1.0 {
                return Err(invalid(field, format!("must be at least 1, got {value}")));
            }
        }

        let non_negative = [
            ("bodyPaddingTop", self.body_padding_top),
            ("bodyPaddingRight", self.body_padding_right),
            ("bodyPaddingBottom", self.body_padding_bottom),
            ("bodyPaddingLeft", self.body_padding_left),
            ("cellHorizontalGap", self.cell_horizontal_gap),
            ("cellVerticalGap", self.cell_vertical_gap),
            ("cellPaddingTop", self.cell_padding_top),
            ("cellPaddingRight", self.cell_padding_right),
            ("cellPaddingBottom", self.cell_padding_bottom),
            ("cellPaddingLeft", self.cell_padding_left),
        ];
        for (field, value) in non_negative {
            check_finite(field, value)?;
            if value < 0.0 {
                return Err(invalid(field, format!("must not be negative, got {value}")));
            }
        }

        Ok(())
    }
}

impl Default for SheetConfig {
    fn default() -> Self {
        SheetPreset::Herma5076.config()
    }
}

fn invalid(field: &'static str, reason: impl Into<String>) -> SheetError {
    SheetError::InvalidConfig {
        field,
        reason: reason.into(),
    }
}

fn check_finite(field: &'static str, value: f64) -> Result<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(invalid(field, "must be a finite number"))
    }
}

/// Commercial label sheets with known geometry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SheetPreset {
    /// HERMA 5076: A4, 2 x 7 labels of 99.06 x 38.1 mm
    Herma5076,
}

impl SheetPreset {
    /// All presets, sorted by key
    pub fn all() -> Vec<SheetPreset> {
        let mut presets = vec![SheetPreset::Herma5076];
        presets.sort_by_key(|p| p.key());
        presets
    }

    pub fn key(&self) -> &'static str {
        match self {
            SheetPreset::Herma5076 => "herma5076",
        }
    }

    pub fn nice_name(&self) -> &'static str {
        match self {
            SheetPreset::Herma5076 => "HERMA 5076",
        }
    }

    pub fn from_key(key: &str) -> Result<Self> {
        Self::all()
            .into_iter()
            .find(|p| p.key() == key)
            .ok_or_else(|| SheetError::UnknownPreset(key.to_string()))
    }

    pub fn config(&self) -> SheetConfig {
        match self {
            SheetPreset::Herma5076 => SheetConfig {
                columns: 2,
                rows: 7,
                body_padding_top: 15.15,
                body_padding_right: 4.67,
                body_padding_bottom: 15.15,
                body_padding_left: 4.67,
                cell_horizontal_gap: 2.54,
                cell_vertical_gap: 0.0,
                cell_width: 99.06,
                cell_height: 38.1,
                cell_padding_top: 5.0,
                cell_padding_right: 5.0,
                cell_padding_bottom: 5.0,
                cell_padding_left: 5.0,
                page_width: 210.0,
                page_height: 297.0,
                unit: Unit::Mm,
            },
        }
    }
}
