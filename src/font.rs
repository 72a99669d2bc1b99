//! Font metrics for accurate text measurement

#[cfg(feature = "ttf-parser")]
use crate::constants::DEFAULT_CHAR_WIDTH_RATIO;

/// Trait for measuring text dimensions.
///
/// Implement this trait to wrap descriptions with the real advance widths of
/// the font the sheet is printed with.
pub trait FontMetrics: std::fmt::Debug + Send + Sync {
    /// Width of a single character in points at the given font size
    fn char_width(&self, ch: char, font_size: f32) -> f32;

    /// Total width of a string in points at the given font size
    fn text_width(&self, text: &str, font_size: f32) -> f32 {
        text.chars().map(|ch| self.char_width(ch, font_size)).sum()
    }
}

/// TrueType font metrics using ttf-parser for glyph measurement.
///
/// Advance widths are read once at construction, so measuring never
/// re-parses the font.
#[cfg(feature = "ttf-parser")]
pub struct TtfFontMetrics {
    units_per_em: f32,
    advances: std::collections::HashMap<char, u16>,
}

#[cfg(feature = "ttf-parser")]
impl TtfFontMetrics {
    /// Create metrics from raw TTF/TTC font data.
    pub fn new(font_data: &[u8]) -> crate::Result<Self> {
        let face = ttf_parser::Face::parse(font_data, 0).map_err(|e| {
            crate::error::SheetError::TextError(format!("Failed to parse font: {e}"))
        })?;
        let units_per_em = face.units_per_em() as f32;

        let mut advances = std::collections::HashMap::new();
        if let Some(subtable) = face
            .tables()
            .cmap
            .and_then(|cmap| cmap.subtables.into_iter().find(|s| s.is_unicode()))
        {
            subtable.codepoints(|codepoint| {
                let Some(ch) = char::from_u32(codepoint) else {
                    return;
                };
                if let Some(advance) = subtable
                    .glyph_index(codepoint)
                    .and_then(|gid| face.glyph_hor_advance(gid))
                {
                    advances.insert(ch, advance);
                }
            });
        }

        Ok(Self {
            units_per_em,
            advances,
        })
    }

    pub fn units_per_em(&self) -> f32 {
        self.units_per_em
    }
}

#[cfg(feature = "ttf-parser")]
impl FontMetrics for TtfFontMetrics {
    fn char_width(&self, ch: char, font_size: f32) -> f32 {
        self.advances
            .get(&ch)
            .map(|advance| *advance as f32 / self.units_per_em * font_size)
            .unwrap_or(font_size * DEFAULT_CHAR_WIDTH_RATIO)
    }
}

#[cfg(feature = "ttf-parser")]
impl std::fmt::Debug for TtfFontMetrics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TtfFontMetrics")
            .field("units_per_em", &self.units_per_em)
            .field("glyphs", &self.advances.len())
            .finish()
    }
}
