//! Description formatting, text wrapping and PDF text encoding

use crate::constants::*;
use crate::font::FontMetrics;
use tracing::trace;

/// How a description is interpreted before it is laid out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DescriptionFormat {
    /// Every line is printed as typed
    Plain,
    /// A light Markdown subset: headings, bold lines, list items and
    /// paragraphs joined from soft line breaks
    #[default]
    Markdown,
}

/// One printable line of a description
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextLine {
    pub text: String,
    pub bold: bool,
}

impl TextLine {
    pub fn new<S: Into<String>>(text: S, bold: bool) -> Self {
        Self {
            text: text.into(),
            bold,
        }
    }

    pub fn plain<S: Into<String>>(text: S) -> Self {
        Self::new(text, false)
    }
}

/// Split a description into logical lines, before wrapping
pub fn format_description(description: &str, format: DescriptionFormat) -> Vec<TextLine> {
    match format {
        DescriptionFormat::Plain => {
            let lines: Vec<TextLine> = description.lines().map(TextLine::plain).collect();
            if lines.is_empty() {
                vec![TextLine::plain("")]
            } else {
                lines
            }
        }
        DescriptionFormat::Markdown => format_markdown(description),
    }
}

fn format_markdown(source: &str) -> Vec<TextLine> {
    let mut lines = Vec::new();
    let mut paragraph = String::new();

    fn flush(paragraph: &mut String, lines: &mut Vec<TextLine>) {
        if !paragraph.is_empty() {
            lines.push(TextLine::plain(strip_inline(paragraph.trim())));
            paragraph.clear();
        }
    }

    for raw in source.lines() {
        let line = raw.trim();

        if line.is_empty() {
            flush(&mut paragraph, &mut lines);
            continue;
        }

        if let Some(heading) = heading_text(line) {
            flush(&mut paragraph, &mut lines);
            lines.push(TextLine::new(strip_inline(heading), true));
            continue;
        }

        if let Some(item) = list_item_text(line) {
            flush(&mut paragraph, &mut lines);
            lines.push(TextLine::plain(format!("- {}", strip_inline(item))));
            continue;
        }

        if let Some(strong) = strong_line_text(line) {
            flush(&mut paragraph, &mut lines);
            lines.push(TextLine::new(strip_inline(strong), true));
            continue;
        }

        if !paragraph.is_empty() {
            paragraph.push(' ');
        }
        paragraph.push_str(line);

        // Two trailing spaces or a backslash force a line break
        if raw.ends_with("  ") || line.ends_with('\\') {
            if paragraph.ends_with('\\') {
                paragraph.pop();
            }
            flush(&mut paragraph, &mut lines);
        }
    }
    flush(&mut paragraph, &mut lines);

    if lines.is_empty() {
        lines.push(TextLine::plain(""));
    }
    lines
}

fn heading_text(line: &str) -> Option<&str> {
    let level = line.chars().take_while(|c| *c == '#').count();
    if (1..=6).contains(&level) {
        let rest = &line[level..];
        if rest.is_empty() {
            return Some("");
        }
        if rest.starts_with(' ') {
            return Some(rest.trim());
        }
    }
    None
}

fn list_item_text(line: &str) -> Option<&str> {
    ["- ", "* ", "+ "]
        .iter()
        .find_map(|marker| line.strip_prefix(marker))
        .map(str::trim)
}

fn strong_line_text(line: &str) -> Option<&str> {
    for marker in ["**", "__"] {
        if line.len() > 4 && line.starts_with(marker) && line.ends_with(marker) {
            let inner = &line[2..line.len() - 2];
            if !inner.contains(marker) {
                return Some(inner);
            }
        }
    }
    None
}

/// Remove paired emphasis (`*`, `_`, `**`, `__`) and code (`` ` ``) markers.
///
/// Unpaired markers and markers surrounded by spaces are kept as typed.
fn strip_inline(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len());
    let mut i = 0;
    while i < chars.len() {
        match delimited_span(&chars, i) {
            Some((marker_len, close)) => {
                let inner: String = chars[i + marker_len..close].iter().collect();
                if chars[i] == '`' {
                    out.push_str(&inner);
                } else {
                    out.push_str(&strip_inline(&inner));
                }
                i = close + marker_len;
            }
            None => {
                out.push(chars[i]);
                i += 1;
            }
        }
    }
    out
}

/// Length of the delimiter opening at `start` and the index of its closing
/// counterpart, if both exist
fn delimited_span(chars: &[char], start: usize) -> Option<(usize, usize)> {
    let marker = chars[start];
    if !matches!(marker, '*' | '_' | '`') {
        return None;
    }
    let len = if marker != '`' && chars.get(start + 1) == Some(&marker) {
        2
    } else {
        1
    };

    let before = start.checked_sub(1).map(|i| chars[i]);
    let after = chars.get(start + len).copied();
    if after.is_none_or(char::is_whitespace) {
        return None;
    }
    // Underscores inside a word are literal, as in snake_case
    if marker == '_' && before.is_some_and(char::is_alphanumeric) {
        return None;
    }

    let mut close = start + len + 1;
    while close + len <= chars.len() {
        let next = chars.get(close + len).copied();
        let closes = chars[close..close + len].iter().all(|c| *c == marker)
            && !chars[close - 1].is_whitespace()
            && next != Some(marker)
            && !(marker == '_' && next.is_some_and(char::is_alphanumeric));
        if closes {
            return Some((len, close));
        }
        close += 1;
    }
    None
}

/// Character widths from the fixed `DEFAULT_CHAR_WIDTH_RATIO` heuristic
#[derive(Debug)]
struct EstimatedMetrics;

impl FontMetrics for EstimatedMetrics {
    fn char_width(&self, _ch: char, font_size: f32) -> f32 {
        font_size * DEFAULT_CHAR_WIDTH_RATIO
    }
}

/// Break text into lines that fit within the specified width, estimating
/// character widths
pub fn wrap_text(text: &str, max_width: f32, font_size: f32) -> Vec<String> {
    wrap_text_with_metrics(text, max_width, font_size, &EstimatedMetrics)
}

/// Break text into lines using actual font metrics for width measurement.
///
/// Words are placed greedily; a word wider than a whole line is split on
/// character boundaries. Every `\n` starts a new line.
pub fn wrap_text_with_metrics(
    text: &str,
    max_width: f32,
    font_size: f32,
    metrics: &dyn FontMetrics,
) -> Vec<String> {
    if text.is_empty() {
        return vec![String::new()];
    }
    if max_width <= 0.0 {
        return text.split('\n').map(str::to_string).collect();
    }

    let space_width = metrics.char_width(' ', font_size);
    let mut lines = Vec::new();

    for segment in text.split('\n') {
        let mut line = String::new();
        let mut width = 0.0;

        for word in segment.split_whitespace() {
            let word_width = metrics.text_width(word, font_size);

            if !line.is_empty() && width + space_width + word_width <= max_width {
                line.push(' ');
                line.push_str(word);
                width += space_width + word_width;
                continue;
            }
            if !line.is_empty() {
                lines.push(std::mem::take(&mut line));
            }

            // URLs and other long tokens
            let mut rest = word;
            while metrics.text_width(rest, font_size) > max_width {
                let split = split_point(rest, max_width, font_size, metrics);
                let (chunk, tail) = rest.split_at(split);
                lines.push(chunk.to_string());
                rest = tail;
            }
            line.push_str(rest);
            width = metrics.text_width(rest, font_size);
        }

        lines.push(line);
    }

    trace!("Wrapped text into {} lines", lines.len());
    lines
}

/// Byte offset of the longest prefix of `word` that fits, at least one character
fn split_point(word: &str, max_width: f32, font_size: f32, metrics: &dyn FontMetrics) -> usize {
    let mut used = 0.0;
    let mut split = 0;
    for (idx, ch) in word.char_indices() {
        used += metrics.char_width(ch, font_size);
        if used > max_width && split > 0 {
            break;
        }
        split = idx + ch.len_utf8();
    }
    split
}

/// Format and wrap a description into the lines printed in a text column
/// `max_width` points wide
pub fn layout_description(
    description: &str,
    format: DescriptionFormat,
    max_width: f32,
    font_size: f32,
    metrics: Option<&dyn FontMetrics>,
) -> Vec<TextLine> {
    let mut lines = Vec::new();
    for logical in format_description(description, format) {
        let wrapped = match metrics {
            Some(m) => wrap_text_with_metrics(&logical.text, max_width, font_size, m),
            None => wrap_text(&logical.text, max_width, font_size),
        };
        lines.extend(
            wrapped
                .into_iter()
                .map(|text| TextLine::new(text, logical.bold)),
        );
    }
    lines
}

/// Estimate text width based on character count and font size
pub fn estimate_text_width(text: &str, font_size: f32) -> f32 {
    EstimatedMetrics.text_width(text, font_size)
}

/// Encode text for the standard fonts' WinAnsiEncoding.
///
/// Latin-1 maps directly; a handful of typographic characters map into the
/// 0x80-0x9F range; anything else becomes `?`.
pub fn encode_win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|ch| match ch {
            '\u{20ac}' => 0x80,
            '\u{201a}' => 0x82,
            '\u{201e}' => 0x84,
            '\u{2026}' => 0x85,
            '\u{2018}' => 0x91,
            '\u{2019}' => 0x92,
            '\u{201c}' => 0x93,
            '\u{201d}' => 0x94,
            '\u{2022}' => 0x95,
            '\u{2013}' => 0x96,
            '\u{2014}' => 0x97,
            '\u{2122}' => 0x99,
            c if (c as u32) < 0x80 || (0xa0..=0xff).contains(&(c as u32)) => c as u32 as u8,
            _ => b'?',
        })
        .collect()
}
