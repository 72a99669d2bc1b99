//! Shared drawing utilities for PDF content streams
//!
//! All inputs here are already in PDF user space: points, origin bottom-left.

use crate::constants::KAPPA;
use crate::style::Color;
use lopdf::{Object, StringFormat, content::Operation};

/// Set the fill color
pub fn set_fill_color(color: Color) -> Operation {
    Operation::new("rg", vec![color.r.into(), color.g.into(), color.b.into()])
}

/// Set stroke color and width for drawing operations
pub fn set_stroke_style(color: Color, width: f32) -> Vec<Operation> {
    vec![
        Operation::new("RG", vec![color.r.into(), color.g.into(), color.b.into()]),
        Operation::new("w", vec![width.into()]),
    ]
}

/// Append a rectangle to the current path
pub fn rectangle(x: f32, y: f32, width: f32, height: f32) -> Operation {
    Operation::new(
        "re",
        vec![x.into(), y.into(), width.into(), height.into()],
    )
}

/// Fill the current path
pub fn fill() -> Operation {
    Operation::new("f", vec![])
}

/// Draw a stroked rectangle (outline only)
pub fn draw_rectangle_stroke(x: f32, y: f32, width: f32, height: f32) -> Vec<Operation> {
    vec![rectangle(x, y, width, height), Operation::new("S", vec![])]
}

/// Draw a stroked rectangle with rounded corners.
///
/// The radius is clamped to half the shorter side.
pub fn draw_rounded_rectangle_stroke(
    x: f32,
    y: f32,
    width: f32,
    height: f32,
    radius: f32,
) -> Vec<Operation> {
    let r = radius.min(width / 2.0).min(height / 2.0).max(0.0);
    if r == 0.0 {
        return draw_rectangle_stroke(x, y, width, height);
    }
    let k = r * KAPPA;
    let (left, bottom, right, top) = (x, y, x + width, y + height);

    let curve = |x1: f32, y1: f32, x2: f32, y2: f32, x3: f32, y3: f32| {
        Operation::new(
            "c",
            vec![
                x1.into(),
                y1.into(),
                x2.into(),
                y2.into(),
                x3.into(),
                y3.into(),
            ],
        )
    };
    let line = |x: f32, y: f32| Operation::new("l", vec![x.into(), y.into()]);

    vec![
        Operation::new("m", vec![(left + r).into(), bottom.into()]),
        line(right - r, bottom),
        curve(right - r + k, bottom, right, bottom + r - k, right, bottom + r),
        line(right, top - r),
        curve(right, top - r + k, right - r + k, top, right - r, top),
        line(left + r, top),
        curve(left + r - k, top, left, top - r + k, left, top - r),
        line(left, bottom + r),
        curve(left, bottom + r - k, left + r - k, bottom, left + r, bottom),
        Operation::new("h", vec![]),
        Operation::new("S", vec![]),
    ]
}

/// A literal PDF string from already encoded bytes
pub fn text_string(bytes: Vec<u8>) -> Object {
    Object::String(bytes, StringFormat::Literal)
}
