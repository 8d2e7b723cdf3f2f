//! Text span geometry: the immutable unit of input to the outline engine.

use serde::{Deserialize, Serialize};

/// Axis-aligned bounding box in top-down page coordinates.
///
/// `y0` is the distance from the page top, so a smaller `y0` means the box
/// sits higher on the page. `x0 <= x1` and `y0 <= y1` always hold for boxes
/// produced by this crate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x0: f32,
    pub y0: f32,
    pub x1: f32,
    pub y1: f32,
}

impl BoundingBox {
    pub fn new(x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        Self { x0, y0, x1, y1 }
    }

    /// Horizontal extent.
    pub fn width(&self) -> f32 {
        self.x1 - self.x0
    }

    /// Vertical extent.
    pub fn height(&self) -> f32 {
        self.y1 - self.y0
    }
}

/// A contiguous run of text with uniform font attributes on one page.
///
/// Spans are produced by a [`SpanSource`](crate::source::SpanSource), live
/// for the duration of one document's pipeline run, and are never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextSpan {
    /// 0-based page index the span was extracted from.
    pub page_index: usize,
    /// Decoded text content.
    pub text: String,
    /// Effective font size in points.
    pub font_size: f32,
    /// Whether the font is a bold face.
    pub is_bold: bool,
    /// Whether the font is an italic/oblique face.
    pub is_italic: bool,
    /// Span extent in top-down page coordinates.
    pub bbox: BoundingBox,
    /// Base font name as reported by the document (e.g. "Helvetica-Bold").
    pub font_name: String,
}

impl TextSpan {
    /// Create a span, inferring bold/italic flags from the font name.
    pub fn new(
        page_index: usize,
        text: impl Into<String>,
        font_size: f32,
        bbox: BoundingBox,
        font_name: impl Into<String>,
    ) -> Self {
        let font_name = font_name.into();
        let is_bold = font_name_is_bold(&font_name);
        let is_italic = font_name_is_italic(&font_name);
        Self {
            page_index,
            text: text.into(),
            font_size,
            is_bold,
            is_italic,
            bbox,
            font_name,
        }
    }

    /// Trimmed text content.
    pub fn trimmed(&self) -> &str {
        self.text.trim()
    }
}

/// Bold detection from font naming conventions (Helvetica-Bold, Arial Black,
/// FreightText Heavy and similar).
pub fn font_name_is_bold(font_name: &str) -> bool {
    let name = font_name.to_lowercase();
    name.contains("bold") || name.contains("black") || name.contains("heavy")
}

/// Italic detection from font naming conventions.
pub fn font_name_is_italic(font_name: &str) -> bool {
    let name = font_name.to_lowercase();
    name.contains("italic") || name.contains("oblique")
}
