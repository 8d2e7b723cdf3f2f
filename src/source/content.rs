//! PDF content-stream interpretation: text-showing operators to spans.
//!
//! Walks the operator list of a page's (decompressed) content stream,
//! tracking the text matrix and current font, and emits one [`TextSpan`]
//! per shown string. Positions arrive in PDF's bottom-up coordinates and
//! leave here as the top-down bounding boxes the rest of the crate uses.

use crate::error::{Error, Result};
use crate::model::{BoundingBox, TextSpan};
use lopdf::{Dictionary, Document, Object};
use std::collections::BTreeMap;

/// Approximate glyph ascent as a fraction of font size.
const ASCENT_RATIO: f32 = 0.8;
/// Approximate average glyph advance as a fraction of font size.
const AVG_GLYPH_WIDTH: f32 = 0.5;
/// TJ kerning adjustment (in 1/1000 em) treated as a word space.
const KERNING_SPACE_THRESHOLD: f32 = 200.0;

/// Extract text spans from one page's content stream.
///
/// `fonts` maps resource names (e.g. `F1`) to their font dictionaries, as
/// returned by `Document::get_page_fonts`; `page_height` comes from the
/// page MediaBox and drives the bottom-up to top-down conversion.
pub(crate) fn parse_page_content(
    doc: &Document,
    fonts: &BTreeMap<Vec<u8>, &Dictionary>,
    content: &[u8],
    page_index: usize,
    page_height: f32,
) -> Result<Vec<TextSpan>> {
    let content =
        lopdf::content::Content::decode(content).map_err(|e| Error::Unreadable(e.to_string()))?;

    let mut spans = Vec::new();
    let mut state = TextState::default();

    for op in content.operations {
        match op.operator.as_str() {
            "BT" => {
                state.in_text = true;
                state.matrix = TextMatrix::default();
            }
            "ET" => {
                state.in_text = false;
            }
            "Tf" => {
                if op.operands.len() >= 2 {
                    if let Object::Name(resource) = &op.operands[0] {
                        state.font_resource = resource.clone();
                        state.font_name = base_font_name(fonts, resource);
                    }
                    state.font_size = operand_number(&op.operands[1]).unwrap_or(12.0);
                }
            }
            "TL" => {
                if let Some(leading) = op.operands.first().and_then(operand_number) {
                    state.matrix.leading = leading;
                }
            }
            "Td" | "TD" => {
                if op.operands.len() >= 2 {
                    let tx = operand_number(&op.operands[0]).unwrap_or(0.0);
                    let ty = operand_number(&op.operands[1]).unwrap_or(0.0);
                    // TD also sets the leading to -ty
                    if op.operator == "TD" && ty != 0.0 {
                        state.matrix.leading = -ty;
                    }
                    state.matrix.translate(tx, ty);
                }
            }
            "Tm" => {
                if op.operands.len() >= 6 {
                    let n: Vec<f32> = op.operands[..6]
                        .iter()
                        .map(|o| operand_number(o).unwrap_or(0.0))
                        .collect();
                    state.matrix.set(n[0], n[1], n[2], n[3], n[4], n[5]);
                }
            }
            "T*" => {
                state.matrix.next_line();
            }
            "Tj" => {
                if state.in_text {
                    if let Some(Object::String(bytes, _)) = op.operands.first() {
                        let text = decode_string(doc, fonts, &state.font_resource, bytes);
                        emit_span(&mut spans, &mut state, text, page_index, page_height);
                    }
                }
            }
            "TJ" => {
                if state.in_text {
                    if let Some(Object::Array(items)) = op.operands.first() {
                        let text = decode_tj_array(doc, fonts, &state.font_resource, items);
                        emit_span(&mut spans, &mut state, text, page_index, page_height);
                    }
                }
            }
            "'" | "\"" => {
                state.matrix.next_line();
                if state.in_text {
                    // The " operator takes word and char spacing before the string
                    let text_idx = if op.operator == "\"" { 2 } else { 0 };
                    if let Some(Object::String(bytes, _)) = op.operands.get(text_idx) {
                        let text = decode_string(doc, fonts, &state.font_resource, bytes);
                        emit_span(&mut spans, &mut state, text, page_index, page_height);
                    }
                }
            }
            _ => {}
        }
    }

    Ok(spans)
}

/// Mutable interpreter state while walking one content stream.
struct TextState {
    in_text: bool,
    matrix: TextMatrix,
    font_resource: Vec<u8>,
    font_name: String,
    font_size: f32,
}

impl Default for TextState {
    fn default() -> Self {
        Self {
            in_text: false,
            matrix: TextMatrix::default(),
            font_resource: Vec::new(),
            font_name: String::new(),
            font_size: 12.0,
        }
    }
}

/// Push a span for shown text (if non-blank) and advance the text position
/// by the estimated string width.
fn emit_span(
    spans: &mut Vec<TextSpan>,
    state: &mut TextState,
    text: String,
    page_index: usize,
    page_height: f32,
) {
    let char_count = text.chars().count();
    let scale = state.matrix.vertical_scale();
    let effective_size = state.font_size * scale;
    // Text-space advance for the shown string; device width applies the scale.
    let advance = char_count as f32 * AVG_GLYPH_WIDTH * state.font_size;
    let width = advance * scale;

    if !text.trim().is_empty() {
        let (x, baseline) = state.matrix.position();
        // Bottom-up baseline to top-down box: the glyph top sits one ascent
        // above the baseline.
        let y0 = page_height - (baseline + effective_size * ASCENT_RATIO);
        let bbox = BoundingBox::new(x, y0, x + width, y0 + effective_size);
        spans.push(TextSpan::new(
            page_index,
            text,
            effective_size,
            bbox,
            state.font_name.clone(),
        ));
    }

    if char_count > 0 {
        state.matrix.advance(advance);
    }
}

/// Decode a shown string through the current font's encoding, with a raw
/// fallback when the font is unknown.
fn decode_string(
    doc: &Document,
    fonts: &BTreeMap<Vec<u8>, &Dictionary>,
    font_resource: &[u8],
    bytes: &[u8],
) -> String {
    let encoding = fonts
        .get(font_resource)
        .and_then(|f| f.get_font_encoding(doc).ok());
    match encoding {
        Some(enc) => Document::decode_text(&enc, bytes).unwrap_or_default(),
        None => decode_string_fallback(bytes),
    }
}

/// Decode a TJ operand array: strings joined, with large negative kerning
/// adjustments turned into word spaces (except inside spaceless scripts).
fn decode_tj_array(
    doc: &Document,
    fonts: &BTreeMap<Vec<u8>, &Dictionary>,
    font_resource: &[u8],
    items: &[Object],
) -> String {
    let mut combined = String::new();
    for item in items {
        match item {
            Object::String(bytes, _) => {
                combined.push_str(&decode_string(doc, fonts, font_resource, bytes));
            }
            _ => {
                if let Some(n) = operand_number(item) {
                    // Negative adjustments move the next glyph right; large
                    // ones encode inter-word gaps.
                    if -n > KERNING_SPACE_THRESHOLD {
                        push_word_space(&mut combined);
                    }
                }
            }
        }
    }
    combined
}

fn push_word_space(text: &mut String) {
    if text.is_empty() || text.ends_with(' ') || text.ends_with('\u{00A0}') {
        return;
    }
    if let Some(last) = text.chars().last() {
        if !is_spaceless_script_char(last) {
            text.push(' ');
        }
    }
}

/// Text matrix tracking for position and scale across operators.
///
/// Td/TD/Tm/T* set the line origin; showing text only advances an in-line
/// offset from that origin, so every line starts at its own left edge.
#[derive(Debug, Clone)]
struct TextMatrix {
    a: f32,
    b: f32,
    c: f32,
    d: f32,
    e: f32,
    f: f32,
    leading: f32,
    /// Text-space advance within the current line.
    offset: f32,
}

impl Default for TextMatrix {
    fn default() -> Self {
        Self {
            a: 1.0,
            b: 0.0,
            c: 0.0,
            d: 1.0,
            e: 0.0,
            f: 0.0,
            leading: 12.0,
            offset: 0.0,
        }
    }
}

impl TextMatrix {
    fn set(&mut self, a: f32, b: f32, c: f32, d: f32, e: f32, f: f32) {
        self.a = a;
        self.b = b;
        self.c = c;
        self.d = d;
        self.e = e;
        self.f = f;
        self.offset = 0.0;
    }

    /// Move the line origin by (tx, ty) in text space.
    fn translate(&mut self, tx: f32, ty: f32) {
        self.e += tx * self.a + ty * self.c;
        self.f += tx * self.b + ty * self.d;
        self.offset = 0.0;
    }

    /// Move down one line by the current leading.
    fn next_line(&mut self) {
        self.translate(0.0, -self.leading);
    }

    /// Advance within the line by `width` text-space units.
    fn advance(&mut self, width: f32) {
        self.offset += width;
    }

    fn position(&self) -> (f32, f32) {
        (self.e + self.offset * self.a, self.f + self.offset * self.b)
    }

    fn vertical_scale(&self) -> f32 {
        (self.b * self.b + self.d * self.d).sqrt()
    }
}

/// Resolve a font resource name to its BaseFont, falling back to the
/// resource name itself.
fn base_font_name(fonts: &BTreeMap<Vec<u8>, &Dictionary>, resource: &[u8]) -> String {
    fonts
        .get(resource)
        .and_then(|f| f.get(b"BaseFont").ok())
        .and_then(|o| o.as_name().ok())
        .map(|n| String::from_utf8_lossy(n).to_string())
        .unwrap_or_else(|| String::from_utf8_lossy(resource).to_string())
}

/// Numeric operand, integer or real.
fn operand_number(obj: &Object) -> Option<f32> {
    match obj {
        Object::Integer(i) => Some(*i as f32),
        Object::Real(r) => Some(*r),
        _ => None,
    }
}

/// Characters from scripts written without word spaces (CJK ideographs and
/// Japanese kana), where kerning gaps must not become spaces.
fn is_spaceless_script_char(c: char) -> bool {
    let code = c as u32;
    (0x4E00..=0x9FFF).contains(&code)        // CJK Unified Ideographs
        || (0x3400..=0x4DBF).contains(&code) // CJK Extension A
        || (0x20000..=0x2A6DF).contains(&code) // CJK Extension B
        || (0x3040..=0x309F).contains(&code) // Hiragana
        || (0x30A0..=0x30FF).contains(&code) // Katakana
        || (0x3000..=0x303F).contains(&code) // CJK punctuation
}

/// Byte-level string decoding when no font encoding is available:
/// UTF-16BE (BOM), then UTF-8, then Latin-1. Also used for the trailer
/// Info dictionary, whose strings follow the same BOM convention.
pub(crate) fn decode_string_fallback(bytes: &[u8]) -> String {
    if bytes.len() >= 2 && bytes[0] == 0xFE && bytes[1] == 0xFF {
        let utf16: Vec<u16> = bytes[2..]
            .chunks_exact(2)
            .map(|c| u16::from_be_bytes([c[0], c[1]]))
            .collect();
        return String::from_utf16(&utf16).unwrap_or_default();
    }

    match std::str::from_utf8(bytes) {
        Ok(s) => s.to_string(),
        Err(_) => bytes.iter().map(|&b| b as char).collect(),
    }
}
