//! Document title resolution.

use crate::model::TextSpan;
use crate::source::DocumentMetadata;
use std::cmp::Ordering;

/// Resolve a document title.
///
/// A non-empty metadata title always wins. Otherwise the visually dominant
/// span on the first page is taken: largest font size, ties going to the
/// topmost then leftmost span. A document with neither yields an empty
/// string.
pub fn resolve_title(metadata: &DocumentMetadata, first_page: &[TextSpan]) -> String {
    if let Some(title) = &metadata.title {
        let trimmed = title.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }

    first_page
        .iter()
        .filter(|span| !span.trimmed().is_empty())
        .max_by(|a, b| {
            a.font_size
                .partial_cmp(&b.font_size)
                .unwrap_or(Ordering::Equal)
                // Inverted operands: the smaller coordinate should win.
                .then_with(|| {
                    b.bbox
                        .y0
                        .partial_cmp(&a.bbox.y0)
                        .unwrap_or(Ordering::Equal)
                })
                .then_with(|| {
                    b.bbox
                        .x0
                        .partial_cmp(&a.bbox.x0)
                        .unwrap_or(Ordering::Equal)
                })
        })
        .map(|span| span.trimmed().to_string())
        .unwrap_or_default()
}
