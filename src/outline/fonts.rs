//! Body font estimation.
//!
//! The body font size is the statistical baseline every heading rule
//! compares against: a span is only "large" relative to the size most of
//! the document's text is set in.

use crate::model::TextSpan;
use std::collections::BTreeMap;

/// Quantize a font size to a 0.1pt histogram bucket.
pub(crate) fn quantize(size: f32) -> i32 {
    (size * 10.0).round() as i32
}

/// Statistical font-size profile of one document.
///
/// Derived once from a page sample and never mutated afterwards.
#[derive(Debug, Clone)]
pub struct BodyFontProfile {
    body_size: f32,
    size_histogram: BTreeMap<i32, u64>,
}

impl BodyFontProfile {
    /// Estimate the body font size from a sample of pages.
    ///
    /// Buckets are weighted by character count rather than span count, so a
    /// page full of short fragments (page numbers, footnote markers) cannot
    /// outvote the running text. Ties prefer the smaller size. A sample with
    /// no measurable text yields `fallback_size` and an empty histogram.
    pub fn from_pages(pages: &[Vec<TextSpan>], fallback_size: f32) -> Self {
        let mut size_histogram: BTreeMap<i32, u64> = BTreeMap::new();

        for span in pages.iter().flatten() {
            if span.font_size <= 0.0 {
                continue;
            }
            let weight = span.trimmed().chars().count() as u64;
            if weight == 0 {
                continue;
            }
            *size_histogram.entry(quantize(span.font_size)).or_insert(0) += weight;
        }

        // Ascending bucket order plus a strict comparison keeps the smaller
        // size on ties.
        let mut best: Option<(i32, u64)> = None;
        for (&bucket, &weight) in &size_histogram {
            match best {
                Some((_, best_weight)) if weight <= best_weight => {}
                _ => best = Some((bucket, weight)),
            }
        }

        let body_size = match best {
            Some((bucket, weight)) => {
                let size = bucket as f32 / 10.0;
                log::debug!(
                    "estimated body font size {:.1}pt (weight {}, {} buckets)",
                    size,
                    weight,
                    size_histogram.len()
                );
                size
            }
            None => {
                log::debug!(
                    "no measurable text in sample, assuming body font {:.1}pt",
                    fallback_size
                );
                fallback_size
            }
        };

        Self {
            body_size,
            size_histogram,
        }
    }

    /// Estimated body font size in points.
    pub fn body_size(&self) -> f32 {
        self.body_size
    }

    /// Weighted size histogram over 0.1pt buckets.
    pub fn histogram(&self) -> &BTreeMap<i32, u64> {
        &self.size_histogram
    }

    /// Whether a span's size falls in the body-size bucket.
    pub(crate) fn is_body_sized(&self, span: &TextSpan) -> bool {
        quantize(span.font_size) == quantize(self.body_size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::BoundingBox;

    fn span(text: &str, size: f32) -> TextSpan {
        TextSpan::new(
            0,
            text,
            size,
            BoundingBox::new(72.0, 100.0, 300.0, 100.0 + size),
            "Helvetica",
        )
    }

    #[test]
    fn test_character_weight_beats_span_count() {
        // Three short large spans against one long body paragraph.
        let pages = vec![vec![
            span("Heading One", 18.0),
            span("Heading Two", 18.0),
            span("Heading Three", 18.0),
            span(
                "The quick brown fox jumps over the lazy dog while the \
                 engine counts every character of running text.",
                11.0,
            ),
        ]];

        let profile = BodyFontProfile::from_pages(&pages, 12.0);
        assert!((profile.body_size() - 11.0).abs() < 0.01);
    }

    #[test]
    fn test_tie_prefers_smaller_size() {
        let pages = vec![vec![span("aaaa", 10.0), span("bbbb", 14.0)]];
        let profile = BodyFontProfile::from_pages(&pages, 12.0);
        assert!((profile.body_size() - 10.0).abs() < 0.01);
    }

    #[test]
    fn test_empty_sample_falls_back() {
        let profile = BodyFontProfile::from_pages(&[], 12.0);
        assert!((profile.body_size() - 12.0).abs() < 0.01);
        assert!(profile.histogram().is_empty());

        let pages = vec![Vec::new(), Vec::new()];
        let profile = BodyFontProfile::from_pages(&pages, 9.5);
        assert!((profile.body_size() - 9.5).abs() < 0.01);
    }

    #[test]
    fn test_whitespace_spans_contribute_nothing() {
        let pages = vec![vec![
            span("   \t ", 22.0),
            span("actual body text here", 11.5),
        ]];
        let profile = BodyFontProfile::from_pages(&pages, 12.0);
        assert!((profile.body_size() - 11.5).abs() < 0.01);
        assert_eq!(profile.histogram().len(), 1);
    }

    #[test]
    fn test_sub_point_sizes_share_a_bucket() {
        // 11.96 and 12.04 both land in the 12.0 bucket.
        let pages = vec![vec![span("first line", 11.96), span("second line", 12.04)]];
        let profile = BodyFontProfile::from_pages(&pages, 10.0);
        assert_eq!(profile.histogram().len(), 1);
        assert!((profile.body_size() - 12.0).abs() < 0.01);
    }
}
