//! Outline inference: body-font estimation, heading classification, title
//! resolution and outline assembly.
//!
//! The pipeline is a pure function of one document's spans and metadata, so
//! the same document always yields the same outline no matter how many
//! documents are being processed around it.

mod assemble;
mod classify;
mod fonts;
mod options;
mod title;

pub use classify::{ClassifierRule, HeadingCandidate, HeadingClassifier};
pub use fonts::BodyFontProfile;
pub use options::OutlineOptions;
pub use title::resolve_title;

use crate::error::{Error, Result};
use crate::model::{DocumentResult, TextSpan};
use crate::source::SpanSource;
use std::collections::BTreeMap;

/// Run the full outline pipeline over one document.
///
/// Pages that fail to read are logged and treated as empty; the call fails
/// only when every page in the font-estimation sample is unreadable (there
/// is no baseline to classify against) or when `options` are inconsistent.
pub fn extract_outline<S: SpanSource>(
    source: &S,
    options: &OutlineOptions,
) -> Result<DocumentResult> {
    let classifier = HeadingClassifier::new(options)?;
    let page_count = source.page_count();
    let sample_len = page_count.min(options.sample_pages);

    let mut pages: Vec<Vec<TextSpan>> = Vec::with_capacity(page_count);
    let mut sample_failures = 0usize;
    for index in 0..page_count {
        match source.spans(index) {
            Ok(spans) => pages.push(spans),
            Err(e) => {
                log::warn!("skipping unreadable page {}: {}", index + 1, e);
                if index < sample_len {
                    sample_failures += 1;
                }
                pages.push(Vec::new());
            }
        }
    }
    if page_count > 0 && sample_failures == sample_len {
        return Err(Error::Estimation(format!(
            "all {} sampled pages were unreadable",
            sample_len
        )));
    }

    let profile = BodyFontProfile::from_pages(&pages[..sample_len], options.fallback_body_size);
    let body_size = profile.body_size();

    let candidate_pages: Vec<Vec<HeadingCandidate>> = pages
        .iter()
        .map(|page| {
            let indent = page_body_indent(page, &profile, options.default_body_indent);
            page.iter()
                .filter_map(|span| classifier.classify(span, body_size, indent))
                .collect()
        })
        .collect();

    let first_page = pages.first().map(Vec::as_slice).unwrap_or(&[]);
    let title = resolve_title(&source.metadata(), first_page);
    let outline = assemble::assemble_outline(candidate_pages, page_count, options);

    let source_file = source.source_name().unwrap_or_default().to_string();
    log::debug!(
        "{}: {} pages, body {:.1}pt, {} headings",
        if source_file.is_empty() {
            "<memory>"
        } else {
            source_file.as_str()
        },
        page_count,
        body_size,
        outline.len()
    );

    Ok(DocumentResult {
        source_file,
        title,
        outline,
        page_count,
    })
}

/// Modal left edge (whole points) of a page's body-sized spans, used by the
/// weak bold-heading rule. Ties prefer the smaller edge; pages without
/// body-sized text fall back to the configured default.
fn page_body_indent(page: &[TextSpan], profile: &BodyFontProfile, default_indent: f32) -> f32 {
    let mut edges: BTreeMap<i32, u32> = BTreeMap::new();
    for span in page {
        if profile.is_body_sized(span) && !span.trimmed().is_empty() {
            *edges.entry(span.bbox.x0.round() as i32).or_insert(0) += 1;
        }
    }

    let mut best: Option<(i32, u32)> = None;
    for (&edge, &count) in &edges {
        match best {
            Some((_, best_count)) if count <= best_count => {}
            _ => best = Some((edge, count)),
        }
    }
    best.map(|(edge, _)| edge as f32).unwrap_or(default_indent)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{BoundingBox, HeadingLevel};
    use crate::source::MemorySpanSource;

    fn span(page: usize, text: &str, size: f32, font: &str, x0: f32, y0: f32) -> TextSpan {
        TextSpan::new(
            page,
            text,
            size,
            BoundingBox::new(x0, y0, x0 + 200.0, y0 + size),
            font,
        )
    }

    /// Source whose pages can be marked unreadable.
    struct FlakySource {
        pages: Vec<Option<Vec<TextSpan>>>,
    }

    impl SpanSource for FlakySource {
        fn page_count(&self) -> usize {
            self.pages.len()
        }

        fn spans(&self, page_index: usize) -> Result<Vec<TextSpan>> {
            match self.pages.get(page_index) {
                Some(Some(spans)) => Ok(spans.clone()),
                Some(None) => Err(Error::Unreadable(format!("page {} damaged", page_index))),
                None => Err(Error::PageOutOfRange(page_index, self.pages.len())),
            }
        }
    }

    #[test]
    fn test_pipeline_end_to_end() {
        let source = MemorySpanSource::new()
            .with_name("guide.pdf")
            .with_page(vec![
                span(0, "User Guide", 22.0, "Helvetica-Bold", 72.0, 60.0),
                span(0, "Introduction", 16.0, "Helvetica-Bold", 72.0, 120.0),
                span(0, "Welcome to the product documentation.", 11.0, "Helvetica", 72.0, 150.0),
                span(0, "This guide covers installation and basic use.", 11.0, "Helvetica", 72.0, 165.0),
            ]);

        let result = extract_outline(&source, &OutlineOptions::default()).unwrap();
        assert_eq!(result.source_file, "guide.pdf");
        assert_eq!(result.title, "User Guide");
        // The 22pt banner is the title span and also classifies as H1.
        assert_eq!(result.outline.len(), 2);
        assert_eq!(result.outline[0].text, "User Guide");
        assert_eq!(result.outline[1].level, HeadingLevel::H1);
        assert_eq!(result.outline[1].text, "Introduction");
        assert_eq!(result.outline[1].page, 1);
    }

    #[test]
    fn test_empty_document_yields_empty_result() {
        let source = MemorySpanSource::new().with_empty_pages(3);
        let result = extract_outline(&source, &OutlineOptions::default()).unwrap();
        assert_eq!(result.title, "");
        assert!(result.outline.is_empty());
    }

    #[test]
    fn test_unreadable_page_is_skipped() {
        let body = "enough running text to anchor the body font estimate";
        let source = FlakySource {
            pages: vec![
                Some(vec![
                    span(0, "Overview", 16.0, "Helvetica-Bold", 72.0, 80.0),
                    span(0, body, 11.0, "Helvetica", 72.0, 120.0),
                ]),
                None,
                Some(vec![
                    span(2, "Details", 16.0, "Helvetica-Bold", 72.0, 80.0),
                    span(2, body, 11.0, "Helvetica", 72.0, 120.0),
                ]),
            ],
        };

        let result = extract_outline(&source, &OutlineOptions::default()).unwrap();
        assert_eq!(result.outline.len(), 2);
        assert_eq!(result.outline[0].text, "Overview");
        assert_eq!(result.outline[1].text, "Details");
        assert_eq!(result.outline[1].page, 3);
    }

    #[test]
    fn test_fully_unreadable_sample_fails() {
        let source = FlakySource {
            pages: vec![None, None],
        };
        assert!(matches!(
            extract_outline(&source, &OutlineOptions::default()),
            Err(Error::Estimation(_))
        ));
    }

    #[test]
    fn test_metadata_reaches_the_title() {
        let source = MemorySpanSource::new()
            .with_title("Metadata Wins")
            .with_page(vec![span(0, "Giant Banner", 40.0, "Helvetica", 72.0, 50.0)]);
        let result = extract_outline(&source, &OutlineOptions::default()).unwrap();
        assert_eq!(result.title, "Metadata Wins");
    }

    #[test]
    fn test_page_body_indent_modal_edge() {
        let profile = BodyFontProfile::from_pages(
            &[vec![span(0, "body text sample", 11.0, "Helvetica", 100.0, 50.0)]],
            12.0,
        );
        let page = vec![
            span(0, "first body line", 11.0, "Helvetica", 100.0, 100.0),
            span(0, "second body line", 11.0, "Helvetica", 100.0, 115.0),
            span(0, "outdented note", 11.0, "Helvetica", 72.0, 130.0),
            span(0, "a large heading", 18.0, "Helvetica", 60.0, 40.0),
        ];
        assert_eq!(page_body_indent(&page, &profile, 100.0), 100.0);

        // No body-sized spans: the default applies.
        let bare = vec![span(0, "a large heading", 18.0, "Helvetica", 60.0, 40.0)];
        assert_eq!(page_body_indent(&bare, &profile, 90.0), 90.0);
    }

    #[test]
    fn test_determinism_over_repeat_runs() {
        let source = MemorySpanSource::new()
            .with_page(vec![
                span(0, "Chapter One", 17.0, "Helvetica-Bold", 72.0, 60.0),
                span(0, "body paragraph with plenty of characters", 11.0, "Helvetica", 72.0, 90.0),
            ]);
        let options = OutlineOptions::default();
        let first = extract_outline(&source, &options).unwrap();
        for _ in 0..3 {
            assert_eq!(extract_outline(&source, &options).unwrap(), first);
        }
    }
}
