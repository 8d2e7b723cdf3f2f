//! Outline assembly: ordering, wrapped-line merging, deduplication and
//! running-header suppression.

use crate::model::{HeadingLevel, OutlineEntry};
use crate::outline::classify::HeadingCandidate;
use crate::outline::options::OutlineOptions;
use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};
use unicode_normalization::UnicodeNormalization;

/// A merged heading on one page, before suppression.
struct Assembled {
    level: HeadingLevel,
    text: String,
    page_index: usize,
    last_size: f32,
    last_y1: f32,
}

/// Assemble per-page heading candidates into the final outline.
///
/// `pages` is indexed by page; `page_count` is the document's total page
/// count, which is the denominator for running-header recurrence.
pub(crate) fn assemble_outline(
    pages: Vec<Vec<HeadingCandidate>>,
    page_count: usize,
    options: &OutlineOptions,
) -> Vec<OutlineEntry> {
    let mut assembled: Vec<Vec<Assembled>> = pages
        .into_iter()
        .map(|candidates| assemble_page(candidates, options))
        .collect();

    suppress_running_headers(&mut assembled, page_count, options);

    let mut outline: Vec<OutlineEntry> = Vec::new();
    let mut last_key: Option<(usize, String)> = None;
    for entry in assembled.into_iter().flatten() {
        // Suppression can leave two copies of the same heading adjacent on
        // a page; collapse them just like the per-page pass did.
        let key = (entry.page_index, normalize_text(&entry.text));
        if last_key.as_ref() == Some(&key) {
            continue;
        }
        last_key = Some(key);
        outline.push(OutlineEntry::new(
            entry.level,
            collapse_ws(&entry.text),
            (entry.page_index + 1) as u32,
        ));
    }
    outline
}

/// Sort one page's candidates into reading order, merge wrapped lines, and
/// collapse adjacent duplicates.
fn assemble_page(mut candidates: Vec<HeadingCandidate>, options: &OutlineOptions) -> Vec<Assembled> {
    candidates.sort_by(|a, b| {
        a.span
            .bbox
            .y0
            .partial_cmp(&b.span.bbox.y0)
            .unwrap_or(Ordering::Equal)
            .then_with(|| {
                a.span
                    .bbox
                    .x0
                    .partial_cmp(&b.span.bbox.x0)
                    .unwrap_or(Ordering::Equal)
            })
    });

    let mut merged: Vec<Assembled> = Vec::new();
    for candidate in candidates {
        let span = &candidate.span;
        if let Some(last) = merged.last_mut() {
            let gap = span.bbox.y0 - last.last_y1;
            if last.level == candidate.level && gap <= options.merge_gap_factor * last.last_size {
                // Line-wrap continuation of the previous heading.
                last.text.push(' ');
                last.text.push_str(span.trimmed());
                last.last_size = span.font_size;
                last.last_y1 = span.bbox.y1;
                continue;
            }
        }
        merged.push(Assembled {
            level: candidate.level,
            text: span.trimmed().to_string(),
            page_index: span.page_index,
            last_size: span.font_size,
            last_y1: span.bbox.y1,
        });
    }

    merged.dedup_by(|a, b| normalize_text(&a.text) == normalize_text(&b.text));
    merged
}

/// Remove headings whose normalized text recurs on more than the configured
/// fraction of the document's pages (and on at least two pages, so a
/// single-page document is never emptied).
fn suppress_running_headers(
    assembled: &mut [Vec<Assembled>],
    page_count: usize,
    options: &OutlineOptions,
) {
    if page_count == 0 {
        return;
    }

    let mut pages_with: HashMap<String, usize> = HashMap::new();
    for page in assembled.iter() {
        let unique: HashSet<String> = page.iter().map(|e| normalize_text(&e.text)).collect();
        for key in unique {
            *pages_with.entry(key).or_insert(0) += 1;
        }
    }

    let threshold = options.header_fraction * page_count as f32;
    let suppressed: HashSet<String> = pages_with
        .into_iter()
        .filter(|(_, count)| *count >= 2 && *count as f32 > threshold)
        .map(|(key, count)| {
            log::debug!(
                "suppressing running header {:?} (on {} of {} pages)",
                key,
                count,
                page_count
            );
            key
        })
        .collect();

    if suppressed.is_empty() {
        return;
    }
    for page in assembled.iter_mut() {
        page.retain(|entry| !suppressed.contains(&normalize_text(&entry.text)));
    }
}

/// Comparison key: NFKC-normalized, lowercased, whitespace-collapsed.
pub(crate) fn normalize_text(text: &str) -> String {
    let folded: String = text.nfkc().collect::<String>().to_lowercase();
    collapse_ws(&folded)
}

/// Collapse runs of whitespace to single spaces and trim the ends.
pub(crate) fn collapse_ws(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
