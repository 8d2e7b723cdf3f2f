//! Batch-level statistics, built once by reducing per-document outcomes.

use crate::error::{Error, Result};
use crate::model::outline::{DocumentResult, HeadingLevel, JsonFormat};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Per-level heading tallies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeadingCounts {
    #[serde(rename = "H1")]
    pub h1: usize,
    #[serde(rename = "H2")]
    pub h2: usize,
    #[serde(rename = "H3")]
    pub h3: usize,
}

impl HeadingCounts {
    /// Count one heading of the given level.
    pub fn add(&mut self, level: HeadingLevel) {
        match level {
            HeadingLevel::H1 => self.h1 += 1,
            HeadingLevel::H2 => self.h2 += 1,
            HeadingLevel::H3 => self.h3 += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.h1 + self.h2 + self.h3
    }
}

/// Pages of one document that produced no heading at all.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PagesNoHeading {
    /// The document, as recorded in `DocumentResult::source_file`.
    pub doc: String,
    /// 1-based pages with no outline entry, ascending.
    pub pages: Vec<u32>,
}

/// Aggregate statistics for one batch run.
///
/// Built by a single reduction over document outcomes after all workers have
/// finished; never mutated concurrently. `documents_processed` counts only
/// successful documents.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BatchStats {
    pub documents_processed: usize,
    pub documents_failed: usize,
    pub total_headings: usize,
    pub heading_counts: HeadingCounts,
    /// Documents with heading-less pages, sorted by document name.
    pub pages_no_heading: Vec<PagesNoHeading>,
    /// Mean outline length over successful documents, rounded to 2 decimals.
    pub avg_headings_per_document: f64,
}

impl BatchStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a successfully processed document.
    pub fn record_success(&mut self, result: &DocumentResult) {
        self.documents_processed += 1;
        self.total_headings += result.outline.len();
        let mut covered: BTreeSet<u32> = BTreeSet::new();
        for entry in &result.outline {
            self.heading_counts.add(entry.level);
            covered.insert(entry.page);
        }

        let pages: Vec<u32> = (1..=result.page_count as u32)
            .filter(|page| !covered.contains(page))
            .collect();
        if !pages.is_empty() {
            self.pages_no_heading.push(PagesNoHeading {
                doc: result.source_file.clone(),
                pages,
            });
        }
    }

    /// Record a document that failed before producing a result.
    pub fn record_failure(&mut self) {
        self.documents_failed += 1;
    }

    /// Compute derived values once all outcomes are recorded. Entries are
    /// sorted by document so the output does not depend on completion order.
    pub fn finalize(&mut self) {
        self.pages_no_heading.sort_by(|a, b| a.doc.cmp(&b.doc));
        self.avg_headings_per_document = if self.documents_processed == 0 {
            0.0
        } else {
            let avg = self.total_headings as f64 / self.documents_processed as f64;
            (avg * 100.0).round() / 100.0
        };
    }

    /// Serialize the statistics as JSON.
    pub fn to_json(&self, format: JsonFormat) -> Result<String> {
        match format {
            JsonFormat::Pretty => serde_json::to_string_pretty(self)
                .map_err(|e| Error::Serialize(format!("JSON serialization failed: {}", e))),
            JsonFormat::Compact => serde_json::to_string(self)
                .map_err(|e| Error::Serialize(format!("JSON serialization failed: {}", e))),
        }
    }
}
