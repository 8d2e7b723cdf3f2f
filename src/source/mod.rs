//! Span sources: where the engine's input geometry comes from.
//!
//! The outline pipeline is written against the [`SpanSource`] trait so the
//! same engine runs over real PDFs ([`PdfSpanSource`]) and hand-built
//! geometry ([`MemorySpanSource`]).

mod content;
mod pdf;

pub use pdf::PdfSpanSource;

use crate::error::{Error, Result};
use crate::model::TextSpan;
use serde::{Deserialize, Serialize};

/// Document-level metadata exposed by a span source.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentMetadata {
    /// Title from the document's metadata, if present.
    pub title: Option<String>,
    /// Author from the document's metadata, if present.
    pub author: Option<String>,
}

/// Supplier of per-page text spans plus document metadata.
///
/// Implementations must return spans for a page in the order they were
/// emitted by the document; the pipeline re-sorts candidates into reading
/// order itself and does not rely on source ordering beyond page grouping.
pub trait SpanSource {
    /// Number of pages in the document.
    fn page_count(&self) -> usize;

    /// Text spans for the 0-based `page_index`.
    ///
    /// Individual pages may fail (damaged streams) without the whole
    /// document being unreadable; the pipeline treats such pages as empty.
    fn spans(&self, page_index: usize) -> Result<Vec<TextSpan>>;

    /// Document metadata; defaults to empty.
    fn metadata(&self) -> DocumentMetadata {
        DocumentMetadata::default()
    }

    /// Identifier recorded as `DocumentResult::source_file`.
    fn source_name(&self) -> Option<&str> {
        None
    }
}

/// An in-memory span source over pre-built pages.
///
/// Used throughout the test suite and benchmarks, and useful to run the
/// engine over geometry produced by some other extraction layer.
#[derive(Debug, Clone, Default)]
pub struct MemorySpanSource {
    name: Option<String>,
    metadata: DocumentMetadata,
    pages: Vec<Vec<TextSpan>>,
}

impl MemorySpanSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a source directly from pages of spans.
    pub fn from_pages(pages: Vec<Vec<TextSpan>>) -> Self {
        Self {
            name: None,
            metadata: DocumentMetadata::default(),
            pages,
        }
    }

    /// Set the source identifier.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the metadata title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.metadata.title = Some(title.into());
        self
    }

    /// Append a page of spans.
    pub fn with_page(mut self, spans: Vec<TextSpan>) -> Self {
        self.pages.push(spans);
        self
    }

    /// Append `count` pages with no spans.
    pub fn with_empty_pages(mut self, count: usize) -> Self {
        for _ in 0..count {
            self.pages.push(Vec::new());
        }
        self
    }
}

impl SpanSource for MemorySpanSource {
    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn spans(&self, page_index: usize) -> Result<Vec<TextSpan>> {
        self.pages
            .get(page_index)
            .cloned()
            .ok_or_else(|| Error::PageOutOfRange(page_index, self.pages.len()))
    }

    fn metadata(&self) -> DocumentMetadata {
        self.metadata.clone()
    }

    fn source_name(&self) -> Option<&str> {
        self.name.as_deref()
    }
}
