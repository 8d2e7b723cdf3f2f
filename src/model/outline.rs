//! Outline output types: heading levels, entries, and per-document results.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Heading hierarchy level.
///
/// Ordering follows depth: `H1 < H2 < H3`, so "deeper" compares greater.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum HeadingLevel {
    H1,
    H2,
    H3,
}

impl HeadingLevel {
    /// Numeric depth, 1 for H1 through 3 for H3.
    pub fn depth(self) -> u8 {
        match self {
            HeadingLevel::H1 => 1,
            HeadingLevel::H2 => 2,
            HeadingLevel::H3 => 3,
        }
    }

    /// Level for a numbering depth, capped at H3.
    pub fn from_depth(depth: usize) -> Self {
        match depth {
            0 | 1 => HeadingLevel::H1,
            2 => HeadingLevel::H2,
            _ => HeadingLevel::H3,
        }
    }
}

impl std::fmt::Display for HeadingLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HeadingLevel::H1 => write!(f, "H1"),
            HeadingLevel::H2 => write!(f, "H2"),
            HeadingLevel::H3 => write!(f, "H3"),
        }
    }
}

/// One finalized heading in a document outline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutlineEntry {
    /// Heading level.
    pub level: HeadingLevel,
    /// Heading text, whitespace-collapsed but in its original case.
    pub text: String,
    /// 1-based page number the heading starts on.
    pub page: u32,
}

impl OutlineEntry {
    pub fn new(level: HeadingLevel, text: impl Into<String>, page: u32) -> Self {
        Self {
            level,
            text: text.into(),
            page,
        }
    }
}

/// JSON output style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonFormat {
    /// Pretty-printed with 2-space indentation.
    #[default]
    Pretty,
    /// Single-line compact output.
    Compact,
}

/// The complete extraction result for one document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentResult {
    /// Path or identifier of the input document; empty for anonymous sources.
    pub source_file: String,
    /// Resolved title, possibly empty.
    pub title: String,
    /// Ordered outline entries.
    pub outline: Vec<OutlineEntry>,
    /// Total pages in the source document. Carried for batch statistics,
    /// not part of the JSON output.
    #[serde(skip)]
    pub page_count: usize,
}

impl DocumentResult {
    /// Number of headings in the outline.
    pub fn heading_count(&self) -> usize {
        self.outline.len()
    }

    /// True when no headings were found.
    pub fn is_empty(&self) -> bool {
        self.outline.is_empty()
    }

    /// Serialize the result as JSON.
    pub fn to_json(&self, format: JsonFormat) -> Result<String> {
        match format {
            JsonFormat::Pretty => serde_json::to_string_pretty(self)
                .map_err(|e| Error::Serialize(format!("JSON serialization failed: {}", e))),
            JsonFormat::Compact => serde_json::to_string(self)
                .map_err(|e| Error::Serialize(format!("JSON serialization failed: {}", e))),
        }
    }
}
