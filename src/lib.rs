//! # pdftoc
//!
//! Statistical PDF outline inference for Rust.
//!
//! This library reconstructs a document outline (title plus H1/H2/H3
//! headings) from a PDF's raw text geometry, without machine learning and
//! without relying on embedded bookmarks.
//!
//! ## Quick Start
//!
//! ```no_run
//! use pdftoc::{outline_file, JsonFormat};
//!
//! fn main() -> pdftoc::Result<()> {
//!     let result = outline_file("report.pdf")?;
//!
//!     println!("title: {}", result.title);
//!     println!("{}", result.to_json(JsonFormat::Pretty)?);
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Body-font estimation**: character-weighted font-size statistics give
//!   the baseline every heading judgment compares against
//! - **Rule-based classification**: size deltas, section numbering, and
//!   bold-at-margin signals, all thresholds configurable
//! - **Outline assembly**: reading-order sorting, wrapped-heading merging,
//!   deduplication, running-header suppression
//! - **Batch processing**: Rayon worker pool with per-document failure
//!   isolation and deterministic output
//! - **In-memory sources**: run the engine over hand-built span geometry

pub mod batch;
pub mod detect;
pub mod error;
pub mod model;
pub mod outline;
pub mod source;

// Re-export commonly used types
pub use batch::{process_document, BatchOptions, BatchReport, BatchRunner, DocumentOutcome};
pub use detect::{
    detect_format_from_bytes, detect_format_from_path, is_pdf, is_pdf_bytes, PdfFormat,
};
pub use error::{Error, Result};
pub use model::{
    BatchStats, BoundingBox, DocumentResult, HeadingCounts, HeadingLevel, JsonFormat,
    OutlineEntry, PagesNoHeading, TextSpan,
};
pub use outline::{
    extract_outline, resolve_title, BodyFontProfile, ClassifierRule, HeadingCandidate,
    HeadingClassifier, OutlineOptions,
};
pub use source::{DocumentMetadata, MemorySpanSource, PdfSpanSource, SpanSource};

use std::path::Path;

/// Infer the outline of a PDF file.
///
/// # Arguments
///
/// * `path` - Path to the PDF file
///
/// # Returns
///
/// A `Result` containing the [`DocumentResult`] or an error.
///
/// # Example
///
/// ```no_run
/// use pdftoc::outline_file;
///
/// let result = outline_file("document.pdf").unwrap();
/// println!("{} headings", result.heading_count());
/// ```
pub fn outline_file<P: AsRef<Path>>(path: P) -> Result<DocumentResult> {
    let source = PdfSpanSource::open(path)?;
    extract_outline(&source, &OutlineOptions::default())
}

/// Infer the outline of a PDF file with custom options.
///
/// # Example
///
/// ```no_run
/// use pdftoc::{outline_file_with_options, OutlineOptions};
///
/// let options = OutlineOptions::new()
///     .with_h1_delta(4.0)
///     .with_sample_pages(5);
/// let result = outline_file_with_options("document.pdf", &options).unwrap();
/// ```
pub fn outline_file_with_options<P: AsRef<Path>>(
    path: P,
    options: &OutlineOptions,
) -> Result<DocumentResult> {
    let source = PdfSpanSource::open(path)?;
    extract_outline(&source, options)
}

/// Infer the outline of a PDF held in memory.
///
/// # Example
///
/// ```no_run
/// use pdftoc::outline_bytes;
///
/// let data = std::fs::read("document.pdf").unwrap();
/// let result = outline_bytes(&data).unwrap();
/// ```
pub fn outline_bytes(data: &[u8]) -> Result<DocumentResult> {
    let source = PdfSpanSource::from_bytes(data)?;
    extract_outline(&source, &OutlineOptions::default())
}

/// Infer the outline of a PDF held in memory, with custom options.
pub fn outline_bytes_with_options(data: &[u8], options: &OutlineOptions) -> Result<DocumentResult> {
    let source = PdfSpanSource::from_bytes(data)?;
    extract_outline(&source, options)
}

#[cfg(test)]
mod tests {
    use super::*;

    // ==================== Edge Case Tests ====================

    #[test]
    fn test_outline_bytes_empty_data() {
        let data: [u8; 0] = [];
        assert!(outline_bytes(&data).is_err());
    }

    #[test]
    fn test_outline_bytes_too_short() {
        // Data shorter than the PDF magic should fail
        assert!(outline_bytes(b"%PDF").is_err());
    }

    #[test]
    fn test_outline_bytes_unknown_magic() {
        let data = [0xFF, 0xFE, 0x00, 0x01, 0x02, 0x03, 0x04, 0x05];
        let result = outline_bytes(&data);
        assert!(matches!(result, Err(Error::UnknownFormat)));
    }

    #[test]
    fn test_outline_file_missing_path() {
        assert!(matches!(
            outline_file("/nonexistent/never-there.pdf"),
            Err(Error::Io(_))
        ));
    }

    #[test]
    fn test_detect_reexports() {
        let format = detect_format_from_bytes(b"%PDF-1.7\n%test").unwrap();
        assert_eq!(format.version, "1.7");
        assert!(is_pdf_bytes(b"%PDF-2.0\n"));
        assert!(!is_pdf_bytes(b"Not a PDF file"));
    }

    // ==================== Engine Smoke Tests ====================

    #[test]
    fn test_engine_over_memory_source() {
        use crate::model::BoundingBox;

        let source = MemorySpanSource::new().with_page(vec![
            TextSpan::new(
                0,
                "Getting Started",
                16.0,
                BoundingBox::new(72.0, 80.0, 260.0, 96.0),
                "Helvetica-Bold",
            ),
            TextSpan::new(
                0,
                "install the binary and run it once to generate a config",
                11.0,
                BoundingBox::new(72.0, 120.0, 430.0, 131.0),
                "Helvetica",
            ),
        ]);

        let result = extract_outline(&source, &OutlineOptions::default()).unwrap();
        assert_eq!(result.outline.len(), 1);
        assert_eq!(result.outline[0].level, HeadingLevel::H1);
        assert_eq!(result.outline[0].text, "Getting Started");
    }

    #[test]
    fn test_invalid_options_surface_as_config_error() {
        let source = MemorySpanSource::new().with_empty_pages(1);
        let options = OutlineOptions::new().with_numbering_pattern("(broken");
        assert!(matches!(
            extract_outline(&source, &options),
            Err(Error::InvalidConfig(_))
        ));
    }
}
