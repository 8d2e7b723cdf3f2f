//! Outline extraction options and tuning thresholds.

use crate::error::{Error, Result};

/// Default numbering pattern: "2", "2.1", "2.1.3" followed by a separator.
const DEFAULT_NUMBERING_PATTERN: &str = r"^\d+(\.\d+)*[\s\-:]";

/// Options for outline extraction.
///
/// All heuristic thresholds live here rather than as embedded constants, so
/// callers can tune them per corpus.
#[derive(Debug, Clone)]
pub struct OutlineOptions {
    /// Number of leading pages sampled for body font estimation
    pub sample_pages: usize,

    /// Size delta over the body font that classifies a span as H1 (points)
    pub h1_delta: f32,

    /// Size delta over the body font that classifies a span as H2 (points)
    pub h2_delta: f32,

    /// Regex matched against span text to detect numbered headings
    pub numbering_pattern: String,

    /// Fraction of pages on which a repeated text counts as a running header
    pub header_fraction: f32,

    /// Body font size assumed when a document yields no measurable spans
    pub fallback_body_size: f32,

    /// Left-edge threshold used when a page has no body-sized spans (points)
    pub default_body_indent: f32,

    /// Minimum trimmed text length for a span to be considered a heading
    pub min_heading_chars: usize,

    /// Max vertical gap between merged wrapped-heading lines, as a fraction
    /// of the earlier span's font size
    pub merge_gap_factor: f32,
}

impl OutlineOptions {
    /// Create options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the number of pages sampled for body font estimation.
    pub fn with_sample_pages(mut self, pages: usize) -> Self {
        self.sample_pages = pages;
        self
    }

    /// Set the H1 font-size delta in points.
    pub fn with_h1_delta(mut self, delta: f32) -> Self {
        self.h1_delta = delta;
        self
    }

    /// Set the H2 font-size delta in points.
    pub fn with_h2_delta(mut self, delta: f32) -> Self {
        self.h2_delta = delta;
        self
    }

    /// Set the numbered-heading regex.
    pub fn with_numbering_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.numbering_pattern = pattern.into();
        self
    }

    /// Set the running-header recurrence fraction.
    pub fn with_header_fraction(mut self, fraction: f32) -> Self {
        self.header_fraction = fraction;
        self
    }

    /// Set the fallback body font size in points.
    pub fn with_fallback_body_size(mut self, size: f32) -> Self {
        self.fallback_body_size = size;
        self
    }

    /// Set the default body indent in points.
    pub fn with_default_body_indent(mut self, indent: f32) -> Self {
        self.default_body_indent = indent;
        self
    }

    /// Set the minimum heading text length.
    pub fn with_min_heading_chars(mut self, chars: usize) -> Self {
        self.min_heading_chars = chars;
        self
    }

    /// Set the wrapped-heading merge gap fraction.
    pub fn with_merge_gap_factor(mut self, factor: f32) -> Self {
        self.merge_gap_factor = factor;
        self
    }

    /// Check threshold consistency.
    ///
    /// The regex itself is validated separately when the classifier is built.
    pub fn validate(&self) -> Result<()> {
        if self.sample_pages == 0 {
            return Err(Error::InvalidConfig(
                "sample_pages must be at least 1".to_string(),
            ));
        }
        if self.h2_delta < 0.0 || self.h1_delta < self.h2_delta {
            return Err(Error::InvalidConfig(format!(
                "size deltas must satisfy h1_delta >= h2_delta >= 0 (got {} / {})",
                self.h1_delta, self.h2_delta
            )));
        }
        if !self.header_fraction.is_finite() || self.header_fraction <= 0.0 {
            return Err(Error::InvalidConfig(format!(
                "header_fraction must be positive (got {})",
                self.header_fraction
            )));
        }
        if self.fallback_body_size <= 0.0 {
            return Err(Error::InvalidConfig(format!(
                "fallback_body_size must be positive (got {})",
                self.fallback_body_size
            )));
        }
        if self.merge_gap_factor < 0.0 {
            return Err(Error::InvalidConfig(format!(
                "merge_gap_factor must not be negative (got {})",
                self.merge_gap_factor
            )));
        }
        Ok(())
    }
}

impl Default for OutlineOptions {
    fn default() -> Self {
        Self {
            sample_pages: 10,
            h1_delta: 3.0,
            h2_delta: 1.5,
            numbering_pattern: DEFAULT_NUMBERING_PATTERN.to_string(),
            header_fraction: 0.5,
            fallback_body_size: 12.0,
            default_body_indent: 100.0,
            min_heading_chars: 4,
            merge_gap_factor: 0.5,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_options_builder() {
        let options = OutlineOptions::new()
            .with_sample_pages(5)
            .with_h1_delta(4.0)
            .with_h2_delta(2.0)
            .with_min_heading_chars(2);

        assert_eq!(options.sample_pages, 5);
        assert_eq!(options.h1_delta, 4.0);
        assert_eq!(options.h2_delta, 2.0);
        assert_eq!(options.min_heading_chars, 2);
        assert!(options.validate().is_ok());
    }

    #[test]
    fn test_default_options_validate() {
        let options = OutlineOptions::default();
        assert!(options.validate().is_ok());
        assert_eq!(options.sample_pages, 10);
        assert_eq!(options.header_fraction, 0.5);
    }

    #[test]
    fn test_validate_rejects_inverted_deltas() {
        let options = OutlineOptions::new().with_h1_delta(1.0).with_h2_delta(2.0);
        assert!(matches!(
            options.validate(),
            Err(Error::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_validate_rejects_zero_sample() {
        let options = OutlineOptions::new().with_sample_pages(0);
        assert!(options.validate().is_err());
    }
}
