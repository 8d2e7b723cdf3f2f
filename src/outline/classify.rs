//! Rule-based heading classification.
//!
//! A span is judged against the document's body font baseline by a fixed
//! rule cascade, ordered by confidence: explicit size jumps first, numeric
//! section structure second, boldness at body size last. Classification is
//! a pure function of the span plus two context values (document body size,
//! page body indent); it never looks at neighbouring spans.

use crate::error::{Error, Result};
use crate::model::{HeadingLevel, TextSpan};
use crate::outline::options::OutlineOptions;
use regex::Regex;

/// Which cascade rule produced a candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassifierRule {
    /// Font size exceeded the body baseline by a configured delta.
    FontSize,
    /// Text carries a section number ("2.1 Background").
    Numbering,
    /// Bold text at body size near the left margin.
    BoldIndent,
}

/// A span provisionally classified as a heading, before assembly.
#[derive(Debug, Clone)]
pub struct HeadingCandidate {
    pub span: TextSpan,
    pub level: HeadingLevel,
    pub source_rule: ClassifierRule,
}

/// Deterministic heading classifier.
pub struct HeadingClassifier {
    h1_delta: f32,
    h2_delta: f32,
    min_chars: usize,
    numbering: Regex,
}

impl HeadingClassifier {
    /// Build a classifier from options, compiling the numbering pattern.
    pub fn new(options: &OutlineOptions) -> Result<Self> {
        options.validate()?;
        let numbering = Regex::new(&options.numbering_pattern).map_err(|e| {
            Error::InvalidConfig(format!(
                "invalid numbering pattern {:?}: {}",
                options.numbering_pattern, e
            ))
        })?;

        Ok(Self {
            h1_delta: options.h1_delta,
            h2_delta: options.h2_delta,
            min_chars: options.min_heading_chars,
            numbering,
        })
    }

    /// Classify one span against the document body size and the page's body
    /// indent. Returns `None` for body text.
    pub fn classify(
        &self,
        span: &TextSpan,
        body_size: f32,
        body_indent: f32,
    ) -> Option<HeadingCandidate> {
        let text = span.trimmed();
        if text.chars().count() < self.min_chars {
            return None;
        }

        let size_level = if span.font_size >= body_size + self.h1_delta {
            Some(HeadingLevel::H1)
        } else if span.font_size >= body_size + self.h2_delta {
            Some(HeadingLevel::H2)
        } else {
            None
        };

        let numbering_level = self.numbering_level(text);

        match (size_level, numbering_level) {
            // Numbering refines a size-based level only when it is deeper:
            // a 16pt "2.1.3 Details" is an H3 by structure, not an H1.
            (Some(size), Some(num)) if num.depth() > size.depth() => {
                Some(self.candidate(span, num, ClassifierRule::Numbering))
            }
            (Some(size), _) => Some(self.candidate(span, size, ClassifierRule::FontSize)),
            (None, Some(num)) => {
                // Numbering alone only claims H1/H2 when the span shows some
                // typographic emphasis; a deeply numbered line ("2.1.3") is
                // unambiguous enough on its own.
                if num == HeadingLevel::H3 || span.is_bold || span.font_size >= body_size {
                    Some(self.candidate(span, num, ClassifierRule::Numbering))
                } else {
                    self.bold_indent(span, body_size, body_indent)
                }
            }
            (None, None) => self.bold_indent(span, body_size, body_indent),
        }
    }

    /// Weak-signal rule: bold at body size, starting left of the page's
    /// body indent.
    fn bold_indent(
        &self,
        span: &TextSpan,
        body_size: f32,
        body_indent: f32,
    ) -> Option<HeadingCandidate> {
        if span.is_bold && span.font_size >= body_size && span.bbox.x0 < body_indent {
            Some(self.candidate(span, HeadingLevel::H3, ClassifierRule::BoldIndent))
        } else {
            None
        }
    }

    /// Level implied by a numbering prefix: depth = dot count + 1, capped
    /// at H3 ("2" -> H1, "2.1" -> H2, "2.1.3" -> H3).
    fn numbering_level(&self, text: &str) -> Option<HeadingLevel> {
        let matched = self.numbering.find(text)?;
        let dots = matched.as_str().matches('.').count();
        Some(HeadingLevel::from_depth(dots + 1))
    }

    fn candidate(
        &self,
        span: &TextSpan,
        level: HeadingLevel,
        source_rule: ClassifierRule,
    ) -> HeadingCandidate {
        HeadingCandidate {
            span: span.clone(),
            level,
            source_rule,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::BoundingBox;

    fn classifier() -> HeadingClassifier {
        HeadingClassifier::new(&OutlineOptions::default()).unwrap()
    }

    fn span(text: &str, size: f32, font: &str, x0: f32) -> TextSpan {
        TextSpan::new(
            0,
            text,
            size,
            BoundingBox::new(x0, 100.0, x0 + 150.0, 100.0 + size),
            font,
        )
    }

    #[test]
    fn test_size_rules() {
        let c = classifier();

        let h1 = c.classify(&span("Introduction", 16.0, "Helvetica", 72.0), 11.0, 100.0);
        let h1 = h1.unwrap();
        assert_eq!(h1.level, HeadingLevel::H1);
        assert_eq!(h1.source_rule, ClassifierRule::FontSize);

        let h2 = c.classify(&span("Methods", 13.0, "Helvetica", 72.0), 11.0, 100.0);
        assert_eq!(h2.unwrap().level, HeadingLevel::H2);

        let body = c.classify(&span("plain paragraph", 11.0, "Helvetica", 110.0), 11.0, 100.0);
        assert!(body.is_none());
    }

    #[test]
    fn test_numbering_with_emphasis() {
        let c = classifier();

        // Bold at body size: the numbering rule claims H2.
        let cand = c
            .classify(
                &span("2.1 Background", 11.0, "Helvetica-Bold", 72.0),
                11.0,
                100.0,
            )
            .unwrap();
        assert_eq!(cand.level, HeadingLevel::H2);
        assert_eq!(cand.source_rule, ClassifierRule::Numbering);

        // No dots, emphasis present: H1.
        let cand = c
            .classify(&span("3 Results", 11.0, "Helvetica-Bold", 72.0), 11.0, 100.0)
            .unwrap();
        assert_eq!(cand.level, HeadingLevel::H1);
    }

    #[test]
    fn test_numbering_without_emphasis_is_rejected() {
        let c = classifier();
        // Smaller than body, regular weight: "2.1" alone is not enough.
        let cand = c.classify(&span("2.1 Background", 10.0, "Helvetica", 72.0), 11.0, 100.0);
        assert!(cand.is_none());
    }

    #[test]
    fn test_deep_numbering_stands_alone() {
        let c = classifier();
        let cand = c
            .classify(&span("2.1.3 Edge cases", 10.0, "Helvetica", 72.0), 11.0, 100.0)
            .unwrap();
        assert_eq!(cand.level, HeadingLevel::H3);
        assert_eq!(cand.source_rule, ClassifierRule::Numbering);
    }

    #[test]
    fn test_numbering_overrides_size_when_deeper() {
        let c = classifier();
        // 16pt would be H1 by size, but "2.1.3" pins it to H3.
        let cand = c
            .classify(&span("2.1.3 Details", 16.0, "Helvetica", 72.0), 11.0, 100.0)
            .unwrap();
        assert_eq!(cand.level, HeadingLevel::H3);
        assert_eq!(cand.source_rule, ClassifierRule::Numbering);

        // "2.1" is deeper than the H1 the size suggests, so it wins too.
        let cand = c
            .classify(&span("2.1 Background", 16.0, "Helvetica", 72.0), 11.0, 100.0)
            .unwrap();
        assert_eq!(cand.level, HeadingLevel::H2);
        assert_eq!(cand.source_rule, ClassifierRule::Numbering);

        // A depth-1 prefix on an H2-sized span is shallower, not deeper;
        // the size-derived level stands.
        let cand = c
            .classify(&span("2 Overview", 13.0, "Helvetica", 72.0), 11.0, 100.0)
            .unwrap();
        assert_eq!(cand.level, HeadingLevel::H2);
        assert_eq!(cand.source_rule, ClassifierRule::FontSize);
    }

    #[test]
    fn test_bold_indent_rule() {
        let c = classifier();

        let cand = c
            .classify(&span("Summary", 11.0, "Helvetica-Bold", 72.0), 11.0, 100.0)
            .unwrap();
        assert_eq!(cand.level, HeadingLevel::H3);
        assert_eq!(cand.source_rule, ClassifierRule::BoldIndent);

        // Same span deep inside the body column: not a heading.
        let cand = c.classify(&span("Summary", 11.0, "Helvetica-Bold", 150.0), 11.0, 100.0);
        assert!(cand.is_none());

        // Regular weight never triggers the weak rule.
        let cand = c.classify(&span("Summary", 11.0, "Helvetica", 72.0), 11.0, 100.0);
        assert!(cand.is_none());
    }

    #[test]
    fn test_short_text_is_never_a_heading() {
        let c = classifier();
        assert!(c.classify(&span("IV.", 20.0, "Helvetica-Bold", 72.0), 11.0, 100.0).is_none());
        assert!(c.classify(&span("7", 24.0, "Helvetica", 72.0), 11.0, 100.0).is_none());
    }

    #[test]
    fn test_invalid_pattern_is_rejected() {
        let options = OutlineOptions::new().with_numbering_pattern("([unclosed");
        assert!(matches!(
            HeadingClassifier::new(&options),
            Err(Error::InvalidConfig(_))
        ));
    }
}
