//! Data model for outline extraction.
//!
//! Input geometry ([`TextSpan`]), output structure ([`DocumentResult`] and
//! its [`OutlineEntry`] sequence), and batch aggregates ([`BatchStats`]).
//! All output types serialize with serde; field order matches the published
//! JSON shapes.

mod outline;
mod span;
mod stats;

pub use outline::{DocumentResult, HeadingLevel, JsonFormat, OutlineEntry};
pub use span::{font_name_is_bold, font_name_is_italic, BoundingBox, TextSpan};
pub use stats::{BatchStats, HeadingCounts, PagesNoHeading};
