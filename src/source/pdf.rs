//! lopdf-backed span source for real PDF documents.

use crate::detect::{detect_format_from_bytes, detect_format_from_path, PdfFormat};
use crate::error::{Error, Result};
use crate::model::TextSpan;
use crate::source::content::parse_page_content;
use crate::source::{DocumentMetadata, SpanSource};
use lopdf::{Dictionary, Document, Object, ObjectId};
use std::path::Path;

/// Default US Letter page height when a page carries no MediaBox.
const DEFAULT_PAGE_HEIGHT: f32 = 792.0;

/// A [`SpanSource`] over a parsed PDF document.
///
/// Opening validates the header, parses the document with lopdf, rejects
/// encrypted files, and caches page ids and metadata; page content is only
/// interpreted when [`SpanSource::spans`] is called.
pub struct PdfSpanSource {
    doc: Document,
    page_ids: Vec<ObjectId>,
    metadata: DocumentMetadata,
    format: PdfFormat,
    name: Option<String>,
}

impl PdfSpanSource {
    /// Open a PDF file from disk.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let format = detect_format_from_path(path)?;
        let doc = Document::load(path)?;
        Self::from_document(doc, format, Some(path.display().to_string()))
    }

    /// Open a PDF from an in-memory buffer.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let format = detect_format_from_bytes(data)?;
        let doc = Document::load_mem(data)?;
        Self::from_document(doc, format, None)
    }

    fn from_document(doc: Document, format: PdfFormat, name: Option<String>) -> Result<Self> {
        if doc.is_encrypted() {
            return Err(Error::Encrypted);
        }

        // get_pages keys are 1-based page numbers in document order.
        let page_ids: Vec<ObjectId> = doc.get_pages().into_values().collect();
        let metadata = extract_metadata(&doc);

        log::debug!(
            "opened {} ({}, {} pages)",
            name.as_deref().unwrap_or("<memory>"),
            format,
            page_ids.len()
        );

        Ok(Self {
            doc,
            page_ids,
            metadata,
            format,
            name,
        })
    }

    /// Header format information.
    pub fn format(&self) -> &PdfFormat {
        &self.format
    }

    /// MediaBox height of a page, defaulting to US Letter.
    fn page_height(&self, page_id: ObjectId) -> f32 {
        self.doc
            .get_dictionary(page_id)
            .ok()
            .and_then(|dict| dict.get(b"MediaBox").ok())
            .and_then(media_box_height)
            .unwrap_or(DEFAULT_PAGE_HEIGHT)
    }

    /// Concatenated, decompressed content stream bytes for a page.
    ///
    /// A page without a Contents entry is a valid empty page.
    fn page_content(&self, page_id: ObjectId) -> Result<Vec<u8>> {
        let page_dict = self
            .doc
            .get_dictionary(page_id)
            .map_err(|e| Error::Unreadable(e.to_string()))?;

        let contents = match page_dict.get(b"Contents") {
            Ok(obj) => obj,
            Err(_) => return Ok(Vec::new()),
        };

        match contents {
            Object::Reference(r) => self.stream_content(*r),
            Object::Array(refs) => {
                let mut combined = Vec::new();
                for obj in refs {
                    if let Object::Reference(r) = obj {
                        combined.extend_from_slice(&self.stream_content(*r)?);
                        combined.push(b' ');
                    }
                }
                Ok(combined)
            }
            _ => Err(Error::Unreadable("invalid Contents entry".to_string())),
        }
    }

    fn stream_content(&self, id: ObjectId) -> Result<Vec<u8>> {
        match self.doc.get_object(id) {
            // decompressed_content fails on streams with no Filter entry;
            // those carry their bytes raw, so use the stored content as-is.
            Ok(Object::Stream(s)) => Ok(s
                .decompressed_content()
                .unwrap_or_else(|_| s.content.clone())),
            _ => Err(Error::Unreadable("content stream missing".to_string())),
        }
    }
}

impl SpanSource for PdfSpanSource {
    fn page_count(&self) -> usize {
        self.page_ids.len()
    }

    fn spans(&self, page_index: usize) -> Result<Vec<TextSpan>> {
        let page_id = *self
            .page_ids
            .get(page_index)
            .ok_or(Error::PageOutOfRange(page_index, self.page_ids.len()))?;

        // A page whose resources are damaged can still carry decodable text;
        // missing fonts only downgrade string decoding to the raw fallback.
        let fonts = self.doc.get_page_fonts(page_id).unwrap_or_default();
        let content = self.page_content(page_id)?;
        let height = self.page_height(page_id);

        parse_page_content(&self.doc, &fonts, &content, page_index, height)
    }

    fn metadata(&self) -> DocumentMetadata {
        self.metadata.clone()
    }

    fn source_name(&self) -> Option<&str> {
        self.name.as_deref()
    }
}

/// Height from a MediaBox array [x0 y0 x1 y1].
fn media_box_height(obj: &Object) -> Option<f32> {
    let rect = obj.as_array().ok()?;
    if rect.len() < 4 {
        return None;
    }
    let y0 = number(&rect[1])?;
    let y1 = number(&rect[3])?;
    Some((y1 - y0).abs())
}

fn number(obj: &Object) -> Option<f32> {
    match obj {
        Object::Integer(i) => Some(*i as f32),
        Object::Real(r) => Some(*r),
        _ => None,
    }
}

/// Title/Author from the trailer Info dictionary.
fn extract_metadata(doc: &Document) -> DocumentMetadata {
    let info = doc
        .trailer
        .get(b"Info")
        .ok()
        .and_then(|obj| match obj {
            Object::Reference(r) => doc.get_dictionary(*r).ok(),
            Object::Dictionary(dict) => Some(dict),
            _ => None,
        });

    match info {
        Some(dict) => DocumentMetadata {
            title: info_string(dict, b"Title"),
            author: info_string(dict, b"Author"),
        },
        None => DocumentMetadata::default(),
    }
}

/// Decode an Info-dictionary string, which may be UTF-16BE with a BOM.
fn info_string(dict: &Dictionary, key: &[u8]) -> Option<String> {
    match dict.get(key) {
        Ok(Object::String(bytes, _)) => {
            let decoded = super::content::decode_string_fallback(bytes);
            let trimmed = decoded.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            }
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::content::{Content, Operation};
    use lopdf::{dictionary, Stream};

    /// Build a well-formed single-page PDF with a 24pt title line and a
    /// 12pt body line.
    fn build_fixture(title_meta: Option<&str>) -> Vec<u8> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();

        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
        });
        let resources = dictionary! {
            "Font" => dictionary! { "F1" => font_id },
        };

        let content = Content {
            operations: vec![
                Operation::new("BT", vec![]),
                Operation::new(
                    "Tf",
                    vec![Object::Name(b"F1".to_vec()), Object::Integer(24)],
                ),
                Operation::new(
                    "Td",
                    vec![Object::Integer(72), Object::Integer(720)],
                ),
                Operation::new("Tj", vec![Object::string_literal("Fixture Title")]),
                Operation::new(
                    "Tf",
                    vec![Object::Name(b"F1".to_vec()), Object::Integer(12)],
                ),
                Operation::new(
                    "Td",
                    vec![Object::Integer(0), Object::Integer(-40)],
                ),
                Operation::new("Tj", vec![Object::string_literal("Body text line.")]),
                Operation::new("ET", vec![]),
            ],
        };
        let content_id = doc.add_object(Stream::new(
            dictionary! {},
            content.encode().unwrap(),
        ));

        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
            "Resources" => resources,
            "Contents" => content_id,
        });

        let pages = dictionary! {
            "Type" => "Pages",
            "Kids" => vec![Object::Reference(page_id)],
            "Count" => 1,
        };
        doc.objects.insert(pages_id, Object::Dictionary(pages));

        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        if let Some(title) = title_meta {
            let info_id = doc.add_object(dictionary! {
                "Title" => Object::string_literal(title),
            });
            doc.trailer.set("Info", info_id);
        }

        let mut bytes = Vec::new();
        doc.save_to(&mut bytes).unwrap();
        bytes
    }

    #[test]
    fn test_open_fixture_from_bytes() {
        let bytes = build_fixture(None);
        let source = PdfSpanSource::from_bytes(&bytes).unwrap();

        assert_eq!(source.page_count(), 1);
        assert_eq!(source.format().version, "1.5");
        assert!(source.source_name().is_none());

        let spans = source.spans(0).unwrap();
        assert_eq!(spans.len(), 2);
        assert_eq!(spans[0].text, "Fixture Title");
        assert!((spans[0].font_size - 24.0).abs() < 0.01);
        assert_eq!(spans[1].text, "Body text line.");
        assert!((spans[1].font_size - 12.0).abs() < 0.01);
        // The title line sits above the body line in top-down coordinates.
        assert!(spans[0].bbox.y0 < spans[1].bbox.y0);
    }

    #[test]
    fn test_reads_content_streams_without_filter_entry() {
        // Fixture streams are written raw, with no Filter entry; their
        // bytes must be used as-is instead of failing decompression.
        let bytes = build_fixture(None);
        let source = PdfSpanSource::from_bytes(&bytes).unwrap();
        let raw_spans = source.spans(0).unwrap();
        assert_eq!(raw_spans.len(), 2);
        assert_eq!(raw_spans[0].text, "Fixture Title");

        // The same document flate-compressed decodes to identical spans.
        let mut doc = Document::load_mem(&bytes).unwrap();
        doc.compress();
        let mut compressed = Vec::new();
        doc.save_to(&mut compressed).unwrap();
        let source = PdfSpanSource::from_bytes(&compressed).unwrap();
        assert_eq!(source.spans(0).unwrap(), raw_spans);
    }

    #[test]
    fn test_metadata_title_from_info_dict() {
        let bytes = build_fixture(Some("Metadata Title"));
        let source = PdfSpanSource::from_bytes(&bytes).unwrap();
        assert_eq!(source.metadata().title.as_deref(), Some("Metadata Title"));
        assert!(source.metadata().author.is_none());
    }

    #[test]
    fn test_rejects_non_pdf_bytes() {
        assert!(matches!(
            PdfSpanSource::from_bytes(b"this is not a pdf"),
            Err(Error::UnknownFormat)
        ));
    }

    #[test]
    fn test_page_out_of_range() {
        let bytes = build_fixture(None);
        let source = PdfSpanSource::from_bytes(&bytes).unwrap();
        assert!(matches!(
            source.spans(5),
            Err(Error::PageOutOfRange(5, 1))
        ));
    }
}
