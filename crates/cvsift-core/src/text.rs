use std::io::{Cursor, Read};

use async_trait::async_trait;
use quick_xml::events::Event;
use quick_xml::Reader;
use thiserror::Error;
use zip::ZipArchive;

use crate::document::{DocumentKind, RawDocument};

/// Converts document bytes into plain text.
///
/// The contract is fail-soft: any unsupported kind, corrupt file, or internal
/// parse failure yields an empty string, never an error. Callers treat empty
/// text as "nothing could be extracted".
#[async_trait]
pub trait TextExtractor: Send + Sync {
    fn supported_kinds(&self) -> &[DocumentKind];

    fn can_extract(&self, kind: DocumentKind) -> bool {
        self.supported_kinds().contains(&kind)
    }

    async fn extract(&self, document: &RawDocument) -> String;
}

pub struct PdfTextExtractor;

impl PdfTextExtractor {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Default for PdfTextExtractor {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TextExtractor for PdfTextExtractor {
    fn supported_kinds(&self) -> &[DocumentKind] {
        &[DocumentKind::Pdf]
    }

    async fn extract(&self, document: &RawDocument) -> String {
        match pdf_extract::extract_text_from_mem(&document.bytes) {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!("PDF extraction failed for {}: {e}", document.filename);
                String::new()
            }
        }
    }
}

pub struct DocxTextExtractor;

impl DocxTextExtractor {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Default for DocxTextExtractor {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TextExtractor for DocxTextExtractor {
    fn supported_kinds(&self) -> &[DocumentKind] {
        &[DocumentKind::Docx]
    }

    async fn extract(&self, document: &RawDocument) -> String {
        match walk_docx(&document.bytes) {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!("DOCX extraction failed for {}: {e}", document.filename);
                String::new()
            }
        }
    }
}

#[derive(Debug, Error)]
enum DocxError {
    #[error("Archive error: {0}")]
    Archive(#[from] zip::result::ZipError),

    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Pull plain text out of `word/document.xml`.
///
/// Emits non-empty paragraphs first, then table rows rendered as
/// `cell1 | cell2 | ...` with empty cells dropped. Paragraph/table
/// interleaving is not reconstructed.
fn walk_docx(bytes: &[u8]) -> Result<String, DocxError> {
    let mut archive = ZipArchive::new(Cursor::new(bytes))?;
    let mut xml = String::new();
    archive
        .by_name("word/document.xml")?
        .read_to_string(&mut xml)?;

    let mut reader = Reader::from_str(&xml);
    reader.trim_text(false);

    let mut paragraphs: Vec<String> = Vec::new();
    let mut rows: Vec<String> = Vec::new();

    let mut table_depth = 0usize;
    let mut paragraph = String::new();
    let mut cell = String::new();
    let mut row: Vec<String> = Vec::new();

    let mut buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => match e.name().as_ref() {
                b"w:tbl" => table_depth += 1,
                b"w:tc" => cell.clear(),
                b"w:p" if table_depth == 0 => paragraph.clear(),
                _ => {}
            },
            Ok(Event::Empty(e)) => match e.name().as_ref() {
                b"w:br" | b"w:tab" => {
                    if table_depth > 0 {
                        cell.push(' ');
                    } else {
                        paragraph.push(' ');
                    }
                }
                _ => {}
            },
            Ok(Event::Text(t)) => {
                if let Ok(text) = t.unescape() {
                    if table_depth > 0 {
                        cell.push_str(&text);
                    } else {
                        paragraph.push_str(&text);
                    }
                }
            }
            Ok(Event::End(e)) => match e.name().as_ref() {
                b"w:tbl" => table_depth = table_depth.saturating_sub(1),
                b"w:p" => {
                    if table_depth == 0 {
                        let trimmed = paragraph.trim();
                        if !trimmed.is_empty() {
                            paragraphs.push(trimmed.to_string());
                        }
                        paragraph.clear();
                    } else {
                        cell.push(' ');
                    }
                }
                b"w:tc" => {
                    let trimmed = cell.trim();
                    if !trimmed.is_empty() {
                        row.push(trimmed.to_string());
                    }
                    cell.clear();
                }
                b"w:tr" => {
                    if !row.is_empty() {
                        rows.push(row.join(" | "));
                    }
                    row.clear();
                }
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(e) => return Err(e.into()),
            Ok(_) => {}
        }
        buf.clear();
    }

    paragraphs.extend(rows);
    Ok(paragraphs.join("\n"))
}

/// Dispatches on the document's declared kind; unsupported kinds yield
/// empty text per the fail-soft contract.
pub struct CompositeTextExtractor {
    extractors: Vec<Box<dyn TextExtractor>>,
}

impl CompositeTextExtractor {
    #[must_use]
    pub fn new() -> Self {
        Self {
            extractors: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_extractor(mut self, extractor: Box<dyn TextExtractor>) -> Self {
        self.extractors.push(extractor);
        self
    }

    fn find_extractor(&self, kind: DocumentKind) -> Option<&dyn TextExtractor> {
        self.extractors
            .iter()
            .find(|e| e.can_extract(kind))
            .map(AsRef::as_ref)
    }
}

impl Default for CompositeTextExtractor {
    fn default() -> Self {
        Self::new()
            .with_extractor(Box::new(PdfTextExtractor::new()))
            .with_extractor(Box::new(DocxTextExtractor::new()))
    }
}

#[async_trait]
impl TextExtractor for CompositeTextExtractor {
    fn supported_kinds(&self) -> &[DocumentKind] {
        &[DocumentKind::Pdf, DocumentKind::Docx]
    }

    fn can_extract(&self, kind: DocumentKind) -> bool {
        self.find_extractor(kind).is_some()
    }

    async fn extract(&self, document: &RawDocument) -> String {
        match self.find_extractor(document.kind) {
            Some(extractor) => extractor.extract(document).await,
            None => {
                tracing::debug!(
                    "No extractor for {} ({:?})",
                    document.filename,
                    document.kind
                );
                String::new()
            }
        }
    }
}
