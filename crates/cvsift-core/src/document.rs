use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    Pdf,
    Docx,
    Unsupported,
}

impl DocumentKind {
    #[must_use]
    pub fn from_extension(ext: &str) -> Self {
        match ext.to_lowercase().as_str() {
            "pdf" => Self::Pdf,
            "docx" => Self::Docx,
            _ => Self::Unsupported,
        }
    }

    #[must_use]
    pub fn from_filename(name: &str) -> Self {
        Path::new(name)
            .extension()
            .and_then(|e| e.to_str())
            .map_or(Self::Unsupported, Self::from_extension)
    }

    #[must_use]
    pub fn from_mime(mime: &str) -> Self {
        match mime {
            "application/pdf" => Self::Pdf,
            "application/vnd.openxmlformats-officedocument.wordprocessingml.document" => {
                Self::Docx
            }
            _ => Self::Unsupported,
        }
    }

    #[must_use]
    pub const fn is_supported(self) -> bool {
        !matches!(self, Self::Unsupported)
    }
}

/// One uploaded resume, alive only for the duration of a single extraction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawDocument {
    pub filename: String,
    pub bytes: Vec<u8>,
    pub kind: DocumentKind,
}

impl RawDocument {
    #[must_use]
    pub fn new(filename: impl Into<String>, bytes: Vec<u8>) -> Self {
        let filename = filename.into();
        let kind = DocumentKind::from_filename(&filename);
        Self {
            filename,
            bytes,
            kind,
        }
    }

    #[must_use]
    pub fn with_kind(mut self, kind: DocumentKind) -> Self {
        self.kind = kind;
        self
    }

    pub async fn read(path: &Path) -> std::io::Result<Self> {
        let filename = path.file_name().map_or_else(
            || path.to_string_lossy().into_owned(),
            |n| n.to_string_lossy().into_owned(),
        );
        let bytes = tokio::fs::read(path).await?;
        Ok(Self::new(filename, bytes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_from_extension() {
        assert_eq!(DocumentKind::from_extension("pdf"), DocumentKind::Pdf);
        assert_eq!(DocumentKind::from_extension("PDF"), DocumentKind::Pdf);
        assert_eq!(DocumentKind::from_extension("Docx"), DocumentKind::Docx);
        assert_eq!(DocumentKind::from_extension("txt"), DocumentKind::Unsupported);
    }

    #[test]
    fn test_kind_from_filename() {
        assert_eq!(DocumentKind::from_filename("cv.pdf"), DocumentKind::Pdf);
        assert_eq!(
            DocumentKind::from_filename("Jane_Doe.DOCX"),
            DocumentKind::Docx
        );
        assert_eq!(
            DocumentKind::from_filename("notes.txt"),
            DocumentKind::Unsupported
        );
        assert_eq!(
            DocumentKind::from_filename("no_extension"),
            DocumentKind::Unsupported
        );
    }

    #[test]
    fn test_kind_from_mime() {
        assert_eq!(DocumentKind::from_mime("application/pdf"), DocumentKind::Pdf);
        assert_eq!(DocumentKind::from_mime("text/plain"), DocumentKind::Unsupported);
    }

    #[test]
    fn test_raw_document_derives_kind() {
        let doc = RawDocument::new("resume.pdf", vec![1, 2, 3]);
        assert_eq!(doc.kind, DocumentKind::Pdf);
        assert!(doc.kind.is_supported());

        let doc = RawDocument::new("resume.txt", Vec::new());
        assert!(!doc.kind.is_supported());
    }
}
