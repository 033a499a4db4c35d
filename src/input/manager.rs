//! Input manager for loading uploads and routing them to the right extractor

use crate::error::{Result, ResumeMatcherError};
use crate::input::file_detector::DocumentFormat;
use crate::input::text_extractor::{
    DocxExtractor, ExtractedText, PdfExtractor, PlainTextExtractor, TextExtractor,
};
use log::{info, warn};
use std::path::{Path, PathBuf};
use tokio::fs;

/// An uploaded file: name, declared format and raw bytes.
#[derive(Debug, Clone)]
pub struct Document {
    pub name: String,
    pub format: DocumentFormat,
    pub bytes: Vec<u8>,
}

impl Document {
    /// Build a document, taking the format from the filename extension.
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let name = name.into();
        let format = DocumentFormat::from_filename(&name);
        Self {
            name,
            format,
            bytes,
        }
    }

    pub fn with_format(name: impl Into<String>, format: DocumentFormat, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            format,
            bytes,
        }
    }
}

#[derive(Debug, Default)]
pub struct InputManager {
    docx: DocxExtractor,
}

impl InputManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stage DOCX uploads under `dir` rather than the system temp directory.
    pub fn with_temp_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.docx = DocxExtractor::with_temp_dir(dir);
        self
    }

    /// Read a file from disk into a `Document`.
    pub async fn load(&self, path: &Path) -> Result<Document> {
        if !path.exists() {
            return Err(ResumeMatcherError::InvalidInput(format!(
                "File does not exist: {}",
                path.display()
            )));
        }

        let bytes = fs::read(path).await?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| path.to_string_lossy().to_string());

        Ok(Document::new(name, bytes))
    }

    /// Extract plain text, failing on unsupported formats or library errors.
    pub fn extract(&self, document: &Document) -> Result<String> {
        match document.format {
            DocumentFormat::Pdf => {
                info!("Extracting text from PDF: {}", document.name);
                PdfExtractor.extract(&document.bytes)
            }
            DocumentFormat::Docx => {
                info!("Extracting text from DOCX: {}", document.name);
                self.docx.extract(&document.bytes)
            }
            DocumentFormat::Txt => {
                info!("Reading plain text file: {}", document.name);
                PlainTextExtractor.extract(&document.bytes)
            }
            DocumentFormat::Unknown => Err(ResumeMatcherError::UnsupportedFormat(format!(
                "Unsupported file type for: {}",
                document.name
            ))),
        }
    }

    /// Like `extract`, but never fails: errors become visible placeholder text.
    pub fn extract_text(&self, document: &Document) -> ExtractedText {
        let extracted = ExtractedText::from_result(self.extract(document));
        if let Some(failure) = &extracted.failure {
            warn!("Extraction failed for {}: {}", document.name, failure);
        }
        extracted
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_format_is_rejected() {
        let manager = InputManager::new();
        let doc = Document::new("notes.rtf", b"{\\rtf1 hello}".to_vec());

        let result = manager.extract(&doc);
        assert!(matches!(result, Err(ResumeMatcherError::UnsupportedFormat(_))));

        let extracted = manager.extract_text(&doc);
        assert_eq!(extracted.text, "❌ Unsupported file format");
    }

    #[test]
    fn test_txt_dispatch() {
        let manager = InputManager::new();
        let doc = Document::new("job.TXT", b"Looking for Java".to_vec());

        assert_eq!(doc.format, DocumentFormat::Txt);
        assert_eq!(manager.extract(&doc).unwrap(), "Looking for Java");
    }

    #[test]
    fn test_declared_format_wins_over_name() {
        let manager = InputManager::new();
        let doc = Document::with_format("upload", DocumentFormat::Txt, b"sql".to_vec());

        assert_eq!(manager.extract(&doc).unwrap(), "sql");
    }
}
