//! Text extraction from various file formats

use crate::error::{Result, ResumeMatcherError};
use quick_xml::events::Event;
use quick_xml::reader::Reader;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

const DOCX_BODY_ENTRY: &str = "word/document.xml";
const DOCX_HEADER_PREFIX: &str = "word/header";
const DOCX_FOOTER_PREFIX: &str = "word/footer";

pub trait TextExtractor {
    fn extract(&self, bytes: &[u8]) -> Result<String>;
}

pub struct PdfExtractor;

impl TextExtractor for PdfExtractor {
    fn extract(&self, bytes: &[u8]) -> Result<String> {
        // pdf-extract panics on some malformed inputs instead of returning an error
        let outcome = catch_unwind_quietly(|| pdf_extract::extract_text_from_mem(bytes));

        match outcome {
            Ok(Ok(text)) => Ok(text),
            Ok(Err(e)) => Err(ResumeMatcherError::Extraction(format!(
                "Failed to extract text from PDF: {}",
                e
            ))),
            Err(_) => Err(ResumeMatcherError::Extraction(
                "Failed to extract text from PDF: malformed document".to_string(),
            )),
        }
    }
}

/// Run `f`, turning a panic into `Err` without the default hook printing
/// to stderr. The panic message is logged at debug level instead.
///
/// The panic hook is process-wide, so a panic on another thread while `f`
/// runs is also routed to the log.
fn catch_unwind_quietly<F, T>(f: F) -> std::thread::Result<T>
where
    F: FnOnce() -> T + std::panic::UnwindSafe,
{
    let previous = std::panic::take_hook();
    std::panic::set_hook(Box::new(|info| {
        log::debug!("Recovered from panic during extraction: {}", info);
    }));
    let outcome = std::panic::catch_unwind(f);
    std::panic::set_hook(previous);
    outcome
}

/// DOCX extraction works from a filesystem path, so the upload is staged
/// in a named temporary file that is removed when it goes out of scope.
#[derive(Debug, Clone, Default)]
pub struct DocxExtractor {
    temp_dir: Option<PathBuf>,
}

impl DocxExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stage temporary files in `dir` instead of the system temp directory.
    pub fn with_temp_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            temp_dir: Some(dir.into()),
        }
    }

    /// Read the text of a DOCX file on disk: headers, then the body, then
    /// footers, one part per line block.
    pub fn extract_path(&self, path: &Path) -> Result<String> {
        let file = File::open(path)?;
        let mut archive = zip::ZipArchive::new(file).map_err(|e| {
            ResumeMatcherError::Extraction(format!("Failed to open DOCX '{}': {}", path.display(), e))
        })?;

        let names: Vec<String> = archive.file_names().map(str::to_string).collect();
        if !names.iter().any(|name| name == DOCX_BODY_ENTRY) {
            return Err(ResumeMatcherError::Extraction(format!(
                "DOCX '{}' has no {}",
                path.display(),
                DOCX_BODY_ENTRY
            )));
        }

        let mut parts = Self::numbered_parts(&names, DOCX_HEADER_PREFIX);
        parts.push(DOCX_BODY_ENTRY.to_string());
        parts.extend(Self::numbered_parts(&names, DOCX_FOOTER_PREFIX));

        let mut sections = Vec::with_capacity(parts.len());
        for part in &parts {
            let mut xml = String::new();
            archive
                .by_name(part)
                .map_err(|e| {
                    ResumeMatcherError::Extraction(format!("Failed to open DOCX part {}: {}", part, e))
                })?
                .read_to_string(&mut xml)
                .map_err(|e| {
                    ResumeMatcherError::Extraction(format!("Failed to read DOCX part {}: {}", part, e))
                })?;

            let text = Self::document_xml_to_text(&xml)?;
            if !text.is_empty() {
                sections.push(text);
            }
        }

        Ok(sections.join("\n"))
    }

    /// Entries named `{prefix}{N}.xml` (or `{prefix}.xml`), ordered by `N`.
    fn numbered_parts(names: &[String], prefix: &str) -> Vec<String> {
        let mut parts: Vec<(u32, String)> = names
            .iter()
            .filter_map(|name| {
                let index = name.strip_prefix(prefix)?.strip_suffix(".xml")?;
                if index.is_empty() {
                    Some((0, name.clone()))
                } else if index.chars().all(|c| c.is_ascii_digit()) {
                    index.parse().ok().map(|n| (n, name.clone()))
                } else {
                    None
                }
            })
            .collect();
        parts.sort();
        parts.into_iter().map(|(_, name)| name).collect()
    }

    fn document_xml_to_text(xml: &str) -> Result<String> {
        let mut reader = Reader::from_str(xml);
        let mut text = String::new();
        let mut in_run_text = false;

        loop {
            match reader.read_event() {
                Ok(Event::Start(e)) if e.name().as_ref() == b"w:t" => in_run_text = true,
                Ok(Event::End(e)) => match e.name().as_ref() {
                    b"w:t" => in_run_text = false,
                    b"w:p" => text.push('\n'),
                    _ => {}
                },
                Ok(Event::Empty(e)) => match e.name().as_ref() {
                    b"w:tab" => text.push('\t'),
                    b"w:br" | b"w:cr" => text.push('\n'),
                    _ => {}
                },
                Ok(Event::Text(t)) if in_run_text => {
                    let unescaped = t.unescape().map_err(|e| {
                        ResumeMatcherError::Extraction(format!("Malformed DOCX text run: {}", e))
                    })?;
                    text.push_str(&unescaped);
                }
                Ok(Event::Eof) => break,
                Err(e) => {
                    return Err(ResumeMatcherError::Extraction(format!(
                        "Malformed DOCX XML at byte {}: {}",
                        reader.buffer_position(),
                        e
                    )))
                }
                _ => {}
            }
        }

        Ok(text.trim_end().to_string())
    }
}

impl TextExtractor for DocxExtractor {
    fn extract(&self, bytes: &[u8]) -> Result<String> {
        let mut builder = tempfile::Builder::new();
        builder.prefix("resume-matcher-").suffix(".docx");

        let staged = match &self.temp_dir {
            Some(dir) => builder.tempfile_in(dir),
            None => builder.tempfile(),
        };
        let mut staged = staged.map_err(|e| {
            ResumeMatcherError::Extraction(format!("Failed to stage DOCX upload: {}", e))
        })?;

        staged
            .write_all(bytes)
            .and_then(|_| staged.flush())
            .map_err(|e| {
                ResumeMatcherError::Extraction(format!("Failed to stage DOCX upload: {}", e))
            })?;

        log::debug!("Staged DOCX upload at {}", staged.path().display());

        // `staged` is deleted on drop, including when extraction fails
        self.extract_path(staged.path())
    }
}

pub struct PlainTextExtractor;

impl TextExtractor for PlainTextExtractor {
    fn extract(&self, bytes: &[u8]) -> Result<String> {
        String::from_utf8(bytes.to_vec()).map_err(|e| {
            ResumeMatcherError::Decode(format!(
                "Text file is not valid UTF-8 (byte {}): {}",
                e.utf8_error().valid_up_to(),
                e
            ))
        })
    }
}

/// Extracted document text. Failed extractions still carry a visible
/// placeholder string so downstream stages never deal with a missing value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractedText {
    pub text: String,
    pub failure: Option<String>,
}

impl ExtractedText {
    pub fn from_result(result: Result<String>) -> Self {
        match result {
            Ok(text) => Self {
                text,
                failure: None,
            },
            Err(e) => {
                let text = match &e {
                    ResumeMatcherError::UnsupportedFormat(_) => {
                        "❌ Unsupported file format".to_string()
                    }
                    other => format!("❌ Error: {}", other),
                };
                Self {
                    text,
                    failure: Some(e.to_string()),
                }
            }
        }
    }

    pub fn is_failure(&self) -> bool {
        self.failure.is_some()
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_decoding() {
        let text = PlainTextExtractor.extract("Python and SQL".as_bytes()).unwrap();
        assert_eq!(text, "Python and SQL");
    }

    #[test]
    fn test_invalid_utf8_is_decode_error() {
        let result = PlainTextExtractor.extract(&[0x66, 0x6f, 0xff, 0xfe]);
        assert!(matches!(result, Err(ResumeMatcherError::Decode(_))));
    }

    #[test]
    fn test_garbage_pdf_is_extraction_error() {
        let result = PdfExtractor.extract(b"definitely not a pdf");
        assert!(matches!(result, Err(ResumeMatcherError::Extraction(_))));
    }

    #[test]
    fn test_document_xml_paragraphs_and_entities() {
        let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
  <w:body>
    <w:p><w:r><w:t>Skills:</w:t></w:r><w:r><w:tab/><w:t xml:space="preserve">Python &amp; SQL</w:t></w:r></w:p>
    <w:p><w:r><w:t>Leadership</w:t></w:r></w:p>
  </w:body>
</w:document>"#;

        let text = DocxExtractor::document_xml_to_text(xml).unwrap();
        assert_eq!(text, "Skills:\tPython & SQL\nLeadership");
    }

    fn build_docx(parts: &[(&str, &str)]) -> Vec<u8> {
        let mut writer = zip::ZipWriter::new(std::io::Cursor::new(Vec::new()));
        for (name, text) in parts {
            let xml = format!(
                r#"<w:hdr xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:p><w:r><w:t>{}</w:t></w:r></w:p></w:hdr>"#,
                text
            );
            writer
                .start_file(*name, zip::write::SimpleFileOptions::default())
                .unwrap();
            writer.write_all(xml.as_bytes()).unwrap();
        }
        writer.finish().unwrap().into_inner()
    }

    #[test]
    fn test_docx_headers_and_footers_surround_body() {
        let bytes = build_docx(&[
            ("word/footer1.xml", "Page footer"),
            ("word/document.xml", "Experience in Java"),
            ("word/header2.xml", "Second header"),
            ("word/header1.xml", "Jane Doe - Python"),
        ]);

        let text = DocxExtractor::new().extract(&bytes).unwrap();
        assert_eq!(
            text,
            "Jane Doe - Python\nSecond header\nExperience in Java\nPage footer"
        );
    }

    #[test]
    fn test_docx_without_body_is_extraction_error() {
        let bytes = build_docx(&[("word/header1.xml", "Only a header")]);
        let result = DocxExtractor::new().extract(&bytes);
        assert!(matches!(result, Err(ResumeMatcherError::Extraction(_))));
    }

    #[test]
    fn test_numbered_parts_ignores_other_entries() {
        let names: Vec<String> = [
            "word/header10.xml",
            "word/header2.xml",
            "word/header.xml",
            "word/headers.xml",
            "word/_rels/header1.xml.rels",
            "word/document.xml",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect();

        assert_eq!(
            DocxExtractor::numbered_parts(&names, DOCX_HEADER_PREFIX),
            vec!["word/header.xml", "word/header2.xml", "word/header10.xml"]
        );
    }

    #[test]
    fn test_panic_is_caught_and_hook_restored() {
        let outcome = catch_unwind_quietly(|| -> u32 { panic!("broken xref table") });
        assert!(outcome.is_err());

        let outcome = catch_unwind_quietly(|| 7);
        assert_eq!(outcome.unwrap(), 7);
    }

    #[test]
    fn test_corrupt_docx_cleans_up_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        let extractor = DocxExtractor::with_temp_dir(dir.path());

        let result = extractor.extract(b"PK\x03\x04 truncated archive");
        assert!(matches!(result, Err(ResumeMatcherError::Extraction(_))));

        let leftovers = std::fs::read_dir(dir.path()).unwrap().count();
        assert_eq!(leftovers, 0);
    }

    #[test]
    fn test_fallback_text_for_failures() {
        let unsupported = ExtractedText::from_result(Err(ResumeMatcherError::UnsupportedFormat(
            "notes.xyz".to_string(),
        )));
        assert_eq!(unsupported.text, "❌ Unsupported file format");
        assert!(unsupported.is_failure());

        let broken = ExtractedText::from_result(Err(ResumeMatcherError::Extraction(
            "bad xref".to_string(),
        )));
        assert!(broken.text.starts_with("❌ Error: "));
        assert!(broken.text.contains("bad xref"));

        let ok = ExtractedText::from_result(Ok("hello".to_string()));
        assert!(!ok.is_failure());
        assert_eq!(ok.as_str(), "hello");
    }
}
