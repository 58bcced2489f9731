//! Text Extractor: turns a `.txt` or `.pdf` resume into one text blob.
//!
//! PDF parsing is CPU-bound; async callers should run `extract_text` inside
//! `tokio::task::spawn_blocking`.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::errors::ConvertError;

/// Input formats the extractor understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    PlainText,
    Pdf,
}

impl DocumentFormat {
    /// Maps a file extension (case-insensitive) to a format.
    pub fn from_path(path: &Path) -> Result<Self, ConvertError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();
        match ext.as_str() {
            "txt" => Ok(DocumentFormat::PlainText),
            "pdf" => Ok(DocumentFormat::Pdf),
            _ => Err(ConvertError::UnsupportedFormat(format!(
                "{} (expected .txt or .pdf)",
                path.display()
            ))),
        }
    }
}

/// A source file tagged with its format.
#[derive(Debug, Clone)]
pub struct RawDocument {
    pub path: PathBuf,
    pub format: DocumentFormat,
}

impl RawDocument {
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, ConvertError> {
        let path = path.into();
        let format = DocumentFormat::from_path(&path)?;
        Ok(Self { path, format })
    }
}

/// Reads the document's text. Plain text is returned verbatim; PDF pages are
/// joined in physical order with a line break between them.
pub fn extract_text(doc: &RawDocument) -> Result<String, ConvertError> {
    match doc.format {
        DocumentFormat::PlainText => {
            fs::read_to_string(&doc.path).map_err(|e| io_error(&doc.path, e.to_string()))
        }
        DocumentFormat::Pdf => {
            let bytes = fs::read(&doc.path).map_err(|e| io_error(&doc.path, e.to_string()))?;
            let pages = pdf_extract::extract_text_from_mem_by_pages(&bytes)
                .map_err(|e| io_error(&doc.path, e.to_string()))?;
            debug!("Extracted {} pages from {}", pages.len(), doc.path.display());
            Ok(join_pages(&pages))
        }
    }
}

/// Joins page texts with a newline and trims the result. The PDF layout pass
/// pads pages with blank lines, so each page loses its leading line breaks and
/// trailing whitespace; indentation on a page's first line is kept.
pub fn join_pages<S: AsRef<str>>(pages: &[S]) -> String {
    pages
        .iter()
        .map(|p| p.as_ref().trim_start_matches(|c: char| c == '\n' || c == '\r').trim_end())
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}

fn io_error(path: &Path, message: String) -> ConvertError {
    ConvertError::ExtractionIo {
        path: path.to_path_buf(),
        message,
    }
}
