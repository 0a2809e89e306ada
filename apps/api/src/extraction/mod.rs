//! Document Extractor — turns an uploaded resume PDF into plain text.
//!
//! Page texts are concatenated in page order. Any failure (bad magic, parser
//! error, parser panic, empty document) is total: no partial text is returned.

use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use bytes::Bytes;
use thiserror::Error;

/// Magic prefix every PDF file starts with.
const PDF_MAGIC: &[u8] = b"%PDF-";

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("uploaded file is not a PDF")]
    NotPdf,

    #[error("failed to parse PDF: {0}")]
    Parse(String),

    #[error("PDF contains no extractable text")]
    NoText,
}

/// Plain text extracted from a resume, pages concatenated in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResumeText(String);

impl ResumeText {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Source of per-page text for a PDF byte stream.
///
/// Implementations return every page in document order or fail as a whole.
pub trait PageTextSource: Send + Sync {
    fn page_texts(&self, bytes: &[u8]) -> Result<Vec<String>, ExtractionError>;
}

/// `PageTextSource` backed by the `pdf-extract` crate.
pub struct PdfExtractSource;

impl PageTextSource for PdfExtractSource {
    fn page_texts(&self, bytes: &[u8]) -> Result<Vec<String>, ExtractionError> {
        // pdf-extract panics on some malformed inputs instead of returning Err.
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
            pdf_extract::extract_text_from_mem_by_pages(bytes)
        }));

        match outcome {
            Ok(Ok(pages)) => Ok(pages),
            Ok(Err(e)) => Err(ExtractionError::Parse(e.to_string())),
            Err(_) => Err(ExtractionError::Parse(
                "PDF parser aborted on malformed input".to_string(),
            )),
        }
    }
}

/// Returns true if the bytes carry the PDF magic header.
pub fn is_pdf(head: &[u8]) -> bool {
    head.starts_with(PDF_MAGIC)
}

/// Extracts resume text from PDF bytes using `source`.
pub fn extract_resume_text(
    source: &dyn PageTextSource,
    bytes: &[u8],
) -> Result<ResumeText, ExtractionError> {
    if !is_pdf(bytes) {
        return Err(ExtractionError::NotPdf);
    }

    let text = source.page_texts(bytes)?.concat();

    if text.trim().is_empty() {
        return Err(ExtractionError::NoText);
    }

    Ok(ResumeText(text))
}

/// Runs `extract_resume_text` on the blocking pool.
///
/// PDF parsing is CPU-bound; it must not hold an async worker thread.
pub async fn extract_resume_text_blocking(
    source: Arc<dyn PageTextSource>,
    bytes: Bytes,
) -> Result<ResumeText, ExtractionError> {
    tokio::task::spawn_blocking(move || extract_resume_text(source.as_ref(), &bytes))
        .await
        .map_err(|e| ExtractionError::Parse(format!("PDF extraction task failed: {e}")))?
}
