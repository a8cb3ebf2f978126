//! Document Text Extractor — turns uploaded bytes into usable resume text.
//!
//! Never fails the caller: every upload ends as either an `ExtractedDocument`
//! or an `UnusableDocument` reason. No OCR is attempted, so scanned or
//! image-only PDFs fall below the text threshold and are skipped.

use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use thiserror::Error;
use tracing::debug;

use crate::evaluation::models::{ExtractedDocument, UploadedDocument};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UnusableDocument {
    #[error("unsupported file type")]
    UnsupportedType,

    #[error("empty upload")]
    Empty,

    #[error("not a valid PDF")]
    InvalidPdf,

    #[error("insufficient extractable text")]
    InsufficientText,
}

/// Converts raw document bytes into plain text. Implementations are
/// synchronous and are run on the blocking pool by `extract_document`.
pub trait TextExtractor: Send + Sync {
    fn extract_text(&self, bytes: &[u8]) -> Result<String, UnusableDocument>;
}

/// `pdf-extract` backed extractor.
pub struct PdfTextExtractor;

impl TextExtractor for PdfTextExtractor {
    fn extract_text(&self, bytes: &[u8]) -> Result<String, UnusableDocument> {
        // pdf-extract can panic on some malformed inputs; treat that like any parse failure.
        let extraction = panic::catch_unwind(AssertUnwindSafe(|| {
            pdf_extract::extract_text_from_mem(bytes)
        }));
        match extraction {
            Ok(Ok(text)) => Ok(text),
            Ok(Err(e)) => {
                debug!("PDF parse failed: {e}");
                Err(UnusableDocument::InvalidPdf)
            }
            Err(_) => {
                debug!("PDF parser panicked");
                Err(UnusableDocument::InvalidPdf)
            }
        }
    }
}

/// Rejects uploads that cannot be a usable PDF before any parsing happens.
pub fn check_upload(upload: &UploadedDocument) -> Result<(), UnusableDocument> {
    if !upload.filename.to_lowercase().ends_with(".pdf") {
        return Err(UnusableDocument::UnsupportedType);
    }
    if upload.bytes.is_empty() {
        return Err(UnusableDocument::Empty);
    }
    Ok(())
}

/// Trims extracted text and applies the minimum-length heuristic.
/// Length is counted in characters, not bytes.
pub fn check_text(text: &str, min_chars: usize) -> Result<String, UnusableDocument> {
    let text = text.trim();
    if text.chars().count() < min_chars {
        return Err(UnusableDocument::InsufficientText);
    }
    Ok(text.to_string())
}

/// Runs the full extraction step for one upload. Parsing happens inside
/// `spawn_blocking` so a large PDF does not stall the async executor.
pub async fn extract_document(
    extractor: Arc<dyn TextExtractor>,
    upload: &UploadedDocument,
    min_chars: usize,
) -> Result<ExtractedDocument, UnusableDocument> {
    check_upload(upload)?;

    let bytes = upload.bytes.clone();
    let raw = tokio::task::spawn_blocking(move || extractor.extract_text(&bytes))
        .await
        .map_err(|_| UnusableDocument::InvalidPdf)??;

    let text = check_text(&raw, min_chars)?;
    Ok(ExtractedDocument {
        filename: upload.filename.clone(),
        text,
    })
}
