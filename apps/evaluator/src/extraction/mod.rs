//! Text Extractor — turns an uploaded résumé (PDF or DOCX) into plain text.
//!
//! The underlying parsers are synchronous and may panic on hostile input, so
//! every extraction runs on the blocking pool. A panic surfaces as
//! `ExtractError::TaskJoin` and only fails the file that caused it.

mod docx;
mod pdf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur while extracting text from a document.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("PDF extraction error: {0}")]
    Pdf(String),

    #[error("DOCX extraction error: {0}")]
    Docx(String),

    #[error("Extraction task failed: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),
}

/// Supported upload kinds, detected from the file-name suffix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentKind {
    Pdf,
    Docx,
}

impl DocumentKind {
    /// Detects the kind from the file-name extension, case-insensitively.
    /// Returns `None` for anything other than `.pdf` / `.docx`.
    pub fn from_file_name(file_name: &str) -> Option<Self> {
        let lower = file_name.to_lowercase();
        if lower.ends_with(".pdf") {
            Some(DocumentKind::Pdf)
        } else if lower.ends_with(".docx") {
            Some(DocumentKind::Docx)
        } else {
            None
        }
    }
}

/// Extracts the full plain-text content of a document.
pub async fn extract_text(content: bytes::Bytes, kind: DocumentKind) -> Result<String, ExtractError> {
    tokio::task::spawn_blocking(move || match kind {
        DocumentKind::Pdf => pdf::extract_text(&content),
        DocumentKind::Docx => docx::extract_text(&content),
    })
    .await?
}
