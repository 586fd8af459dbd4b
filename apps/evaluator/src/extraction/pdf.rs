use super::ExtractError;

/// Concatenates the text layer of every page in document order.
/// Image-only pages contribute nothing; there is no OCR fallback.
pub(super) fn extract_text(content: &[u8]) -> Result<String, ExtractError> {
    pdf_extract::extract_text_from_mem(content).map_err(|e| ExtractError::Pdf(e.to_string()))
}
