//! PDF text extraction for the retrieval corpus.

use mixmentor_core::{AppError, AppResult};
use std::path::Path;

/// Extract plain text from a PDF file.
///
/// Fails if the file cannot be read or yields no extractable text (e.g.,
/// image-only scans).
pub fn extract_text(path: &Path) -> AppResult<String> {
    let bytes = std::fs::read(path).map_err(|e| {
        AppError::Io(std::io::Error::new(
            e.kind(),
            format!("Failed to read PDF file {:?}: {}", path, e),
        ))
    })?;

    let text = pdf_extract::extract_text_from_mem(&bytes).map_err(|e| {
        AppError::Knowledge(format!("Failed to extract text from PDF {:?}: {}", path, e))
    })?;

    if text.trim().is_empty() {
        return Err(AppError::Knowledge(format!(
            "PDF file {:?} contains no extractable text (may be image-based)",
            path
        )));
    }

    tracing::info!(path = %path.display(), chars = text.len(), "Extracted PDF text");

    Ok(text)
}
