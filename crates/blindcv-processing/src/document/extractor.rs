use crate::error::DocumentError;
use std::panic::{self, AssertUnwindSafe};
use std::path::Path;

/// Extract the text of every page of the PDF at `path`, pages joined by `\n`.
pub fn extract_text(path: &Path) -> Result<String, DocumentError> {
    // Fail early with a clear error instead of a parser message.
    std::fs::metadata(path).map_err(|source| DocumentError::Open {
        path: path.to_path_buf(),
        source,
    })?;

    // The parser can panic on malformed input; that is an extraction failure too.
    let pages = panic::catch_unwind(AssertUnwindSafe(|| pdf_extract::extract_text_by_pages(path)))
        .map_err(|payload| DocumentError::Extraction {
            path: path.to_path_buf(),
            message: panic_message(payload.as_ref()),
        })?
        .map_err(|e| DocumentError::Extraction {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

    let text = pages.join("\n");
    if text.trim().is_empty() {
        tracing::warn!(path = %path.display(), "PDF text extraction returned empty");
    } else {
        tracing::debug!(
            path = %path.display(),
            pages = pages.len(),
            text_len = text.len(),
            "PDF text extracted"
        );
    }
    Ok(text)
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "PDF parser panicked".to_string()
    }
}
