//! Test fixtures: real PDFs and archive inspection.

use blindcv_processing::{extract_text, render_text};
use std::io::Cursor;

/// A well-formed PDF whose extractable text is `text`.
pub fn pdf_with_text(text: &str) -> Vec<u8> {
    let dir = tempfile::tempdir().expect("Failed to create temp directory");
    let path = dir.path().join("fixture.pdf");
    render_text(text, &path).expect("Failed to render fixture PDF");
    std::fs::read(&path).expect("Failed to read fixture PDF")
}

/// Extracted text of the PDF at `path`, with whitespace collapsed.
pub fn pdf_text(path: &std::path::Path) -> String {
    normalize(&extract_text(path).expect("Failed to extract text"))
}

pub fn normalize(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Entry names of a ZIP archive, in archive order.
pub fn archive_entries(bytes: &[u8]) -> Vec<String> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).expect("Invalid ZIP archive");
    (0..archive.len())
        .map(|i| {
            archive
                .by_index(i)
                .expect("Failed to read ZIP entry")
                .name()
                .to_string()
        })
        .collect()
}
