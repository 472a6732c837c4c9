//! Multipart parsing and upload validation

use crate::services::batch::UploadedFile;
use axum::extract::multipart::MultipartError;
use axum::extract::Multipart;
use axum::http::StatusCode;
use blindcv_core::constants::ALLOWED_EXTENSION;
use blindcv_core::AppError;

/// Form field carrying the résumés; `files` is accepted as an alias.
pub const FILES_FIELD: &str = "files[]";
const FILES_FIELD_ALIAS: &str = "files";

/// Attachments of the submission, in form order.
///
/// `None` if the form has no file field at all. Fields with an empty file
/// name (an empty file input) are kept so that every attachment consumes
/// its position.
pub async fn extract_submission(
    mut multipart: Multipart,
) -> Result<Option<Vec<UploadedFile>>, AppError> {
    let mut files: Option<Vec<UploadedFile>> = None;

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let field_name = field.name().map(|s| s.to_string()).unwrap_or_default();
        if field_name != FILES_FIELD && field_name != FILES_FIELD_ALIAS {
            continue;
        }

        let file_name = field.file_name().map(|s: &str| s.to_string()).unwrap_or_default();
        let data = field.bytes().await.map_err(multipart_error)?;

        files.get_or_insert_with(Vec::new).push(UploadedFile { file_name, data });
    }

    Ok(files)
}

fn multipart_error(e: MultipartError) -> AppError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(e.body_text())
    } else {
        AppError::InvalidInput(format!("Falha ao ler o formulário: {}", e.body_text()))
    }
}

/// Whether `file_name` has the accepted extension (case-insensitive).
pub fn is_allowed_file(file_name: &str) -> bool {
    match file_name.rsplit_once('.') {
        Some((_, extension)) => extension.eq_ignore_ascii_case(ALLOWED_EXTENSION),
        None => false,
    }
}

/// Base name of an uploaded file name, for display and logs.
pub fn display_name(file_name: &str) -> &str {
    file_name
        .rsplit(['/', '\\'])
        .next()
        .filter(|s| !s.is_empty())
        .unwrap_or(file_name)
}
