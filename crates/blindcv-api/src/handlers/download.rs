//! Archive download handler

use crate::handlers::upload::redirect_with;
use crate::state::AppState;
use axum::{
    extract::State,
    http::{
        header::{CONTENT_DISPOSITION, CONTENT_TYPE},
        StatusCode,
    },
    response::{IntoResponse, Response},
};
use blindcv_core::constants::ARCHIVE_FILE_NAME;
use blindcv_core::AppError;
use std::sync::Arc;

/// `GET /download_all`: the whole workspace as a ZIP attachment.
pub async fn download_all(State(state): State<Arc<AppState>>) -> Response {
    let _guard = state.workspace_lock.lock().await;

    match state.exporter.export().await {
        Ok(bytes) => {
            tracing::info!(size = bytes.len(), "Sending workspace archive");
            (
                StatusCode::OK,
                [
                    (CONTENT_TYPE, "application/zip".to_string()),
                    (
                        CONTENT_DISPOSITION,
                        format!("attachment; filename=\"{}\"", ARCHIVE_FILE_NAME),
                    ),
                ],
                bytes,
            )
                .into_response()
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to create or send the ZIP archive");
            let message = AppError::Archive(e.to_string()).client_message();
            redirect_with(&state, message)
        }
    }
}
