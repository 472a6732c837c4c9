//! Upload page and submission handler

use crate::error::HttpAppError;
use crate::services::batch::BatchProcessor;
use crate::state::AppState;
use crate::utils::flash::clear_cookie;
use crate::utils::upload::extract_submission;
use crate::view;
use axum::{
    extract::{Multipart, State},
    http::{header::SET_COOKIE, HeaderMap},
    response::{Html, IntoResponse, Redirect, Response},
};
use blindcv_core::Notice;
use std::sync::Arc;

/// `GET /`: the upload form, with any pending flash messages.
pub async fn index(State(state): State<Arc<AppState>>, headers: HeaderMap) -> Response {
    match state.flash.read(&headers) {
        Some(notices) => (
            [(SET_COOKIE, clear_cookie())],
            Html(view::upload_page(&notices, false)),
        )
            .into_response(),
        None => Html(view::upload_page(&[], false)).into_response(),
    }
}

/// `POST /`: reset the workspace, run the batch and render its report.
pub async fn submit(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<Response, HttpAppError> {
    let _guard = state.workspace_lock.lock().await;

    let reset = state.workspace.reset().await;
    if !reset.is_clean() {
        tracing::warn!(
            failures = reset.failures.len(),
            "Workspace reset left entries behind"
        );
    }

    let files = match extract_submission(multipart).await? {
        None => return Ok(redirect_with(&state, "Nenhum arquivo selecionado.")),
        Some(files) if files.iter().all(|f| f.file_name.is_empty()) => {
            return Ok(redirect_with(
                &state,
                "Nenhum arquivo selecionado para processamento.",
            ))
        }
        Some(files) => files,
    };

    tracing::info!(files = files.len(), "Submission received");
    let report = BatchProcessor::from_state(&state).process(files).await;

    Ok(Html(view::upload_page(&report.notices, report.download_enabled)).into_response())
}

/// Redirect to the upload page with an error flash message.
pub(crate) fn redirect_with(state: &AppState, message: impl Into<String>) -> Response {
    let cookie = state.flash.set_cookie(&[Notice::error(message)]);
    ([(SET_COOKIE, cookie)], Redirect::to("/")).into_response()
}
