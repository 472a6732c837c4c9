//! HTTP error response conversion
//!
//! Handlers return `Result<impl IntoResponse, HttpAppError>`; any `AppError`
//! becomes an HTML error page with the matching status code.

use crate::view;
use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use blindcv_core::error::LogLevel;
use blindcv_core::AppError;

/// Wrapper type for AppError to implement IntoResponse
#[derive(Debug)]
pub struct HttpAppError(pub AppError);

impl From<AppError> for HttpAppError {
    fn from(err: AppError) -> Self {
        HttpAppError(err)
    }
}

impl From<anyhow::Error> for HttpAppError {
    fn from(err: anyhow::Error) -> Self {
        HttpAppError(AppError::InternalWithSource {
            message: err.to_string(),
            source: err,
        })
    }
}

fn log_error(error: &AppError) {
    let error_code = error.error_code();
    let details = error.detailed_message();
    match error.log_level() {
        LogLevel::Debug => {
            tracing::debug!(error = %details, error_code, "Error occurred");
        }
        LogLevel::Warn => {
            tracing::warn!(error = %details, error_code, "Error occurred");
        }
        LogLevel::Error => {
            tracing::error!(error = %details, error_code, "Error occurred");
        }
    }
}

impl IntoResponse for HttpAppError {
    fn into_response(self) -> Response {
        let app_error = &self.0;

        let status = StatusCode::from_u16(app_error.http_status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        log_error(app_error);

        let page = view::error_page(status.as_u16(), &app_error.client_message());
        (status, Html(page)).into_response()
    }
}
