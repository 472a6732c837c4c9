//! Error types module
//!
//! `AppError` is the error surfaced at the HTTP boundary. Pipeline failures
//! inside a submission never become an `AppError`: they are recorded as
//! per-slot outcomes instead (see [`crate::models`]).

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Expected errors like malformed requests
    Debug,
    /// Recoverable issues
    Warn,
    /// Unexpected failures
    Error,
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("File too large: {0}")]
    PayloadTooLarge(String),

    #[error("Archive error: {0}")]
    Archive(String),

    #[error("Internal error with source")]
    InternalWithSource {
        message: String,
        #[source]
        source: anyhow::Error,
    },
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::InternalWithSource {
            message: err.to_string(),
            source: err,
        }
    }
}

impl AppError {
    pub fn http_status_code(&self) -> u16 {
        match self {
            AppError::InvalidInput(_) => 400,
            AppError::PayloadTooLarge(_) => 413,
            AppError::Archive(_) | AppError::InternalWithSource { .. } => {
                500
            }
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::InvalidInput(_) => "INVALID_INPUT",
            AppError::PayloadTooLarge(_) => "PAYLOAD_TOO_LARGE",
            AppError::Archive(_) => "ARCHIVE_ERROR",
            AppError::InternalWithSource { .. } => "INTERNAL_ERROR",
        }
    }

    /// Message safe to show to the user.
    pub fn client_message(&self) -> String {
        match self {
            AppError::InvalidInput(msg) => msg.clone(),
            AppError::PayloadTooLarge(msg) => format!("Arquivo muito grande: {}", msg),
            AppError::Archive(msg) => format!("Ocorreu um erro ao gerar o arquivo ZIP: {}", msg),
            AppError::InternalWithSource { .. } => {
                "Erro interno. Tente novamente.".to_string()
            }
        }
    }

    /// Full message including the source chain, for logs.
    pub fn detailed_message(&self) -> String {
        match self {
            AppError::InternalWithSource { message, source } => {
                format!("{}: {:#}", message, source)
            }
            other => other.to_string(),
        }
    }

    pub fn log_level(&self) -> LogLevel {
        match self {
            AppError::InvalidInput(_) => LogLevel::Debug,
            AppError::PayloadTooLarge(_) => LogLevel::Warn,
            AppError::Archive(_) | AppError::InternalWithSource { .. } => {
                LogLevel::Error
            }
        }
    }
}
