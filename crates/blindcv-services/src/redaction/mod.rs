//! Redaction client abstraction.
//!
//! A [`Redactor`] turns résumé text into the same text with every piece of
//! identifying information replaced by a fixed marker. Failures are always
//! returned as [`RedactionError`], never folded into the returned text.

pub mod mistral;
pub mod prompt;

use async_trait::async_trait;
use thiserror::Error;

pub use mistral::MistralRedactor;
pub use prompt::build_prompt;

#[derive(Debug, Error)]
pub enum RedactionError {
    #[error("Redaction service did not answer within {0} seconds")]
    Timeout(u64),

    #[error("Failed to reach the redaction service: {0}")]
    Transport(String),

    #[error("Redaction service rejected the API key (HTTP {status})")]
    Authentication { status: u16 },

    #[error("Redaction service returned HTTP {status}: {body}")]
    Service { status: u16, body: String },

    #[error("Redaction service returned no content")]
    EmptyResponse,

    #[error("Failed to decode the redaction service response: {0}")]
    Decode(String),
}

#[async_trait]
pub trait Redactor: Send + Sync {
    /// Redacted version of `text`.
    async fn anonymize(&self, text: &str) -> Result<String, RedactionError>;
}
