//! blindcv Services Layer
//!
//! The two services that talk to the outside world on behalf of a
//! submission: the redaction client (Mistral chat completions) and the
//! archive exporter that packs the workspace into a ZIP for download.

pub mod archive;
pub mod redaction;

// Re-export commonly used types
pub use archive::{ArchiveError, ArchiveExporter};
pub use redaction::{build_prompt, MistralRedactor, RedactionError, Redactor};
