//! blindcv Processing Library
//!
//! Document conversion for the anonymization pipeline: PDF to text on the
//! way in, text to PDF on the way out. Both operations are synchronous and
//! CPU/IO bound; async callers should run them on the blocking pool.

pub mod document;
pub mod error;

// Re-export commonly used types
pub use document::{extract_text, render_text, render_text_with_layout, PageLayout, RenderReport};
pub use error::DocumentError;
