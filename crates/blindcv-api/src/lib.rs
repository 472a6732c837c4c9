//! blindcv API Library
//!
//! HTTP boundary of the anonymizer: the upload page, the batch
//! orchestrator behind it, the archive download and application setup.

pub mod error;
mod handlers;
pub mod services;
pub mod setup;
pub mod state;
pub mod telemetry;
pub mod utils;
mod view;

// Re-exports
pub use error::HttpAppError;
pub use services::batch::{BatchProcessor, UploadedFile};
pub use state::AppState;
