//! Workspace archive export

pub mod service;

pub use service::{ArchiveError, ArchiveExporter};
