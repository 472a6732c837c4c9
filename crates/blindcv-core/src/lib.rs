//! blindcv Core Library
//!
//! This crate provides configuration, error types and the domain models
//! (candidate slots, per-slot outcomes, submission reports) shared by every
//! blindcv component.

pub mod config;
pub mod constants;
pub mod error;
pub mod models;

// Re-export commonly used types
pub use config::AppConfig;
pub use error::AppError;
pub use models::{
    CandidateSlot, FailureKind, Notice, NoticeLevel, SkipReason, SlotOutcome, SlotReport,
    SubmissionReport, SubmissionStatus,
};
