//! Candidate slots and their per-slot outcomes.

use serde::{Deserialize, Serialize};
use std::fmt;

/// 1-based position of an attachment within one submission.
///
/// Numbering restarts at 1 for every submission and never depends on the
/// uploaded file name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CandidateSlot(u32);

impl CandidateSlot {
    /// Slot for the attachment at zero-based `index`.
    pub fn from_index(index: usize) -> Self {
        Self(index as u32 + 1)
    }

    pub fn original_file_name(&self) -> String {
        format!("Candidato_{}_original.pdf", self.0)
    }

    pub fn anonymized_file_name(&self) -> String {
        format!("Candidato_{}_anonimo.pdf", self.0)
    }
}

impl fmt::Display for CandidateSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SkipReason {
    InvalidFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FailureKind {
    SaveError,
    ExtractionError,
    RedactionError,
    RenderError,
    UnexpectedFault,
}

impl FailureKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureKind::SaveError => "save_error",
            FailureKind::ExtractionError => "extraction_error",
            FailureKind::RedactionError => "redaction_error",
            FailureKind::RenderError => "render_error",
            FailureKind::UnexpectedFault => "unexpected_fault",
        }
    }
}

/// Terminal state of one candidate slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SlotOutcome {
    Succeeded,
    Skipped(SkipReason),
    Failed(FailureKind),
}

impl SlotOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, SlotOutcome::Succeeded)
    }
}
