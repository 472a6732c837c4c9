//! Submission report returned by the batch orchestrator and rendered by the HTTP layer.

use serde::{Deserialize, Serialize};

use super::slot::{CandidateSlot, SlotOutcome};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Success,
    Error,
}

impl NoticeLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            NoticeLevel::Success => "success",
            NoticeLevel::Error => "error",
        }
    }
}

/// Short user-facing message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub text: String,
}

impl Notice {
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            text: text.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubmissionStatus {
    Success,
    Failure,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotReport {
    pub slot: CandidateSlot,
    pub file_name: String,
    pub outcome: SlotOutcome,
}

/// Result of one submission.
///
/// `notices` holds the per-slot failure notices in slot order followed by the
/// aggregate message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionReport {
    pub status: SubmissionStatus,
    pub message: String,
    pub download_enabled: bool,
    pub notices: Vec<Notice>,
    pub slots: Vec<SlotReport>,
}

impl SubmissionReport {
    /// Aggregate per-slot results into the submission-level outcome.
    pub fn from_slots(slots: Vec<SlotReport>, mut notices: Vec<Notice>) -> Self {
        let success_count = slots.iter().filter(|s| s.outcome.is_success()).count();

        let (status, message, download_enabled) = if success_count > 0 {
            (
                SubmissionStatus::Success,
                format!("{} currículo(s) processado(s) com sucesso!", success_count),
                true,
            )
        } else {
            (
                SubmissionStatus::Failure,
                "Nenhum currículo foi processado. Verifique os arquivos e tente novamente."
                    .to_string(),
                false,
            )
        };

        notices.push(match status {
            SubmissionStatus::Success => Notice::success(message.clone()),
            SubmissionStatus::Failure => Notice::error(message.clone()),
        });

        Self {
            status,
            message,
            download_enabled,
            notices,
            slots,
        }
    }

    pub fn success_count(&self) -> usize {
        self.slots.iter().filter(|s| s.outcome.is_success()).count()
    }

    pub fn outcome_of(&self, slot: CandidateSlot) -> Option<SlotOutcome> {
        self.slots.iter().find(|s| s.slot == slot).map(|s| s.outcome)
    }
}
