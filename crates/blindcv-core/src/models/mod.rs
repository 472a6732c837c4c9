pub mod report;
pub mod slot;

pub use report::{Notice, NoticeLevel, SlotReport, SubmissionReport, SubmissionStatus};
pub use slot::{CandidateSlot, FailureKind, SkipReason, SlotOutcome};
