//! Batch orchestration
//!
//! Runs every attachment of a submission through save, extraction,
//! redaction and rendering, strictly in attachment order. A failing slot
//! never affects the others: each failure ends up as a [`SlotOutcome`]
//! plus a notice naming the file.

use crate::state::AppState;
use crate::utils::upload::{display_name, is_allowed_file};
use blindcv_core::constants::REDACTION_FAILURE_MESSAGE;
use blindcv_core::{
    CandidateSlot, FailureKind, Notice, SkipReason, SlotOutcome, SlotReport, SubmissionReport,
};
use blindcv_processing::{extract_text, render_text};
use blindcv_services::Redactor;
use blindcv_storage::Workspace;
use bytes::Bytes;
use futures::FutureExt;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tracing::Instrument;

/// One attachment of a submission.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub file_name: String,
    pub data: Bytes,
}

/// Why a slot stopped, with the detail shown to the user.
#[derive(Debug)]
struct SlotFailure {
    kind: FailureKind,
    detail: String,
}

impl SlotFailure {
    fn new(kind: FailureKind, detail: impl Into<String>) -> Self {
        Self {
            kind,
            detail: detail.into(),
        }
    }

    fn notice(&self, file_name: &str) -> Notice {
        let text = match self.kind {
            FailureKind::SaveError => format!(
                "Erro interno: o arquivo '{}' não foi salvo corretamente. Verifique permissões de pasta.",
                file_name
            ),
            FailureKind::ExtractionError => format!(
                "Erro ao processar o arquivo '{}'. Detalhes: {}",
                file_name, self.detail
            ),
            FailureKind::RedactionError => format!(
                "Erro ao anonimizar o arquivo '{}': {}",
                file_name, REDACTION_FAILURE_MESSAGE
            ),
            FailureKind::RenderError => format!(
                "Erro ao gerar o PDF anonimizado de '{}'. Detalhes: {}",
                file_name, self.detail
            ),
            FailureKind::UnexpectedFault => {
                format!("Erro inesperado ao processar o arquivo '{}'.", file_name)
            }
        };
        Notice::error(text)
    }
}

pub struct BatchProcessor {
    workspace: Workspace,
    redactor: Arc<dyn Redactor>,
    retain_failed_originals: bool,
}

impl BatchProcessor {
    pub fn new(
        workspace: Workspace,
        redactor: Arc<dyn Redactor>,
        retain_failed_originals: bool,
    ) -> Self {
        Self {
            workspace,
            redactor,
            retain_failed_originals,
        }
    }

    pub fn from_state(state: &AppState) -> Self {
        Self::new(
            state.workspace.clone(),
            state.redactor.clone(),
            state.config.retain_failed_originals,
        )
    }

    /// Process the attachments of one submission.
    ///
    /// The workspace must have been reset beforehand.
    pub async fn process(&self, files: Vec<UploadedFile>) -> SubmissionReport {
        let span = tracing::info_span!(
            "submission",
            submission_id = %uuid::Uuid::new_v4(),
            files = files.len()
        );

        async move {
            let mut slots = Vec::with_capacity(files.len());
            let mut notices = Vec::new();

            for (index, file) in files.iter().enumerate() {
                let slot = CandidateSlot::from_index(index);
                let file_name = display_name(&file.file_name).to_string();
                let outcome = self.process_slot(slot, file, &file_name, &mut notices).await;
                slots.push(SlotReport {
                    slot,
                    file_name,
                    outcome,
                });
            }

            let report = SubmissionReport::from_slots(slots, notices);
            tracing::info!(
                succeeded = report.success_count(),
                total = report.slots.len(),
                "Submission processed"
            );
            report
        }
        .instrument(span)
        .await
    }

    async fn process_slot(
        &self,
        slot: CandidateSlot,
        file: &UploadedFile,
        file_name: &str,
        notices: &mut Vec<Notice>,
    ) -> SlotOutcome {
        if !is_allowed_file(&file.file_name) {
            tracing::warn!(slot = %slot, file_name = %file_name, "Rejected non-PDF upload");
            notices.push(Notice::error(format!(
                "Formato de arquivo inválido para '{}'. Por favor, envie apenas PDFs.",
                file_name
            )));
            return SlotOutcome::Skipped(SkipReason::InvalidFormat);
        }

        let result = AssertUnwindSafe(self.run_pipeline(slot, file, file_name))
            .catch_unwind()
            .await
            .unwrap_or_else(|payload| {
                tracing::error!(
                    slot = %slot,
                    file_name = %file_name,
                    panic = %panic_message(payload.as_ref()),
                    "Unexpected fault while processing file"
                );
                Err(SlotFailure::new(FailureKind::UnexpectedFault, "panic"))
            });

        match result {
            Ok(()) => {
                tracing::info!(
                    slot = %slot,
                    file_name = %file_name,
                    output = %slot.anonymized_file_name(),
                    "File processed and anonymized"
                );
                SlotOutcome::Succeeded
            }
            Err(failure) => {
                notices.push(failure.notice(file_name));
                self.clean_up_failed_slot(slot, failure.kind).await;
                SlotOutcome::Failed(failure.kind)
            }
        }
    }

    async fn run_pipeline(
        &self,
        slot: CandidateSlot,
        file: &UploadedFile,
        file_name: &str,
    ) -> Result<(), SlotFailure> {
        let original_path = self
            .workspace
            .save_original(slot, &file.data)
            .await
            .map_err(|e| {
                tracing::error!(slot = %slot, file_name = %file_name, error = %e, "Failed to save original");
                SlotFailure::new(FailureKind::SaveError, e.to_string())
            })?;

        let text = tokio::task::spawn_blocking(move || extract_text(&original_path))
            .await
            .map_err(|e| {
                tracing::error!(slot = %slot, file_name = %file_name, error = %e, "Extraction task failed");
                SlotFailure::new(FailureKind::UnexpectedFault, e.to_string())
            })?
            .map_err(|e| {
                tracing::error!(slot = %slot, file_name = %file_name, error = %e, "Failed to extract text");
                SlotFailure::new(FailureKind::ExtractionError, e.to_string())
            })?;
        tracing::info!(slot = %slot, file_name = %file_name, text_len = text.len(), "Text extracted");

        let redacted = self.redactor.anonymize(&text).await.map_err(|e| {
            tracing::error!(slot = %slot, file_name = %file_name, error = %e, "Failed to anonymize text");
            SlotFailure::new(FailureKind::RedactionError, e.to_string())
        })?;

        let anonymized_path = self.workspace.anonymized_path(slot);
        let report = tokio::task::spawn_blocking(move || render_text(&redacted, &anonymized_path))
            .await
            .map_err(|e| {
                tracing::error!(slot = %slot, file_name = %file_name, error = %e, "Render task failed");
                SlotFailure::new(FailureKind::UnexpectedFault, e.to_string())
            })?
            .map_err(|e| {
                tracing::error!(slot = %slot, file_name = %file_name, error = %e, "Failed to render anonymized PDF");
                SlotFailure::new(FailureKind::RenderError, e.to_string())
            })?;

        if report.truncated {
            tracing::warn!(slot = %slot, file_name = %file_name, "Anonymized PDF was truncated to one page");
        }
        Ok(())
    }

    async fn clean_up_failed_slot(&self, slot: CandidateSlot, kind: FailureKind) {
        tracing::debug!(
            slot = %slot,
            failure = kind.as_str(),
            retain_original = self.retain_failed_originals,
            "Cleaning up failed slot"
        );
        if let Err(e) = self.workspace.remove_anonymized(slot).await {
            tracing::warn!(slot = %slot, error = %e, "Failed to remove partial anonymized output");
        }

        if kind == FailureKind::SaveError || self.retain_failed_originals {
            return;
        }
        if let Err(e) = self.workspace.remove_original(slot).await {
            tracing::warn!(slot = %slot, error = %e, "Failed to remove original after failure");
        }
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use blindcv_core::NoticeLevel;
    use blindcv_services::RedactionError;
    use blindcv_storage::WorkspaceLayout;

    struct Echo;

    #[async_trait]
    impl Redactor for Echo {
        async fn anonymize(&self, text: &str) -> Result<String, RedactionError> {
            Ok(text.to_string())
        }
    }

    struct Panicking;

    #[async_trait]
    impl Redactor for Panicking {
        async fn anonymize(&self, _text: &str) -> Result<String, RedactionError> {
            panic!("redactor blew up");
        }
    }

    fn pdf_bytes(text: &str) -> Bytes {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fixture.pdf");
        render_text(text, &path).unwrap();
        Bytes::from(std::fs::read(path).unwrap())
    }

    fn upload(name: &str, data: Bytes) -> UploadedFile {
        UploadedFile {
            file_name: name.to_string(),
            data,
        }
    }

    async fn processor(
        dir: &tempfile::TempDir,
        redactor: Arc<dyn Redactor>,
        retain: bool,
    ) -> BatchProcessor {
        let workspace = Workspace::new(WorkspaceLayout::under(dir.path()));
        workspace.ensure_layout().await.unwrap();
        BatchProcessor::new(workspace, redactor, retain)
    }

    #[tokio::test]
    async fn test_slots_follow_attachment_positions() {
        let dir = tempfile::tempdir().unwrap();
        let processor = processor(&dir, Arc::new(Echo), true).await;

        let report = processor
            .process(vec![
                upload("zeta.pdf", pdf_bytes("primeiro")),
                upload("notes.txt", Bytes::from_static(b"texto")),
                upload("alpha.PDF", pdf_bytes("terceiro")),
            ])
            .await;

        assert_eq!(report.success_count(), 2);
        assert_eq!(
            report.outcome_of(CandidateSlot::from_index(1)),
            Some(SlotOutcome::Skipped(SkipReason::InvalidFormat))
        );
        let workspace = &processor.workspace;
        assert!(workspace.anonymized_path(CandidateSlot::from_index(0)).exists());
        assert!(!workspace.original_path(CandidateSlot::from_index(1)).exists());
        assert!(workspace.anonymized_path(CandidateSlot::from_index(2)).exists());
        assert_eq!(report.slots[2].file_name, "alpha.PDF");
    }

    #[tokio::test]
    async fn test_panic_in_one_slot_does_not_abort_batch() {
        let dir = tempfile::tempdir().unwrap();
        let processor = processor(&dir, Arc::new(Panicking), true).await;

        let report = processor
            .process(vec![
                upload("a.pdf", pdf_bytes("um")),
                upload("b.pdf", pdf_bytes("dois")),
            ])
            .await;

        assert_eq!(report.success_count(), 0);
        assert_eq!(report.slots.len(), 2);
        for slot in &report.slots {
            assert_eq!(slot.outcome, SlotOutcome::Failed(FailureKind::UnexpectedFault));
        }
        assert!(report.notices[0].text.contains("'a.pdf'"));
        assert!(report.notices[1].text.contains("'b.pdf'"));
    }

    #[tokio::test]
    async fn test_original_retained_after_failure_by_default() {
        let dir = tempfile::tempdir().unwrap();
        let processor = processor(&dir, Arc::new(Echo), true).await;

        let report = processor
            .process(vec![upload("broken.pdf", Bytes::from_static(b"not a pdf"))])
            .await;

        let slot = CandidateSlot::from_index(0);
        assert_eq!(
            report.outcome_of(slot),
            Some(SlotOutcome::Failed(FailureKind::ExtractionError))
        );
        assert!(processor.workspace.original_path(slot).exists());
        assert!(!processor.workspace.anonymized_path(slot).exists());
    }

    #[tokio::test]
    async fn test_original_removed_after_failure_when_configured() {
        let dir = tempfile::tempdir().unwrap();
        let processor = processor(&dir, Arc::new(Echo), false).await;

        processor
            .process(vec![upload("broken.pdf", Bytes::from_static(b"not a pdf"))])
            .await;

        assert!(!processor
            .workspace
            .original_path(CandidateSlot::from_index(0))
            .exists());
    }

    #[tokio::test]
    async fn test_empty_name_consumes_its_position() {
        let dir = tempfile::tempdir().unwrap();
        let processor = processor(&dir, Arc::new(Echo), true).await;

        let report = processor
            .process(vec![
                upload("", Bytes::new()),
                upload("cv.pdf", pdf_bytes("conteudo")),
            ])
            .await;

        assert_eq!(
            report.outcome_of(CandidateSlot::from_index(1)),
            Some(SlotOutcome::Succeeded)
        );
        assert!(processor
            .workspace
            .anonymized_path(CandidateSlot::from_index(1))
            .exists());
    }

    #[tokio::test]
    async fn test_unwritable_originals_dir_fails_every_slot_with_save_error() {
        let dir = tempfile::tempdir().unwrap();
        let processor = processor(&dir, Arc::new(Echo), true).await;
        let originals_dir = processor.workspace.layout().originals_dir.clone();
        std::fs::remove_dir_all(&originals_dir).unwrap();
        std::fs::write(&originals_dir, b"not a directory").unwrap();

        let report = processor
            .process(vec![
                upload("a.pdf", pdf_bytes("um")),
                upload("b.pdf", pdf_bytes("dois")),
            ])
            .await;

        assert_eq!(report.success_count(), 0);
        for slot in &report.slots {
            assert_eq!(slot.outcome, SlotOutcome::Failed(FailureKind::SaveError));
        }
        assert!(report.notices[0].text.contains("'a.pdf' não foi salvo"));
        assert!(report.notices[1].text.contains("'b.pdf' não foi salvo"));
        assert!(!processor
            .workspace
            .anonymized_path(CandidateSlot::from_index(1))
            .exists());
    }

    #[tokio::test]
    async fn test_non_pdf_upload_gets_error_notice() {
        let dir = tempfile::tempdir().unwrap();
        let processor = processor(&dir, Arc::new(Echo), true).await;

        let report = processor
            .process(vec![upload("notas.txt", Bytes::from_static(b"texto"))])
            .await;

        assert_eq!(report.notices[0].level, NoticeLevel::Error);
        assert!(report.notices[0].text.contains("'notas.txt'"));
    }

    #[test]
    fn test_redaction_notice_uses_fixed_message() {
        let failure = SlotFailure::new(FailureKind::RedactionError, "HTTP 401");
        let notice = failure.notice("cv.pdf");
        assert!(notice.text.contains("'cv.pdf'"));
        assert!(notice.text.contains(REDACTION_FAILURE_MESSAGE));
        assert!(!notice.text.contains("401"));
    }
}
