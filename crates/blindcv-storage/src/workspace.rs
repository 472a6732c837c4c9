use crate::error::{StorageError, StorageResult};
use crate::layout::WorkspaceLayout;
use blindcv_core::CandidateSlot;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;

/// A removal that failed during [`Workspace::reset`].
#[derive(Debug)]
pub struct ResetFailure {
    pub path: PathBuf,
    pub error: std::io::Error,
}

/// What a reset removed, and what it could not remove.
#[derive(Debug, Default)]
pub struct ResetReport {
    pub removed: usize,
    pub failures: Vec<ResetFailure>,
}

impl ResetReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// On-disk workspace of the current submission.
#[derive(Debug, Clone)]
pub struct Workspace {
    layout: WorkspaceLayout,
}

impl Workspace {
    pub fn new(layout: WorkspaceLayout) -> Self {
        Self { layout }
    }

    pub fn layout(&self) -> &WorkspaceLayout {
        &self.layout
    }

    pub fn root(&self) -> &Path {
        &self.layout.root
    }

    pub fn scratch_dir(&self) -> &Path {
        &self.layout.scratch_dir
    }

    pub fn original_path(&self, slot: CandidateSlot) -> PathBuf {
        self.layout.originals_dir.join(slot.original_file_name())
    }

    pub fn anonymized_path(&self, slot: CandidateSlot) -> PathBuf {
        self.layout.anonymized_dir.join(slot.anonymized_file_name())
    }

    /// Create every workspace directory that does not exist yet.
    pub async fn ensure_layout(&self) -> StorageResult<()> {
        for dir in [
            &self.layout.originals_dir,
            &self.layout.anonymized_dir,
            &self.layout.scratch_dir,
        ] {
            fs::create_dir_all(dir).await?;
        }
        Ok(())
    }

    /// Remove every entry inside both slot directories.
    ///
    /// Never fails: a directory that cannot be listed or an entry that cannot
    /// be removed is logged, recorded in the report, and skipped.
    pub async fn reset(&self) -> ResetReport {
        tracing::info!(root = %self.layout.root.display(), "Clearing workspace folders");
        let mut report = ResetReport::default();

        for dir in self.layout.slot_dirs() {
            if let Err(e) = fs::create_dir_all(dir).await {
                tracing::error!(path = %dir.display(), error = %e, "Failed to create workspace folder");
                report.failures.push(ResetFailure {
                    path: dir.to_path_buf(),
                    error: e,
                });
                continue;
            }

            let mut entries = match fs::read_dir(dir).await {
                Ok(entries) => entries,
                Err(e) => {
                    tracing::error!(path = %dir.display(), error = %e, "Failed to list workspace folder");
                    report.failures.push(ResetFailure {
                        path: dir.to_path_buf(),
                        error: e,
                    });
                    continue;
                }
            };

            loop {
                let entry = match entries.next_entry().await {
                    Ok(Some(entry)) => entry,
                    Ok(None) => break,
                    Err(e) => {
                        tracing::error!(path = %dir.display(), error = %e, "Failed to read workspace entry");
                        report.failures.push(ResetFailure {
                            path: dir.to_path_buf(),
                            error: e,
                        });
                        break;
                    }
                };

                let path = entry.path();
                match remove_entry(&path).await {
                    Ok(()) => {
                        tracing::debug!(path = %path.display(), "Removed workspace entry");
                        report.removed += 1;
                    }
                    Err(e) => {
                        tracing::error!(path = %path.display(), error = %e, "Failed to remove workspace entry");
                        report.failures.push(ResetFailure { path, error: e });
                    }
                }
            }
        }

        tracing::info!(
            removed = report.removed,
            failures = report.failures.len(),
            "Workspace folders cleared"
        );
        report
    }

    /// Write the uploaded bytes of `slot` and check the file is really there.
    pub async fn save_original(&self, slot: CandidateSlot, data: &[u8]) -> StorageResult<PathBuf> {
        let path = self.original_path(slot);
        write_file(&path, data).await?;

        if !fs::try_exists(&path).await.unwrap_or(false) {
            return Err(StorageError::MissingAfterWrite(path));
        }

        tracing::info!(slot = %slot, path = %path.display(), size = data.len(), "Original saved");
        Ok(path)
    }

    /// Remove the saved original of `slot`; a missing file is not an error.
    pub async fn remove_original(&self, slot: CandidateSlot) -> StorageResult<()> {
        let path = self.original_path(slot);
        if !fs::try_exists(&path).await.unwrap_or(false) {
            return Ok(());
        }
        fs::remove_file(&path)
            .await
            .map_err(|source| StorageError::DeleteFailed {
                path: path.clone(),
                source,
            })?;
        tracing::info!(slot = %slot, path = %path.display(), "Original removed");
        Ok(())
    }

    /// Remove a (possibly partial) anonymized output of `slot`.
    pub async fn remove_anonymized(&self, slot: CandidateSlot) -> StorageResult<()> {
        let path = self.anonymized_path(slot);
        if !fs::try_exists(&path).await.unwrap_or(false) {
            return Ok(());
        }
        fs::remove_file(&path)
            .await
            .map_err(|source| StorageError::DeleteFailed {
                path: path.clone(),
                source,
            })?;
        tracing::debug!(slot = %slot, path = %path.display(), "Anonymized output removed");
        Ok(())
    }

    /// Number of entries in both slot directories combined.
    pub async fn entry_count(&self) -> StorageResult<usize> {
        let mut count = 0;
        for dir in self.layout.slot_dirs() {
            if !fs::try_exists(dir).await.unwrap_or(false) {
                continue;
            }
            let mut entries = fs::read_dir(dir).await?;
            while entries.next_entry().await?.is_some() {
                count += 1;
            }
        }
        Ok(count)
    }
}

async fn remove_entry(path: &Path) -> std::io::Result<()> {
    // symlink_metadata so a link to a directory is unlinked, not followed
    let metadata = fs::symlink_metadata(path).await?;
    if metadata.is_dir() {
        fs::remove_dir_all(path).await
    } else {
        fs::remove_file(path).await
    }
}

async fn write_file(path: &Path, data: &[u8]) -> StorageResult<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .await
            .map_err(|source| StorageError::WriteFailed {
                path: path.to_path_buf(),
                source,
            })?;
    }

    let mut file = fs::File::create(path)
        .await
        .map_err(|source| StorageError::WriteFailed {
            path: path.to_path_buf(),
            source,
        })?;
    file.write_all(data)
        .await
        .map_err(|source| StorageError::WriteFailed {
            path: path.to_path_buf(),
            source,
        })?;
    file.flush()
        .await
        .map_err(|source| StorageError::WriteFailed {
            path: path.to_path_buf(),
            source,
        })?;
    Ok(())
}
