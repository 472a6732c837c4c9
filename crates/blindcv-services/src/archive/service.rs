use blindcv_core::constants::{ARCHIVE_FILE_NAME, CURRICULOS_DIR};
use blindcv_storage::Workspace;
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;
use zip::write::{FileOptions, ZipWriter};
use zip::CompressionMethod;

#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to write archive {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to compress {entry}: {message}")]
    Compression { entry: String, message: String },

    #[error("Failed to delete temporary archive {path}: {source}")]
    Cleanup {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Archive task failed: {0}")]
    Task(String),
}

/// Packs the workspace root into an in-memory ZIP.
#[derive(Debug, Clone)]
pub struct ArchiveExporter {
    workspace: Workspace,
}

impl ArchiveExporter {
    pub fn new(workspace: Workspace) -> Self {
        Self { workspace }
    }

    /// Location of the temporary archive while it is being built.
    pub fn temp_archive_path(&self) -> PathBuf {
        self.workspace.scratch_dir().join(ARCHIVE_FILE_NAME)
    }

    /// Build the archive, read it back and delete the temporary file.
    pub async fn export(&self) -> Result<Vec<u8>, ArchiveError> {
        let root = self.workspace.root().to_path_buf();
        let temp_path = self.temp_archive_path();

        let bytes = tokio::task::spawn_blocking(move || export_blocking(&root, &temp_path))
            .await
            .map_err(|e| ArchiveError::Task(e.to_string()))??;

        Ok(bytes)
    }
}

fn export_blocking(root: &Path, temp_path: &Path) -> Result<Vec<u8>, ArchiveError> {
    if let Some(parent) = temp_path.parent() {
        fs::create_dir_all(parent).map_err(|source| ArchiveError::Write {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    let result = write_archive(root, temp_path).and_then(|entries| {
        tracing::info!(path = %temp_path.display(), entries, "Temporary ZIP archive created");
        fs::read(temp_path).map_err(|source| ArchiveError::Read {
            path: temp_path.to_path_buf(),
            source,
        })
    });

    match result {
        Ok(bytes) => {
            fs::remove_file(temp_path).map_err(|source| ArchiveError::Cleanup {
                path: temp_path.to_path_buf(),
                source,
            })?;
            tracing::info!(path = %temp_path.display(), "Temporary ZIP archive removed");
            Ok(bytes)
        }
        Err(e) => {
            if temp_path.exists() {
                if let Err(cleanup) = fs::remove_file(temp_path) {
                    tracing::warn!(
                        path = %temp_path.display(),
                        error = %cleanup,
                        "Failed to remove temporary ZIP archive after error"
                    );
                }
            }
            Err(e)
        }
    }
}

/// Write every directory and file under `root` into a ZIP at `dest`.
/// Returns the number of entries written.
fn write_archive(root: &Path, dest: &Path) -> Result<usize, ArchiveError> {
    let file = File::create(dest).map_err(|source| ArchiveError::Write {
        path: dest.to_path_buf(),
        source,
    })?;
    let mut zip = ZipWriter::new(BufWriter::new(file));

    let prefix = root
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(CURRICULOS_DIR)
        .to_string();

    let mut entries = 0;
    if root.is_dir() {
        zip.add_directory(format!("{}/", prefix), directory_options(root))
            .map_err(|e| compression_error(&prefix, e))?;
        entries += 1;
        entries += add_dir_contents(&mut zip, root, &prefix)?;
    }

    let mut writer = zip.finish().map_err(|e| compression_error(&prefix, e))?;
    writer.flush().map_err(|source| ArchiveError::Write {
        path: dest.to_path_buf(),
        source,
    })?;

    Ok(entries)
}

fn add_dir_contents<W: Write + io::Seek>(
    zip: &mut ZipWriter<W>,
    dir: &Path,
    prefix: &str,
) -> Result<usize, ArchiveError> {
    let mut children = fs::read_dir(dir)
        .and_then(|entries| entries.collect::<io::Result<Vec<_>>>())
        .map_err(|source| ArchiveError::Read {
            path: dir.to_path_buf(),
            source,
        })?;
    // sorted so that repeated exports list entries in the same order
    children.sort_by_key(|entry| entry.file_name());

    let mut entries = 0;
    for child in children {
        let path = child.path();
        let name = format!("{}/{}", prefix, child.file_name().to_string_lossy());
        let file_type = child.file_type().map_err(|source| ArchiveError::Read {
            path: path.clone(),
            source,
        })?;

        if file_type.is_dir() {
            zip.add_directory(format!("{}/", name), directory_options(&path))
                .map_err(|e| compression_error(&name, e))?;
            entries += 1;
            entries += add_dir_contents(zip, &path, &name)?;
        } else if file_type.is_file() {
            let data = fs::read(&path).map_err(|source| ArchiveError::Read {
                path: path.clone(),
                source,
            })?;
            zip.start_file(name.as_str(), file_options(&path))
                .map_err(|e| compression_error(&name, e))?;
            zip.write_all(&data)
                .map_err(|e| compression_error(&name, e))?;
            entries += 1;
        } else {
            tracing::debug!(path = %path.display(), "Skipping non-regular workspace entry");
        }
    }

    Ok(entries)
}

fn file_options(path: &Path) -> FileOptions {
    entry_options(path, 0o644)
}

/// Directories need the execute bit to be listable once extracted.
fn directory_options(path: &Path) -> FileOptions {
    entry_options(path, 0o755)
}

fn entry_options(path: &Path, mode: u32) -> FileOptions {
    let options = FileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .unix_permissions(mode);

    match modified_time(path) {
        Some(mtime) => options.last_modified_time(mtime),
        None => options,
    }
}

fn modified_time(path: &Path) -> Option<zip::DateTime> {
    let modified = fs::metadata(path).and_then(|m| m.modified()).ok()?;
    zip::DateTime::try_from(time::OffsetDateTime::from(modified)).ok()
}

fn compression_error(entry: &str, e: impl std::fmt::Display) -> ArchiveError {
    ArchiveError::Compression {
        entry: entry.to_string(),
        message: e.to_string(),
    }
}
