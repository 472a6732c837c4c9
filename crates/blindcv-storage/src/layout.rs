use blindcv_core::constants::{ANONYMIZED_DIR, CURRICULOS_DIR, ORIGINALS_DIR, TEMP_ZIP_DIR};
use blindcv_core::AppConfig;
use std::path::{Path, PathBuf};

/// Fixed directory layout of the workspace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkspaceLayout {
    /// `curriculos/`, the directory that gets archived.
    pub root: PathBuf,
    pub originals_dir: PathBuf,
    pub anonymized_dir: PathBuf,
    /// Sibling of `root`, so the archive never contains itself.
    pub scratch_dir: PathBuf,
}

impl WorkspaceLayout {
    pub fn under(base_dir: impl AsRef<Path>) -> Self {
        let base_dir = base_dir.as_ref();
        let root = base_dir.join(CURRICULOS_DIR);
        Self {
            originals_dir: root.join(ORIGINALS_DIR),
            anonymized_dir: root.join(ANONYMIZED_DIR),
            scratch_dir: base_dir.join(TEMP_ZIP_DIR),
            root,
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::under(&config.base_dir)
    }

    /// The two directories wiped on every submission.
    pub fn slot_dirs(&self) -> [&Path; 2] {
        [&self.originals_dir, &self.anonymized_dir]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_under_base_dir() {
        let layout = WorkspaceLayout::under("/srv/blindcv");
        assert_eq!(layout.root, PathBuf::from("/srv/blindcv/curriculos"));
        assert_eq!(
            layout.originals_dir,
            PathBuf::from("/srv/blindcv/curriculos/arquivos_originais_renomeados")
        );
        assert_eq!(
            layout.anonymized_dir,
            PathBuf::from("/srv/blindcv/curriculos/arquivos_anonimos")
        );
        assert_eq!(layout.scratch_dir, PathBuf::from("/srv/blindcv/temp_zips"));
        assert!(!layout.scratch_dir.starts_with(&layout.root));
    }
}
