use crate::utils::flash::FlashSigner;
use blindcv_core::AppConfig;
use blindcv_services::{ArchiveExporter, Redactor};
use blindcv_storage::{Workspace, WorkspaceLayout};
use std::sync::Arc;
use tokio::sync::Mutex;

/// Shared application state.
pub struct AppState {
    pub config: AppConfig,
    pub workspace: Workspace,
    pub redactor: Arc<dyn Redactor>,
    pub exporter: ArchiveExporter,
    pub flash: FlashSigner,
    /// Held for the whole duration of a submission or a download, so that
    /// the workspace only ever holds one submission's artifacts.
    pub workspace_lock: Mutex<()>,
}

impl AppState {
    pub fn new(config: AppConfig, redactor: Arc<dyn Redactor>) -> Self {
        let workspace = Workspace::new(WorkspaceLayout::from_config(&config));
        let exporter = ArchiveExporter::new(workspace.clone());
        let flash = FlashSigner::new(config.session_secret.as_bytes());

        Self {
            config,
            workspace,
            redactor,
            exporter,
            flash,
            workspace_lock: Mutex::new(()),
        }
    }
}
