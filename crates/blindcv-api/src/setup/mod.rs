//! Application setup and initialization
//!
//! Everything `main` needs before the server starts: configuration
//! validation, telemetry, the workspace directories and the router.

pub mod routes;
pub mod server;

use crate::state::AppState;
use anyhow::{Context, Result};
use blindcv_core::AppConfig;
use blindcv_services::{MistralRedactor, Redactor};
use std::sync::Arc;

/// Initialize the entire application
pub async fn initialize_app(config: AppConfig) -> Result<(Arc<AppState>, axum::Router)> {
    // Initialize telemetry first so that validation warnings are visible
    crate::telemetry::init_telemetry()?;

    config
        .validate()
        .context("Configuration validation failed")?;
    tracing::info!(
        base_dir = %config.base_dir.display(),
        environment = %config.environment,
        "Configuration loaded and validated successfully"
    );

    let redactor: Arc<dyn Redactor> = Arc::new(
        MistralRedactor::new(&config).context("Failed to create Mistral HTTP client")?,
    );

    let state = Arc::new(AppState::new(config, redactor));
    state
        .workspace
        .ensure_layout()
        .await
        .context("Failed to create workspace directories")?;

    let router = routes::setup_routes(state.clone());

    Ok((state, router))
}
