//! Server startup and graceful shutdown

use anyhow::Result;
use axum::Router;
use blindcv_core::AppConfig;
use std::time::Duration;

const BROWSER_OPEN_DELAY: Duration = Duration::from_millis(1250);

/// Start the server with graceful shutdown
pub async fn start_server(config: &AppConfig, app: Router) -> Result<()> {
    let addr = config.bind_address();
    tracing::info!(addr = %addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!(
        url = %config.public_url(),
        max_upload_mb = config.max_upload_size_bytes / 1024 / 1024,
        model = %config.mistral_model,
        retain_failed_originals = config.retain_failed_originals,
        "Server ready and accepting connections"
    );

    if config.open_browser {
        spawn_browser_open(config.public_url());
    }

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// Open the upload page in the default browser once the server is listening.
fn spawn_browser_open(url: String) {
    tokio::spawn(async move {
        tokio::time::sleep(BROWSER_OPEN_DELAY).await;
        let target = url.clone();
        match tokio::task::spawn_blocking(move || open::that(&target)).await {
            Ok(Ok(())) => tracing::debug!(url = %url, "Opened browser"),
            Ok(Err(e)) => tracing::warn!(url = %url, error = %e, "Failed to open browser"),
            Err(e) => tracing::warn!(error = %e, "Browser task failed"),
        }
    });
}

/// Signal handler for graceful shutdown
///
/// Listens for Ctrl+C (SIGINT) and SIGTERM. If a handler cannot be
/// installed, that signal is waited on forever instead.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install signal handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C signal");
        },
        _ = terminate => {
            tracing::info!("Received terminate signal");
        },
    }

    tracing::info!("Shutting down gracefully...");
}
