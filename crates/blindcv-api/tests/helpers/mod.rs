//! Test helpers: build AppState and router for integration tests.
//!
//! Every test app gets its own temporary base directory and a stub
//! redactor, so no network access is needed.

#![allow(dead_code)]

pub mod fixtures;
pub mod redactors;

use axum_test::TestServer;
use blindcv_api::setup::routes;
use blindcv_api::state::AppState;
use blindcv_core::AppConfig;
use blindcv_services::Redactor;
use std::sync::Arc;
use tempfile::TempDir;

/// Test application: server, shared state, and the owned base directory.
pub struct TestApp {
    pub server: TestServer,
    pub state: Arc<AppState>,
    pub _temp_dir: TempDir,
}

impl TestApp {
    pub fn client(&self) -> &TestServer {
        &self.server
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }
}

/// Setup test app rooted in a fresh temporary directory.
pub async fn setup_test_app(redactor: Arc<dyn Redactor>) -> TestApp {
    setup_test_app_with(redactor, |_| {}).await
}

/// Setup test app, letting the caller adjust the configuration first.
pub async fn setup_test_app_with<F>(redactor: Arc<dyn Redactor>, configure: F) -> TestApp
where
    F: FnOnce(&mut AppConfig),
{
    let temp_dir = tempfile::tempdir().expect("Failed to create temp directory");

    let mut config = AppConfig::for_base_dir(temp_dir.path());
    config.session_secret = "test-session-secret".to_string();
    config.open_browser = false;
    configure(&mut config);

    let state = Arc::new(AppState::new(config, redactor));
    state
        .workspace
        .ensure_layout()
        .await
        .expect("Failed to create workspace directories");

    let app = routes::setup_routes(state.clone());
    let server = TestServer::new(app.into_make_service()).expect("Failed to create test server");

    TestApp {
        server,
        state,
        _temp_dir: temp_dir,
    }
}
