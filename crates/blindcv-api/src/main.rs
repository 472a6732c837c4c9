use blindcv_core::AppConfig;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    // Load configuration
    let config = AppConfig::from_env()?;

    // Initialize the application (workspace, redaction client, routes)
    let (_state, router) = blindcv_api::setup::initialize_app(config.clone()).await?;

    // Start the server
    blindcv_api::setup::server::start_server(&config, router).await?;

    Ok(())
}
