//! storefront - shipping fees and checkout sessions for the clothing storefront

use storefront::{Config, Server, ServerState, init_logger};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    // Load .env file
    let _ = dotenvy::dotenv();

    let config = Config::from_env()?;
    init_logger(&config.log_level, config.log_dir.as_deref());

    tracing::info!("Starting storefront (env: {})", config.environment);
    if !config.is_production() {
        tracing::warn!("Running outside production, payment keys may be placeholders");
    }

    let state = ServerState::initialize(&config).map_err(|e| {
        tracing::error!("Startup failed: {e}");
        e
    })?;

    Server::new(config, state).run().await?;
    Ok(())
}
