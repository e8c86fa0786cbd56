//! # Customer Registry Main Entry Point
//!
//! This is the main entry point for the Customer Registry API service.

use customer_registry::{config::ConfigLoader, db, server::run_server, telemetry};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration from layered env files and variables
    let config_loader = ConfigLoader::new();
    let config = config_loader.load()?;

    telemetry::init_tracing(&config)?;

    tracing::info!(profile = %config.profile, "Loaded configuration");
    if let Ok(redacted_json) = config.redacted_json() {
        tracing::debug!(config = %redacted_json, "Effective configuration");
    }

    let conn = db::init_pool(&config).await?;
    if config.run_migrations {
        db::run_migrations(&conn).await?;
    }

    // Start the server with the loaded configuration
    run_server(config, conn).await
}
