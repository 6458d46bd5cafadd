use bulk_rs::api::{ApiServer, AppState};
use bulk_rs::config::Config;
use bulk_rs::db;
use bulk_rs::delivery::LogTransport;
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config_path = std::env::args().nth(1).unwrap_or_else(|| "config.toml".to_string());
    let (config, from_file) = if std::path::Path::new(&config_path).exists() {
        (Config::from_file(&config_path)?, true)
    } else {
        (Config::default(), false)
    };

    bulk_rs::logging::init(&config.logging);

    info!("Starting bulk-rs v{}", env!("CARGO_PKG_VERSION"));
    if from_file {
        info!("Configuration loaded from {}", config_path);
    } else {
        info!("No config file found, using defaults");
    }
    info!("  API listening on: {}", config.server.listen_addr);
    info!("  Database: {}", config.storage.database_url);
    info!("  Substitution: {:?}", config.templates.substitution);

    let pool = db::connect(&config.storage.database_url).await?;
    db::init_schema(&pool).await?;

    let state = Arc::new(AppState::new(pool, &config, Arc::new(LogTransport::new())));
    let server = ApiServer::new(state, config.server.listen_addr.clone());
    server.run().await?;

    Ok(())
}
