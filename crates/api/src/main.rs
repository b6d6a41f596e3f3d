//! Trip Duration Service - Main Entry Point

use api::{init_logging, run_server, ServiceConfig};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ServiceConfig::load()?;
    init_logging(&config.logging)?;

    info!("=== Trip Duration Service v{} ===", env!("CARGO_PKG_VERSION"));
    info!("Model artifact: {}", config.model.path.display());

    run_server(config).await
}
