use anyhow::Result;
use localized_site::{config::Config, server, site::Site};
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file (ignored in production)
    let _ = dotenvy::dotenv();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("localized_site=info".parse()?),
        )
        .init();

    info!("Starting localized site");

    // Load configuration from environment
    let config = Config::from_env()?;

    // Path table and message bundles are validated here; defects abort startup
    let site = Arc::new(Site::load(&config)?);
    info!("Public URL: {}", config.site_url);

    server::serve(site, config.port).await
}
