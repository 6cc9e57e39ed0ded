//! chatwaved - ChatWave Daemon entry point.

use chatwaved::config::Config;
use chatwaved::journal;
use chatwaved::net::Gateway;
use chatwaved::state::Registry;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    // Optional config file path as the first argument; defaults apply
    // otherwise.
    let config = match std::env::args().nth(1) {
        Some(path) => Config::load(&path).map_err(|e| {
            error!(path = %path, error = %e, "failed to load config");
            e
        })?,
        None => Config::default(),
    };

    info!(
        server = %config.server.name,
        listen = %config.server.listen,
        "starting chatwaved"
    );

    let journal = journal::from_config(&config.journal);
    let registry = Arc::new(Registry::new(config.policy));

    let gateway = Gateway::bind(&config, registry, journal).await?;
    gateway.run().await
}
