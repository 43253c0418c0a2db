use anyhow::Result;
use colored::Colorize;
use kea_relay::{config, init_tracing, server};
use std::path::Path;
use tracing::info;

/// Execute the start command
///
/// Loads configuration, initializes logging from it, then serves until shutdown.
pub async fn execute(config_path: &Path) -> Result<()> {
    println!("{}", "Starting Kea relay...".green());

    let cfg = config::load_config(config_path)?;
    init_tracing(&cfg.server.log_level, &cfg.server.log_format);

    info!(
        config_path = %config_path.display(),
        "Configuration loaded"
    );

    server::start_server(cfg, config_path.to_path_buf()).await?;

    Ok(())
}
