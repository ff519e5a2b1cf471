// Warden server entrypoint
//!
//! The heavy lifting (state wiring, middleware stack, server run loop)
//! lives in dedicated modules so this file remains a thin orchestrator.

mod lifecycle;
mod logging;
mod middleware;

use anyhow::Result;
use lifecycle::{bootstrap, run};
use log::info;
use warden_configs::ServerConfig;

#[actix_web::main]
async fn main() -> Result<()> {
    // Load configuration (fall back to defaults when the file is missing)
    let config_path = "config.toml";
    let config = match warden_configs::load_from_file(config_path) {
        Ok(cfg) => cfg,
        Err(warden_configs::ConfigError::Io { path, .. }) => {
            eprintln!("Warning: {} not found, using defaults", path);
            ServerConfig::default()
        }
        Err(e) => {
            eprintln!("FATAL: Failed to load {}: {}", config_path, e);
            std::process::exit(1);
        }
    };

    // Logging before any other side effects
    let server_log_path = format!("{}/server.log", config.logging.logs_path);
    logging::init_logging(
        &config.logging.level,
        &server_log_path,
        config.logging.log_to_console,
        Some(&config.logging.targets),
        &config.logging.format,
    )?;

    info!("Warden v{}", env!("CARGO_PKG_VERSION"));
    info!("Host: {}  Port: {}", config.server.host, config.server.port);

    let components = bootstrap(&config)?;

    run(&config, components).await
}
