// SPDX-License-Identifier: GPL-3.0-only

//! Storage Service - HTTP service for volume and snapshot orchestration

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::net::TcpListener;

use storage_service::{AppState, DriverRegistry, StorageConfig, logging, serve};

#[derive(Parser)]
#[command(name = "storage-service")]
#[command(about = "Storage orchestration service", long_about = None)]
struct Args {
    /// Path to the YAML configuration file
    #[arg(short, long)]
    config: PathBuf,

    /// Listen address, overriding `storage.host`
    #[arg(long)]
    host: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let mut config = StorageConfig::load(&args.config)
        .with_context(|| format!("Failed to load {}", args.config.display()))?;
    if let Some(host) = args.host {
        config.host = host;
    }

    logging::init(&config.logging.level);

    tracing::info!("Starting Storage Service v{}", env!("CARGO_PKG_VERSION"));

    let drivers = DriverRegistry::builtin();
    tracing::info!("Drivers available: {}", drivers.names().join(", "));

    // Fail fast if any service is bound to a driver we do not have
    let state = AppState::build(&config, &drivers).await?;
    let services = state.lifecycle.services();
    for (name, info) in services.services_list() {
        tracing::info!("  - service {} -> driver {}", name, info.driver.name);
    }
    match services.default_service() {
        Some(name) => tracing::info!("Default service: {}", name),
        None => tracing::warn!("No default service; requests must name a service"),
    }
    tracing::info!("Executors published: {}", state.executors.len());

    let listener = TcpListener::bind(&config.host)
        .await
        .with_context(|| format!("Failed to bind {}", config.host))?;

    serve(listener, state, async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for shutdown signal: {}", e);
        }
        tracing::info!("Received shutdown signal");
    })
    .await?;

    tracing::info!("Storage Service shut down");
    Ok(())
}
