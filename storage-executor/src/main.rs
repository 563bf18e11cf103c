// SPDX-License-Identifier: GPL-3.0-only

use anyhow::{Result, anyhow};
use clap::{Parser, Subcommand};
use serde::Serialize;
use storage_executor::local_driver;
use storage_types::{NextDevice, NextDeviceInfo};

/// Report host-local storage facts for one driver
#[derive(Parser)]
#[command(name = "lsx")]
#[command(about = "Host-local storage executor", long_about = None)]
struct Cli {
    /// Driver whose view of this host is requested
    driver: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the identity of this host
    InstanceId,
    /// Print the devices attached to this host, keyed by device path
    LocalDevices,
    /// Print the next free device name
    NextDevice {
        /// Device name prefix, e.g. "xvd"
        #[arg(long)]
        prefix: String,
        /// Pattern the one-letter suffix must match
        #[arg(long, default_value = r"\w")]
        pattern: String,
    },
}

fn main() -> Result<()> {
    // Logs go to stderr; stdout carries exactly one JSON document
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();
    let driver = local_driver(&cli.driver).ok_or_else(|| {
        tracing::error!("Unknown driver {}", cli.driver);
        anyhow!("unknown driver: {}", cli.driver)
    })?;

    match cli.command {
        Commands::InstanceId => emit(&driver.instance_id()?),
        Commands::LocalDevices => emit(&driver.local_devices()?),
        Commands::NextDevice { prefix, pattern } => {
            let naming = NextDeviceInfo {
                ignore: false,
                prefix,
                pattern,
            };
            let device = driver.next_device(&naming).map_err(|e| {
                tracing::error!("Failed to pick next device: {}", e);
                e
            })?;
            emit(&NextDevice { device })
        }
    }
}

fn emit<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string(value)?;
    println!("{}", json);
    Ok(())
}
