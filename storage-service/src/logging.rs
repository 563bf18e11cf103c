// SPDX-License-Identifier: GPL-3.0-only

use tracing_subscriber::{EnvFilter, fmt};

/// Filter directives for `level`, scoped to the storage crates
pub fn default_directives(level: &str) -> String {
    format!("storage_service={level},storage_contracts={level},storage_sys={level},tower_http={level},warn")
}

/// Initialise stderr logging; `RUST_LOG` overrides the configured level
pub fn init(level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(level)));

    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
