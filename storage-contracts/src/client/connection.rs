// SPDX-License-Identifier: GPL-3.0-only

//! Shared HTTP connection pool
//!
//! All client instances reuse one `reqwest::Client` so keep-alive
//! connections are pooled process-wide.

use std::sync::OnceLock;
use std::time::Duration;

use crate::StorageError;

static HTTP_CLIENT: OnceLock<reqwest::Client> = OnceLock::new();

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Get or create the shared HTTP client
pub fn shared_http_client() -> Result<&'static reqwest::Client, StorageError> {
    if let Some(client) = HTTP_CLIENT.get() {
        return Ok(client);
    }

    let client = reqwest::Client::builder()
        .connect_timeout(CONNECT_TIMEOUT)
        .build()
        .map_err(|e| StorageError::internal(format!("Failed to build HTTP client: {e}")))?;

    // Ignore error if already set (another task won the race)
    let _ = HTTP_CLIENT.set(client);

    HTTP_CLIENT
        .get()
        .ok_or_else(|| StorageError::internal("Failed to initialize shared HTTP client"))
}
