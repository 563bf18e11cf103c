// SPDX-License-Identifier: GPL-3.0-only

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Error types for system-level operations
#[derive(Error, Debug)]
pub enum SysError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to launch {path:?}: {source}")]
    Spawn {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("{path:?} exited with {status}: {stderr}")]
    ExecutionFailed {
        path: PathBuf,
        status: String,
        stderr: String,
    },

    #[error("{path:?} did not finish within {timeout:?}")]
    Timeout { path: PathBuf, timeout: Duration },

    #[error("Background task failed: {0}")]
    Task(String),
}

/// Result type alias for system operations
pub type Result<T> = std::result::Result<T, SysError>;
