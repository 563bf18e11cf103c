// SPDX-License-Identifier: GPL-3.0-only

//! Out-of-process executor invocation
//!
//! The child is killed if the timeout elapses or the future is dropped.

use std::path::Path;
use std::process::Output;
use std::time::Duration;

use tokio::process::Command;
use tracing::{debug, warn};

use crate::error::{Result, SysError};

/// Run `path` with `args` and return its stdout.
///
/// Fails when the process cannot be started, exits unsuccessfully, or does
/// not finish within `timeout`.
pub async fn invoke(path: &Path, args: &[String], timeout: Duration) -> Result<String> {
    debug!("Invoking {:?} {}", path, args.join(" "));

    let output = match tokio::time::timeout(timeout, run(path, args)).await {
        Ok(result) => result?,
        Err(_) => {
            warn!("{:?} timed out after {:?}", path, timeout);
            return Err(SysError::Timeout {
                path: path.to_path_buf(),
                timeout,
            });
        }
    };

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        warn!("{:?} failed: {}", path, stderr);
        return Err(SysError::ExecutionFailed {
            path: path.to_path_buf(),
            status: output.status.to_string(),
            stderr,
        });
    }

    Ok(String::from_utf8_lossy(&output.stdout).to_string())
}

async fn run(path: &Path, args: &[String]) -> Result<Output> {
    let result = match spawn(path, args).await {
        // A freshly cached binary can still be held open by a concurrently
        // forked child; one retry is enough for the descriptor to close.
        Err(e) if is_text_file_busy(&e) => {
            debug!("{:?} busy, retrying once", path);
            tokio::time::sleep(Duration::from_millis(50)).await;
            spawn(path, args).await
        }
        result => result,
    };

    result.map_err(|source| SysError::Spawn {
        path: path.to_path_buf(),
        source,
    })
}

async fn spawn(path: &Path, args: &[String]) -> std::io::Result<Output> {
    Command::new(path)
        .args(args)
        .kill_on_drop(true)
        .output()
        .await
}

#[cfg(unix)]
fn is_text_file_busy(error: &std::io::Error) -> bool {
    error.raw_os_error() == Some(libc::ETXTBSY)
}

#[cfg(not(unix))]
fn is_text_file_busy(_error: &std::io::Error) -> bool {
    false
}
