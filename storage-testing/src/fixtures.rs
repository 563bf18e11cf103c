use std::fs;
use std::path::Path;

use storage_executor::{LocalDriver, MockLocalDriver};
use storage_types::{NextDevice, NextDeviceInfo};

use crate::errors::{Result, TestingError};

/// Services every harness server exposes: the default plus two inheriting it
pub const SERVICE_NAMES: [&str; 3] = ["mock", "mock2", "mock3"];

/// Content published for the Windows executor; never executed by tests
pub const WINDOWS_EXECUTOR: &[u8] = b"MZ\x90\x00lsx-windows fixture";

pub fn config_yaml(executors_dir: &Path) -> String {
    format!(
        r#"storage:
  driver: mock
  host: 127.0.0.1:0
  logging:
    level: debug
  executors:
    dir: {}
  server:
    services:
      mock2:
      mock3:
        driver: mock
"#,
        executors_dir.display()
    )
}

/// Shell stand-in for `lsx` answering with the mock driver's local facts.
///
/// `platform` only lands in a comment so each platform's content (and
/// checksum) differs.
pub fn executor_script(platform: &str) -> Result<String> {
    let driver = MockLocalDriver;
    let naming = NextDeviceInfo {
        ignore: false,
        prefix: "xvd".to_string(),
        pattern: r"\w".to_string(),
    };
    let failed = |reason: String| TestingError::ServiceStartupFailed {
        reason: format!("fixture executor output: {reason}"),
    };

    let instance_id = driver.instance_id().map_err(|e| failed(e.to_string()))?;
    let local_devices = driver.local_devices().map_err(|e| failed(e.to_string()))?;
    let next_device = NextDevice {
        device: driver
            .next_device(&naming)
            .map_err(|e| failed(e.to_string()))?,
    };

    let instance_id = serde_json::to_string(&instance_id).map_err(|e| failed(e.to_string()))?;
    let local_devices =
        serde_json::to_string(&local_devices).map_err(|e| failed(e.to_string()))?;
    let next_device = serde_json::to_string(&next_device).map_err(|e| failed(e.to_string()))?;

    Ok(format!(
        r#"#!/bin/sh
# lsx fixture for {platform}
if [ "$1" != "{driver}" ]; then
    echo "unknown driver: $1" >&2
    exit 1
fi
case "$2" in
    instance-id) echo '{instance_id}' ;;
    local-devices) echo '{local_devices}' ;;
    next-device) echo '{next_device}' ;;
    *) echo "unknown command: $2" >&2; exit 2 ;;
esac
"#,
        driver = driver.name(),
    ))
}

/// Write the three platform executors into `dir`
pub fn write_executors(dir: &Path) -> Result<()> {
    let io_error = |path: &Path, error: std::io::Error| TestingError::FixtureIo {
        path: path.to_path_buf(),
        reason: error.to_string(),
    };

    fs::create_dir_all(dir).map_err(|e| io_error(dir, e))?;
    for (platform, name) in [("linux", "lsx-linux"), ("macos", "lsx-darwin")] {
        let path = dir.join(name);
        fs::write(&path, executor_script(platform)?).map_err(|e| io_error(&path, e))?;
    }
    let path = dir.join("lsx-windows.exe");
    fs::write(&path, WINDOWS_EXECUTOR).map_err(|e| io_error(&path, e))?;
    Ok(())
}
