// SPDX-License-Identifier: GPL-3.0-only

use serde::{Deserialize, Serialize};

/// A named binding of a logical storage endpoint to one driver instance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceInfo {
    pub name: String,
    pub driver: DriverInfo,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DriverInfo {
    pub name: String,
    pub next_device: NextDeviceInfo,
}

/// How hosts should name the next block device they attach
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct NextDeviceInfo {
    /// Disables automatic device naming entirely
    #[serde(default)]
    pub ignore: bool,

    /// Device name prefix, e.g. "xvd"
    #[serde(default)]
    pub prefix: String,

    /// Regular expression the single-character suffix must match
    #[serde(default)]
    pub pattern: String,
}
