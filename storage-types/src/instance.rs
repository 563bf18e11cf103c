// SPDX-License-Identifier: GPL-3.0-only

//! Host-local fact records produced by running an executor

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Identity of the calling host as seen by one driver
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstanceId {
    pub id: String,
    pub driver: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub fields: BTreeMap<String, String>,
}

/// Block devices on the host that belong to a driver, keyed by device path
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalDevices {
    pub driver: String,
    /// Device path to volume id
    #[serde(default)]
    pub device_map: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NextDevice {
    /// `None` when every candidate name is taken
    pub device: Option<String>,
}
