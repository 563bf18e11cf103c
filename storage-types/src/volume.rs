// SPDX-License-Identifier: GPL-3.0-only

use serde::{Deserialize, Serialize};

use crate::Opts;

/// A provisioned block storage unit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Volume {
    /// Unique within the owning driver's namespace (e.g. "vol-000")
    pub id: String,

    pub name: String,

    #[serde(default)]
    pub availability_zone: String,

    #[serde(default)]
    pub iops: i64,

    /// Size as reported by the backend
    #[serde(default)]
    pub size: i64,

    #[serde(rename = "type", default)]
    pub volume_type: String,

    #[serde(default)]
    pub status: String,

    /// Only populated when the caller asked for attachments
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attachments: Vec<VolumeAttachment>,

    #[serde(default, skip_serializing_if = "Opts::is_empty")]
    pub opts: Opts,
}

/// Binding of a volume to a host device
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VolumeAttachment {
    pub instance_id: String,
    pub device_name: String,
    #[serde(default)]
    pub status: String,
}
